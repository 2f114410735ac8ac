//! The dashboard session lifecycle.

use std::sync::{Arc, Mutex};

use sentinela_api::Backend;
use sentinela_cascade::{ReloadOutcome, ReloadResult};
use sentinela_filter_models::{Dimension, FilterState, FilteredPredicate, Period};
use sentinela_insights::InsightsView;
use sentinela_map::{LatLng, MapRenderer, MapView, RenderConfig, RenderMode, RenderOutcome};
use sentinela_search::input::{InputError, LocationProvider, SpeechRecognizer};
use sentinela_search::MatchStrategy;

use crate::busy::{BusyIndicator, BusySink};
use crate::{Notifier, PreferenceStore, ReverseGeocoder, Severity, THEME_KEY, USER_MARKER_POPUP};

/// One dashboard session.
///
/// Created at startup, reset (not recreated) by the clear-filters
/// action. All user input funnels through its methods; every filter
/// mutation ends in the same fetch-and-render pipeline.
pub struct Session {
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    preferences: Arc<dyn PreferenceStore>,
    speech: Option<Arc<dyn SpeechRecognizer>>,
    location: Option<(Arc<dyn LocationProvider>, Arc<dyn ReverseGeocoder>)>,
    busy: BusyIndicator,
    state: Mutex<FilterState>,
    renderer: MapRenderer,
    predicate: FilteredPredicate,
    match_strategy: MatchStrategy,
    voice_enabled: bool,
    location_enabled: bool,
    dark_theme: bool,
}

impl Session {
    /// Creates a session with no voice or geolocation capability.
    #[must_use]
    pub fn new(
        backend: Arc<dyn Backend>,
        notifier: Arc<dyn Notifier>,
        preferences: Arc<dyn PreferenceStore>,
        busy_sink: Arc<dyn BusySink>,
    ) -> Self {
        Self {
            backend,
            notifier,
            preferences,
            speech: None,
            location: None,
            busy: BusyIndicator::new(busy_sink),
            state: Mutex::new(FilterState::new()),
            renderer: MapRenderer::new(RenderConfig::default()),
            predicate: FilteredPredicate::default(),
            match_strategy: MatchStrategy::default(),
            voice_enabled: false,
            location_enabled: false,
            dark_theme: false,
        }
    }

    /// Enables voice search.
    #[must_use]
    pub fn with_speech(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.speech = Some(recognizer);
        self.voice_enabled = true;
        self
    }

    /// Enables the locate-me button.
    #[must_use]
    pub fn with_location(
        mut self,
        provider: Arc<dyn LocationProvider>,
        geocoder: Arc<dyn ReverseGeocoder>,
    ) -> Self {
        self.location = Some((provider, geocoder));
        self.location_enabled = true;
        self
    }

    /// Overrides the filtered-viewport predicate.
    #[must_use]
    pub const fn with_predicate(mut self, predicate: FilteredPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    /// Overrides the search match strategy.
    #[must_use]
    pub const fn with_match_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.match_strategy = strategy;
        self
    }

    /// Starts the session: applies the stored theme, loads the four
    /// option lists concurrently, then runs the initial unfiltered
    /// occurrence fetch.
    pub async fn start(&mut self, view: &mut dyn MapView) {
        self.dark_theme =
            matches!(self.preferences.get(THEME_KEY).as_deref(), Some("enabled"));

        let backend = self.backend.as_ref();
        let outcomes = {
            let _busy = self.busy.begin();
            let (regions, municipalities, neighborhoods, crime_types) = tokio::join!(
                sentinela_cascade::reload_dimension(&self.state, backend, Dimension::Region),
                sentinela_cascade::reload_dimension(&self.state, backend, Dimension::Municipality),
                sentinela_cascade::reload_dimension(&self.state, backend, Dimension::Neighborhood),
                sentinela_cascade::reload_dimension(&self.state, backend, Dimension::CrimeType),
            );
            [regions, municipalities, neighborhoods, crime_types]
        };
        for outcome in &outcomes {
            self.report_reload(outcome);
        }

        self.refresh_occurrences(view).await;
    }

    /// Fetches occurrences for the current criteria and renders them.
    ///
    /// A failed fetch raises an error notification and leaves the
    /// previously rendered map untouched.
    pub async fn refresh_occurrences(&mut self, view: &mut dyn MapView) {
        let _busy = self.busy.begin();
        let (criteria, is_filtered) = {
            let state = self.state.lock().expect("filter state mutex poisoned");
            let is_filtered = self.predicate.is_filtered(&state.criteria);
            (state.criteria.clone(), is_filtered)
        };

        match self.backend.fetch_occurrences(&criteria).await {
            Ok(features) => {
                let outcome = self.renderer.render(view, features, is_filtered);
                if matches!(outcome, RenderOutcome::Empty { .. }) {
                    self.notifier.notify(
                        Severity::Info,
                        "Nenhuma ocorrência encontrada para os filtros atuais.",
                    );
                }
            }
            Err(e) => {
                log::error!("Occurrence fetch failed: {e}");
                self.notifier
                    .notify(Severity::Error, "Não foi possível carregar as ocorrências.");
            }
        }
    }

    /// Applies a select-control change: sets the selection, reloads
    /// dependent option lists, then refetches occurrences.
    pub async fn select(
        &mut self,
        view: &mut dyn MapView,
        dimension: Dimension,
        value: Option<String>,
    ) {
        self.state
            .lock()
            .expect("filter state mutex poisoned")
            .criteria
            .select(dimension, value);

        let outcomes =
            sentinela_cascade::on_parent_changed(&self.state, self.backend.as_ref(), dimension)
                .await;
        for outcome in &outcomes {
            self.report_reload(outcome);
        }

        self.refresh_occurrences(view).await;
    }

    /// Changes the reporting period and refetches.
    pub async fn set_period(&mut self, view: &mut dyn MapView, period: Period) {
        self.state
            .lock()
            .expect("filter state mutex poisoned")
            .criteria
            .period = period;
        self.refresh_occurrences(view).await;
    }

    /// Resolves a text query against the loaded option lists and, on a
    /// match, applies it through the standard select pipeline.
    ///
    /// Returns whether a fetch was triggered. No match leaves all state
    /// unchanged and raises a warning notification.
    pub async fn search(&mut self, view: &mut dyn MapView, raw_text: &str) -> bool {
        let matched = {
            let state = self.state.lock().expect("filter state mutex poisoned");
            sentinela_search::resolve(&state, raw_text, self.match_strategy)
        };

        match matched {
            Some(found) => {
                self.notifier.notify(
                    Severity::Info,
                    &format!("Filtrando por {}.", found.option.display_name),
                );
                self.select(view, found.dimension, Some(found.option.id)).await;
                true
            }
            None => {
                self.notifier.notify(
                    Severity::Warning,
                    &format!("Nenhum local encontrado para \"{}\".", raw_text.trim()),
                );
                false
            }
        }
    }

    /// Captures one utterance and feeds it to [`Session::search`].
    ///
    /// If the platform lacks speech recognition, the control is
    /// disabled for the rest of the session.
    pub async fn voice_search(&mut self, view: &mut dyn MapView) -> bool {
        let Some(recognizer) = self.speech.clone().filter(|_| self.voice_enabled) else {
            self.notifier.notify(
                Severity::Warning,
                "Busca por voz não está disponível neste dispositivo.",
            );
            return false;
        };

        match recognizer.recognize_once().await {
            Ok(transcript) => self.search(view, &transcript).await,
            Err(InputError::Unavailable { capability }) => {
                log::warn!("{capability} unavailable; disabling voice search");
                self.voice_enabled = false;
                self.notifier.notify(
                    Severity::Warning,
                    "Busca por voz não está disponível neste dispositivo.",
                );
                false
            }
            Err(e) => {
                log::warn!("Speech recognition failed: {e}");
                self.notifier
                    .notify(Severity::Warning, "Não foi possível reconhecer a fala.");
                false
            }
        }
    }

    /// Places the user-location marker and resolves the position into a
    /// municipality filter.
    ///
    /// The marker is placed and focused before the place name resolves,
    /// so the user sees their position even when reverse geocoding
    /// fails. Returns whether a fetch was triggered.
    pub async fn locate(&mut self, view: &mut dyn MapView) -> bool {
        let Some((provider, geocoder)) = self.location.clone().filter(|_| self.location_enabled)
        else {
            self.notifier.notify(
                Severity::Warning,
                "Geolocalização não está disponível neste dispositivo.",
            );
            return false;
        };

        let position = match provider.current_position().await {
            Ok(position) => position,
            Err(InputError::Unavailable { capability }) => {
                log::warn!("{capability} unavailable; disabling geolocation");
                self.location_enabled = false;
                self.notifier.notify(
                    Severity::Warning,
                    "Geolocalização não está disponível neste dispositivo.",
                );
                return false;
            }
            Err(e) => {
                log::warn!("Geolocation fix failed: {e}");
                self.notifier
                    .notify(Severity::Warning, "Não foi possível obter sua localização.");
                return false;
            }
        };

        self.renderer.place_user_marker(
            view,
            LatLng::new(position.latitude, position.longitude),
            USER_MARKER_POPUP.into(),
        );

        match geocoder
            .place_name(position.latitude, position.longitude)
            .await
        {
            Ok(Some(name)) => self.search(view, &name).await,
            Ok(None) => {
                self.notifier.notify(
                    Severity::Info,
                    "Não foi possível identificar o município da sua posição.",
                );
                false
            }
            Err(e) => {
                log::warn!("Reverse geocoding failed: {e}");
                self.notifier.notify(
                    Severity::Warning,
                    "Não foi possível identificar o município da sua posição.",
                );
                false
            }
        }
    }

    /// Flips between bubble and heatmap rendering without refetching.
    pub fn toggle_mode(&mut self, view: &mut dyn MapView) -> RenderMode {
        self.renderer.toggle_mode(view)
    }

    /// Clears every filter, resets the map, and reloads the unscoped
    /// option lists plus the unfiltered occurrence set.
    pub async fn clear_filters(&mut self, view: &mut dyn MapView) {
        self.state
            .lock()
            .expect("filter state mutex poisoned")
            .reset();
        self.renderer.reset(view);

        let outcomes = sentinela_cascade::on_parent_changed(
            &self.state,
            self.backend.as_ref(),
            Dimension::Region,
        )
        .await;
        for outcome in &outcomes {
            self.report_reload(outcome);
        }

        self.refresh_occurrences(view).await;
    }

    /// Whether the insights panel can be requested: a region or
    /// municipality must be selected.
    #[must_use]
    pub fn insights_available(&self) -> bool {
        let state = self.state.lock().expect("filter state mutex poisoned");
        state.criteria.region.is_some() || state.criteria.municipality.is_some()
    }

    /// Requests the analytical summary for the current filter set.
    pub async fn request_insights(&mut self) -> Option<InsightsView> {
        if !self.insights_available() {
            self.notifier.notify(
                Severity::Info,
                "Selecione uma região ou município para gerar insights.",
            );
            return None;
        }

        let _busy = self.busy.begin();
        let criteria = self
            .state
            .lock()
            .expect("filter state mutex poisoned")
            .criteria
            .clone();

        match sentinela_insights::request_insights(self.backend.as_ref(), &criteria).await {
            Ok(insights) => Some(insights),
            Err(e) => {
                log::error!("Insights request failed: {e}");
                self.notifier
                    .notify(Severity::Error, "Não foi possível gerar os insights.");
                None
            }
        }
    }

    /// Flips the dark theme and persists the choice.
    pub fn toggle_theme(&mut self) -> bool {
        self.dark_theme = !self.dark_theme;
        self.preferences.set(
            THEME_KEY,
            if self.dark_theme { "enabled" } else { "disabled" },
        );
        self.dark_theme
    }

    /// Whether the dark theme is active.
    #[must_use]
    pub const fn dark_theme(&self) -> bool {
        self.dark_theme
    }

    /// Whether the voice-search control is enabled.
    #[must_use]
    pub const fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    /// Whether the locate-me control is enabled.
    #[must_use]
    pub const fn location_enabled(&self) -> bool {
        self.location_enabled
    }

    /// Whether any request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// The current filter state, for binding the select controls.
    #[must_use]
    pub const fn filter_state(&self) -> &Mutex<FilterState> {
        &self.state
    }

    fn report_reload(&self, outcome: &ReloadOutcome) {
        if let ReloadResult::Failed(e) = &outcome.result {
            log::error!("Option list for {} failed to load: {e}", outcome.dimension);
            self.notifier.notify(
                Severity::Error,
                &format!("Falha ao carregar as opções de {}.", outcome.dimension),
            );
        }
    }
}
