#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cascading filter option-list resolver.
//!
//! When a parent dimension changes, every dependent option list below it
//! is reset to a loading placeholder and refetched in dependency order
//! (region → municipality → neighborhood). Responses are applied through
//! the per-dimension request sequence numbers held by
//! [`FilterState`], so a response belonging to anything but the most
//! recently issued request for a dimension is discarded on arrival.
//!
//! The [`FilterState`] lives behind a `Mutex` that is locked only
//! around synchronous state transitions, never across a network await.

use std::sync::Mutex;

use sentinela_api::{ApiError, Backend};
use sentinela_filter_models::{ApplyOutcome, Dimension, FilterState};

/// Result of one option-list reload.
#[derive(Debug)]
pub enum ReloadResult {
    /// Options loaded and applied.
    Loaded(usize),
    /// The backend returned an empty list; the select shows the
    /// "no data" placeholder.
    Empty,
    /// The fetch failed; the select shows the error placeholder. The
    /// caller should raise a recoverable notification.
    Failed(ApiError),
    /// A newer reload for the same dimension superseded this one; the
    /// response was discarded without touching state.
    Superseded,
}

/// Outcome of a reload for one dimension.
#[derive(Debug)]
pub struct ReloadOutcome {
    /// The dimension that was reloaded.
    pub dimension: Dimension,
    /// What happened.
    pub result: ReloadResult,
}

/// The parent dimension scoping `dimension`'s option list, if any.
#[must_use]
pub const fn parent_of(dimension: Dimension) -> Option<Dimension> {
    match dimension {
        Dimension::Municipality => Some(Dimension::Region),
        Dimension::Neighborhood => Some(Dimension::Municipality),
        Dimension::Region | Dimension::CrimeType => None,
    }
}

/// Every dimension below `dimension` in the cascade, in dependency
/// order.
#[must_use]
pub const fn dependents_of(dimension: Dimension) -> &'static [Dimension] {
    match dimension {
        Dimension::Region => &[Dimension::Municipality, Dimension::Neighborhood],
        Dimension::Municipality => &[Dimension::Neighborhood],
        Dimension::Neighborhood | Dimension::CrimeType => &[],
    }
}

/// Reloads the option list for one dimension, scoped by the current
/// selection of its parent (unscoped when the parent is cleared,
/// returning the full list).
///
/// The select drops to the loading placeholder before the request is
/// issued; the response is applied only if no newer reload for the same
/// dimension was started in the meantime.
pub async fn reload_dimension(
    state: &Mutex<FilterState>,
    backend: &dyn Backend,
    dimension: Dimension,
) -> ReloadOutcome {
    let (token, parent) = {
        let mut state = state.lock().expect("filter state mutex poisoned");
        let parent = parent_of(dimension)
            .and_then(|p| state.criteria.selection(p).map(String::from));
        (state.begin_reload(dimension), parent)
    };

    let result = backend.fetch_options(dimension, parent.as_deref()).await;

    let mut state = state.lock().expect("filter state mutex poisoned");
    let result = match result {
        Ok(options) => {
            let count = options.len();
            match state.apply_options(token, options) {
                ApplyOutcome::Stale => ReloadResult::Superseded,
                ApplyOutcome::Applied if count == 0 => ReloadResult::Empty,
                ApplyOutcome::Applied => ReloadResult::Loaded(count),
            }
        }
        Err(e) => match state.fail_options(token) {
            ApplyOutcome::Stale => ReloadResult::Superseded,
            ApplyOutcome::Applied => {
                log::warn!("Reload of {dimension} options failed: {e}");
                ReloadResult::Failed(e)
            }
        },
    };

    ReloadOutcome { dimension, result }
}

/// Handles a change of `dimension`'s selection by refetching every
/// dependent option list below it.
///
/// All dependent selects are reset (loading placeholder, selection
/// cleared) *before* any fetch resolves, so a forgotten child selection
/// can never refer to a parent it no longer belongs to. Fetches then
/// run in dependency order; each applies under the staleness guard.
/// Dimensions with no dependents (neighborhood, crime type) return an
/// empty outcome list.
pub async fn on_parent_changed(
    state: &Mutex<FilterState>,
    backend: &dyn Backend,
    dimension: Dimension,
) -> Vec<ReloadOutcome> {
    let chain = dependents_of(dimension);
    if chain.is_empty() {
        return Vec::new();
    }

    log::debug!("{dimension} changed; reloading {chain:?}");

    let mut outcomes = Vec::with_capacity(chain.len());
    for &dependent in chain {
        outcomes.push(reload_dimension(state, backend, dependent).await);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use geojson::FeatureCollection;
    use sentinela_api_models::{InsightsReport, InsightsRequest};
    use sentinela_filter_models::{OptionItem, SelectState};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Backend whose option responses are keyed by dimension/parent and
    /// whose first call can be held back behind a gate to simulate a
    /// slow in-flight request overtaken by a newer one.
    #[derive(Default)]
    struct FakeBackend {
        calls: AtomicUsize,
        hold_first_call: bool,
        gate: Notify,
        fail: bool,
        seen_parents: Mutex<Vec<(Dimension, Option<String>)>>,
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn fetch_options(
            &self,
            dimension: Dimension,
            parent: Option<&str>,
        ) -> Result<Vec<OptionItem>, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_parents
                .lock()
                .unwrap()
                .push((dimension, parent.map(String::from)));

            if self.fail {
                return Err(ApiError::Status {
                    status: 503,
                    detail: "indisponível".into(),
                });
            }
            if self.hold_first_call && call == 0 {
                self.gate.notified().await;
                return Ok(vec![OptionItem::new("old", "Primeira Resposta")]);
            }
            Ok(vec![OptionItem::new(
                format!("call-{call}"),
                format!("Resposta {call}"),
            )])
        }

        async fn fetch_occurrences(
            &self,
            _criteria: &sentinela_filter_models::FilterCriteria,
        ) -> Result<FeatureCollection, ApiError> {
            unimplemented!("not used by cascade tests")
        }

        async fn fetch_insights(
            &self,
            _request: &InsightsRequest,
        ) -> Result<InsightsReport, ApiError> {
            unimplemented!("not used by cascade tests")
        }
    }

    #[tokio::test]
    async fn rapid_parent_changes_keep_only_the_last_response() {
        let state = Mutex::new(FilterState::new());
        let backend = FakeBackend {
            hold_first_call: true,
            ..FakeBackend::default()
        };

        // The first reload's response is held back until the second has
        // fully resolved and been applied.
        let first = reload_dimension(&state, &backend, Dimension::Municipality);
        let second = async {
            let outcome = reload_dimension(&state, &backend, Dimension::Municipality).await;
            backend.gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first.result, ReloadResult::Superseded));
        assert!(matches!(second.result, ReloadResult::Loaded(1)));

        let state = state.lock().unwrap();
        let options = state.loaded_options(Dimension::Municipality).unwrap();
        assert_eq!(options[0].display_name, "Resposta 1");
    }

    #[tokio::test]
    async fn region_change_reloads_chain_and_resets_descendants() {
        let state = Mutex::new(FilterState::new());
        let backend = FakeBackend::default();

        {
            let mut s = state.lock().unwrap();
            s.criteria.set_region(Some("5".into()));
            // Leftovers from a previous region that must not survive.
            s.criteria.municipality = Some("campinas".into());
            s.criteria.neighborhood = Some("centro".into());
        }

        let outcomes = on_parent_changed(&state, &backend, Dimension::Region).await;

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0].result, ReloadResult::Loaded(_)));
        assert!(matches!(outcomes[1].result, ReloadResult::Loaded(_)));

        let s = state.lock().unwrap();
        assert_eq!(s.criteria.municipality, None);
        assert_eq!(s.criteria.neighborhood, None);

        // Municipalities scoped by the new region; neighborhoods
        // unscoped because their parent selection was cleared.
        let seen = backend.seen_parents.lock().unwrap();
        assert_eq!(seen[0], (Dimension::Municipality, Some("5".into())));
        assert_eq!(seen[1], (Dimension::Neighborhood, None));
    }

    #[tokio::test]
    async fn municipality_change_reloads_neighborhoods_scoped() {
        let state = Mutex::new(FilterState::new());
        let backend = FakeBackend::default();

        state
            .lock()
            .unwrap()
            .criteria
            .set_municipality(Some("campinas".into()));

        let outcomes = on_parent_changed(&state, &backend, Dimension::Municipality).await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].dimension, Dimension::Neighborhood);
        let seen = backend.seen_parents.lock().unwrap();
        assert_eq!(seen[0], (Dimension::Neighborhood, Some("campinas".into())));
    }

    #[tokio::test]
    async fn leaf_dimensions_have_no_dependents() {
        let state = Mutex::new(FilterState::new());
        let backend = FakeBackend::default();

        assert!(on_parent_changed(&state, &backend, Dimension::Neighborhood)
            .await
            .is_empty());
        assert!(on_parent_changed(&state, &backend, Dimension::CrimeType)
            .await
            .is_empty());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_reload_shows_error_placeholder() {
        let state = Mutex::new(FilterState::new());
        let backend = FakeBackend {
            fail: true,
            ..FakeBackend::default()
        };

        let outcome = reload_dimension(&state, &backend, Dimension::Region).await;

        assert!(matches!(outcome.result, ReloadResult::Failed(_)));
        assert_eq!(
            *state.lock().unwrap().options(Dimension::Region),
            SelectState::Error
        );
    }
}
