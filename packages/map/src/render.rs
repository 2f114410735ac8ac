//! The map renderer: layer management and viewport policy.

use geojson::FeatureCollection;

use crate::{
    BubbleMarker, HeatPoint, LatLng, LatLngBounds, MapView, OccurrencePoint, RenderConfig,
    RenderMode, UserMarker, extract_points,
};

/// Rendering state retained between fetches.
///
/// `last_feature_set` lets mode toggling re-render without a new
/// network call; `is_filtered` is remembered so the toggle keeps the
/// same viewport policy as the fetch that produced the data.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Active visualization mode.
    pub mode: RenderMode,
    /// The most recently fetched feature collection.
    pub last_feature_set: Option<FeatureCollection>,
    /// Whether the last fetch was considered filtered.
    pub is_filtered: bool,
}

/// Outcome of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No valid points; the caller should show the empty-state message.
    Empty {
        /// Whether the viewport was reset to the default view.
        viewport_reset: bool,
    },
    /// Points were drawn in the active mode.
    Drawn {
        /// Number of valid points rendered.
        points: usize,
    },
}

/// Draws occurrence data on a [`MapView`] in one of two modes and keeps
/// the viewport consistent with the filter state.
#[derive(Debug, Default)]
pub struct MapRenderer {
    config: RenderConfig,
    state: ViewState,
}

impl MapRenderer {
    /// Creates a renderer with the given configuration.
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            state: ViewState::default(),
        }
    }

    /// The active visualization mode.
    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        self.state.mode
    }

    /// The retained rendering state.
    #[must_use]
    pub const fn view_state(&self) -> &ViewState {
        &self.state
    }

    /// Renders a freshly fetched feature collection.
    ///
    /// Retains the collection so a later mode toggle can re-render it
    /// without refetching.
    pub fn render(
        &mut self,
        view: &mut dyn MapView,
        features: FeatureCollection,
        is_filtered: bool,
    ) -> RenderOutcome {
        self.state.last_feature_set = Some(features);
        self.state.is_filtered = is_filtered;
        self.draw(view)
    }

    /// Switches the visualization mode and re-renders the last received
    /// feature collection. Never issues a network request.
    pub fn set_mode(&mut self, view: &mut dyn MapView, mode: RenderMode) -> RenderOutcome {
        self.state.mode = mode;
        self.draw(view)
    }

    /// Flips between bubble and heatmap mode, re-rendering in place.
    pub fn toggle_mode(&mut self, view: &mut dyn MapView) -> RenderMode {
        let mode = self.state.mode.toggled();
        self.set_mode(view, mode);
        mode
    }

    /// Resets the viewport to the default regional view.
    pub fn reset_view(&self, view: &mut dyn MapView) {
        view.set_view(self.config.default_center, self.config.default_zoom);
    }

    /// Centers and zooms on a single point (bubble click behavior).
    pub fn focus_point(&self, view: &mut dyn MapView, position: LatLng) {
        view.set_view(position, self.config.focus_zoom);
    }

    /// Replaces the user-location marker, removing any prior instance
    /// first, and focuses the view on it.
    pub fn place_user_marker(&self, view: &mut dyn MapView, position: LatLng, popup: String) {
        view.remove_user_marker();
        view.place_user_marker(UserMarker { position, popup });
        self.focus_point(view, position);
    }

    /// Clears retained data and restores the default view. Used by the
    /// clear-filters reset.
    pub fn reset(&mut self, view: &mut dyn MapView) {
        self.state.last_feature_set = None;
        self.state.is_filtered = false;
        view.clear_bubbles();
        view.clear_heat();
        view.remove_user_marker();
        self.reset_view(view);
    }

    /// Full render pass over the retained feature collection.
    fn draw(&self, view: &mut dyn MapView) -> RenderOutcome {
        view.clear_bubbles();
        view.clear_heat();

        let points = self
            .state
            .last_feature_set
            .as_ref()
            .map(|fc| extract_points(fc, self.config.bounds_guard.as_ref()))
            .unwrap_or_default();

        if points.is_empty() {
            let viewport_reset = !self.state.is_filtered;
            if viewport_reset {
                self.reset_view(view);
            }
            return RenderOutcome::Empty { viewport_reset };
        }

        match self.state.mode {
            RenderMode::Bubbles => {
                view.set_bubble_layer_attached(true);
                view.set_heat_layer_attached(false);
                for point in &points {
                    view.add_bubble(BubbleMarker {
                        position: point.position(),
                        radius_m: self.config.bubble_radius_m,
                        tooltip: point.tooltip_label(),
                        focus_zoom: self.config.focus_zoom,
                    });
                }
            }
            RenderMode::Heatmap => {
                view.set_heat_layer_attached(true);
                view.set_bubble_layer_attached(false);
                view.set_heat_points(
                    points
                        .iter()
                        .map(|p| HeatPoint {
                            position: p.position(),
                            intensity: 1.0,
                        })
                        .collect(),
                );
            }
        }

        if self.state.is_filtered {
            let positions: Vec<LatLng> = points.iter().map(OccurrencePoint::position).collect();
            if let Some(bounds) = LatLngBounds::from_points(&positions) {
                view.fit_bounds(bounds, self.config.fit_padding_px, self.config.fit_max_zoom);
            }
        } else {
            self.reset_view(view);
        }

        RenderOutcome::Drawn {
            points: points.len(),
        }
    }
}
