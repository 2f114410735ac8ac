#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map rendering coordinator for the Sentinela dashboard.
//!
//! Converts raw occurrence feature collections into validated points and
//! draws them through the [`MapView`] trait, which abstracts the
//! third-party map library's tile/marker/heat primitives. Owns the
//! viewport fit-to-data vs. default-view policy and the single user
//! location marker.

pub mod points;
pub mod render;

pub use points::{OccurrencePoint, extract_points};
pub use render::{MapRenderer, RenderOutcome, ViewState};

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LatLng {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// An axis-aligned viewport bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    /// Southern latitude.
    pub south: f64,
    /// Western longitude.
    pub west: f64,
    /// Northern latitude.
    pub north: f64,
    /// Eastern longitude.
    pub east: f64,
}

impl LatLngBounds {
    /// Computes the bounding box of a non-empty point set.
    #[must_use]
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        };
        for point in &points[1..] {
            bounds.south = bounds.south.min(point.latitude);
            bounds.north = bounds.north.max(point.latitude);
            bounds.west = bounds.west.min(point.longitude);
            bounds.east = bounds.east.max(point.longitude);
        }
        Some(bounds)
    }
}

/// Geographic sanity bound used as a data-quality guard against bad
/// geocoding. Points outside the box are excluded, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum latitude.
    pub lat_min: f64,
    /// Maximum latitude.
    pub lat_max: f64,
    /// Minimum longitude.
    pub lon_min: f64,
    /// Maximum longitude.
    pub lon_max: f64,
}

impl GeoBounds {
    /// Whether the coordinate pair falls inside the box.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }
}

/// São Paulo state bounding box, matching the backend's own data
/// cleaning bound.
pub const SAO_PAULO_STATE_BOUNDS: GeoBounds = GeoBounds {
    lat_min: -25.4,
    lat_max: -19.7,
    lon_min: -53.2,
    lon_max: -44.1,
};

/// Spatial visualization mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One circle marker per occurrence.
    #[default]
    Bubbles,
    /// Density rendering of the same point set.
    Heatmap,
}

impl RenderMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Bubbles => Self::Heatmap,
            Self::Heatmap => Self::Bubbles,
        }
    }
}

/// A circle marker in bubble mode.
///
/// Click behavior is declarative: the map adapter centers the view on
/// `position` at `focus_zoom` when the marker is clicked (see
/// [`MapRenderer::focus_point`]).
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleMarker {
    /// Marker position.
    pub position: LatLng,
    /// Fixed visual radius in meters.
    pub radius_m: f64,
    /// Tooltip label (crime type, underscores replaced, upper-cased).
    pub tooltip: String,
    /// Zoom level applied when the marker is clicked.
    pub focus_zoom: u8,
}

/// A weighted point in heatmap mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    /// Point position.
    pub position: LatLng,
    /// Intensity weight (uniform 1.0 for occurrence data).
    pub intensity: f64,
}

/// The single user-location marker.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMarker {
    /// Marker position.
    pub position: LatLng,
    /// Popup text.
    pub popup: String,
}

/// Abstraction over the third-party map library.
///
/// Implementations own the actual tile, marker, and heat layers. The
/// renderer guarantees that `place_user_marker` is always preceded by
/// `remove_user_marker`, so at most one user marker is ever live.
pub trait MapView {
    /// Centers the viewport.
    fn set_view(&mut self, center: LatLng, zoom: u8);
    /// Fits the viewport to `bounds` with pixel padding, capped at
    /// `max_zoom` to prevent over-zooming on a single point cluster.
    fn fit_bounds(&mut self, bounds: LatLngBounds, padding_px: u32, max_zoom: u8);
    /// Attaches or detaches the bubble layer.
    fn set_bubble_layer_attached(&mut self, attached: bool);
    /// Attaches or detaches the heat layer.
    fn set_heat_layer_attached(&mut self, attached: bool);
    /// Removes all bubble markers.
    fn clear_bubbles(&mut self);
    /// Removes all heat points.
    fn clear_heat(&mut self);
    /// Adds one bubble marker.
    fn add_bubble(&mut self, marker: BubbleMarker);
    /// Replaces the heat layer's point set.
    fn set_heat_points(&mut self, points: Vec<HeatPoint>);
    /// Places the user-location marker.
    fn place_user_marker(&mut self, marker: UserMarker);
    /// Removes the user-location marker, if present.
    fn remove_user_marker(&mut self);
}

/// Rendering and viewport configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Default regional view center.
    pub default_center: LatLng,
    /// Default regional view zoom.
    pub default_zoom: u8,
    /// Pixel padding for fit-to-data.
    pub fit_padding_px: u32,
    /// Zoom ceiling for fit-to-data.
    pub fit_max_zoom: u8,
    /// Bubble marker radius in meters.
    pub bubble_radius_m: f64,
    /// Zoom applied when a bubble is clicked.
    pub focus_zoom: u8,
    /// Geographic sanity bound; `None` disables the guard.
    pub bounds_guard: Option<GeoBounds>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(-22.19, -48.79),
            default_zoom: 7,
            fit_padding_px: 50,
            fit_max_zoom: 16,
            bubble_radius_m: 60.0,
            focus_zoom: 16,
            bounds_guard: Some(SAO_PAULO_STATE_BOUNDS),
        }
    }
}
