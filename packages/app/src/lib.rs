#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard session for the Sentinela occurrence map.
//!
//! [`Session`] is the explicit lifecycle object tying the filter state,
//! the cascade resolver, the map renderer, and the insights coordinator
//! together. It owns the occurrence fetch pipeline, the reference-counted
//! busy indicator, theme persistence, and the user-facing notification
//! stream. Presentation stays behind traits ([`Notifier`],
//! [`PreferenceStore`], [`sentinela_map::MapView`]); the session emits
//! typed states, never markup.

pub mod busy;
pub mod session;

pub use busy::{BusyGuard, BusyIndicator, BusySink};
pub use session::Session;

use async_trait::async_trait;
use sentinela_geocoder::GeocodeError;

/// Preference key under which the dark-theme flag is stored.
pub const THEME_KEY: &str = "dark_theme";

/// Popup text for the user-location marker.
pub const USER_MARKER_POPUP: &str = "Você está aqui!";

/// Notification severity, matching the dashboard's alert levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational ("no occurrences found").
    Info,
    /// Recoverable problem ("nothing matched your search").
    Warning,
    /// Operation failed; previous state kept.
    Error,
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Emits one notification.
    fn notify(&self, severity: Severity, message: &str);
}

/// Key/value preference storage (theme flag persistence).
pub trait PreferenceStore: Send + Sync {
    /// Reads a stored value.
    fn get(&self, key: &str) -> Option<String>;
    /// Stores a value.
    fn set(&self, key: &str, value: &str);
}

/// Coordinates-to-place-name resolution for the geolocation path.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolves the settlement name at a position, if any.
    async fn place_name(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<String>, GeocodeError>;
}

/// [`ReverseGeocoder`] backed by a Nominatim instance.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a geocoder against the given Nominatim base URL.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new(
            reqwest::Client::new(),
            sentinela_geocoder::DEFAULT_BASE_URL,
        )
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn place_name(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<String>, GeocodeError> {
        let place =
            sentinela_geocoder::nominatim::reverse(&self.client, &self.base_url, latitude, longitude)
                .await?;
        Ok(place.map(|p| p.place_name))
    }
}
