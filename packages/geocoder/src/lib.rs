#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Nominatim / OpenStreetMap reverse geocoder client.
//!
//! Turns a geolocation fix into a place name so the location button can
//! feed the same text-resolution path as typed and spoken search.
//! Nominatim has strict rate limits: **1 request per second** maximum.
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/>

pub mod nominatim;

use thiserror::Error;

/// Default public Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Errors from reverse geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// A reverse-geocoded place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseGeocodedPlace {
    /// Settlement name (city, town, or village).
    pub place_name: String,
    /// Full display name returned by the geocoder.
    pub display_name: Option<String>,
}
