//! Input modality abstractions for voice and geolocation search.
//!
//! Browser-style speech and geolocation callbacks are modeled as
//! asynchronous tasks producing a single normalized outcome (text or
//! error) that feeds [`crate::resolve`], keeping one code path for
//! typed, spoken, and geolocated input.

use async_trait::async_trait;
use thiserror::Error;

/// Recognition locale for spoken search.
pub const SPEECH_LOCALE: &str = "pt-BR";

/// Errors from platform input capabilities.
#[derive(Debug, Error)]
pub enum InputError {
    /// The capability does not exist on this platform. The affected
    /// control is disabled for the rest of the session with an
    /// explanatory tooltip instead of failing at use time.
    #[error("{capability} is not supported on this platform")]
    Unavailable {
        /// Name of the missing capability.
        capability: &'static str,
    },

    /// The capability exists but the operation failed.
    #[error("{0}")]
    Failed(String),
}

/// A geographic position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Speech-to-text session: a single utterance in [`SPEECH_LOCALE`].
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Captures one utterance and returns its transcript.
    async fn recognize_once(&self) -> Result<String, InputError>;
}

/// Platform geolocation service.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns the device's current position.
    async fn current_position(&self) -> Result<Position, InputError>;
}
