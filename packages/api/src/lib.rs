#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP client for the Sentinela backend REST API.
//!
//! The [`Backend`] trait is the seam every coordinator consumes; the
//! [`ApiClient`] is its `reqwest` implementation. Requests are never
//! retried automatically — a failed request surfaces as a recoverable
//! error and the triggering control reverts to an error placeholder.

mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use geojson::FeatureCollection;
use sentinela_api_models::{InsightsReport, InsightsRequest};
use sentinela_filter_models::{Dimension, FilterCriteria, OptionItem};
use thiserror::Error;

/// Errors from backend API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status with structured detail when available.
    #[error("HTTP {status}: {detail}")]
    Status {
        /// Status code returned by the backend.
        status: u16,
        /// Error detail from the response body, or the raw body.
        detail: String,
    },

    /// The transport succeeded but the response shape was malformed.
    #[error("Malformed response: {message}")]
    Shape {
        /// Description of the shape violation.
        message: String,
    },
}

/// Backend REST surface consumed by the dashboard engine.
///
/// One implementation talks HTTP ([`ApiClient`]); tests substitute
/// in-memory fakes with controllable resolution order.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetches the option list for `dimension`, scoped by the parent
    /// selection when given (e.g. municipalities of one region).
    async fn fetch_options(
        &self,
        dimension: Dimension,
        parent: Option<&str>,
    ) -> Result<Vec<OptionItem>, ApiError>;

    /// Fetches the occurrence features matching `criteria`.
    async fn fetch_occurrences(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<FeatureCollection, ApiError>;

    /// Requests the analytical summary for the given filter set.
    async fn fetch_insights(&self, request: &InsightsRequest) -> Result<InsightsReport, ApiError>;
}
