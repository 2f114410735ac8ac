#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response types for the Sentinela backend REST API.
//!
//! These types mirror the JSON wire contract and are kept separate from
//! the filter domain types so the API shape can evolve independently.
//! Field names follow the backend's Portuguese vocabulary (`periodo`,
//! `regiao`, `delito`, ...).

use geojson::FeatureCollection;
use sentinela_filter_models::{FilterCriteria, OptionItem};
use serde::{Deserialize, Serialize};

/// One entry of an option-list response (`GET /regioes` etc.).
///
/// Older backend revisions omit the `id` field and key options by name;
/// the normalized name doubles as the identifier in that case, matching
/// what the backend expects back in query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiOption {
    /// Backend identifier for the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub nome: String,
}

impl From<ApiOption> for OptionItem {
    fn from(option: ApiOption) -> Self {
        let id = option
            .id
            .unwrap_or_else(|| sentinela_filter_models::text::normalize(&option.nome));
        Self {
            id,
            display_name: option.nome,
        }
    }
}

/// Envelope for the four option-list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionListResponse {
    /// The option entries, in backend order.
    pub data: Vec<ApiOption>,
}

impl OptionListResponse {
    /// Converts the wire entries into domain option items.
    #[must_use]
    pub fn into_options(self) -> Vec<OptionItem> {
        self.data.into_iter().map(OptionItem::from).collect()
    }
}

/// Response of `GET /ocorrencias`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrencesResponse {
    /// Point features with a `delito` property each.
    pub geojson: FeatureCollection,
}

/// Request body for `POST /insights`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsRequest {
    /// Reporting period parameter.
    pub periodo: String,
    /// Selected region id, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regiao: Option<String>,
    /// Selected municipality id, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipio: Option<String>,
    /// Selected neighborhood id, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bairro: Option<String>,
    /// Selected crime-type id, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delito: Option<String>,
}

impl From<&FilterCriteria> for InsightsRequest {
    fn from(criteria: &FilterCriteria) -> Self {
        Self {
            periodo: criteria.period.to_string(),
            regiao: criteria.region.clone(),
            municipio: criteria.municipality.clone(),
            bairro: criteria.neighborhood.clone(),
            delito: criteria.crime_type.clone(),
        }
    }
}

/// One crime-type count in the insights breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    /// Crime-type label.
    pub tipo: String,
    /// Occurrence count for the type.
    pub quantidade: u64,
}

/// Response of `POST /insights`.
///
/// Every field is required: a 2xx response missing one of them is a
/// malformed result and deserialization fails, which the caller treats
/// as a request failure rather than rendering blanks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsReport {
    /// Total occurrence count for the filtered set.
    pub quantidade_total: u64,
    /// Per-crime-type counts, unordered.
    pub detalhamento_ocorrencias: Vec<BreakdownEntry>,
    /// One-sentence analysis of the scenario.
    pub analise_curta: String,
    /// One-sentence safety recommendation.
    pub recomendacao_curta: String,
}

/// Builds the `GET /ocorrencias` query pairs from the criteria.
///
/// `periodo` is always present (falling back to the default period);
/// every other parameter is included only when set.
#[must_use]
pub fn occurrence_query(criteria: &FilterCriteria) -> Vec<(String, String)> {
    let mut params = vec![("periodo".to_string(), criteria.period.to_string())];
    for (key, value) in [
        ("regiao", criteria.region.as_deref()),
        ("municipio", criteria.municipality.as_deref()),
        ("bairro", criteria.neighborhood.as_deref()),
        ("delito", criteria.crime_type.as_deref()),
    ] {
        if let Some(value) = value {
            params.push((key.to_string(), value.to_string()));
        }
    }
    let term = criteria.search_term.trim();
    if !term.is_empty() {
        params.push(("termo_busca".to_string(), term.to_string()));
    }
    params
}
