//! `reqwest` implementation of the [`Backend`] trait.

use async_trait::async_trait;
use geojson::FeatureCollection;
use sentinela_api_models::{
    InsightsReport, InsightsRequest, OccurrencesResponse, OptionListResponse, occurrence_query,
};
use sentinela_filter_models::{Dimension, FilterCriteria, OptionItem};
use serde::de::DeserializeOwned;

use crate::{ApiError, Backend};

/// HTTP client for the Sentinela backend.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against `base_url` (e.g. `http://127.0.0.1:8000/api`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Reads the response body, mapping non-success statuses to
    /// [`ApiError::Status`] and undecodable 2xx bodies to
    /// [`ApiError::Shape`].
    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Shape {
            message: e.to_string(),
        })
    }
}

/// Builds an [`ApiError::Status`], pulling the structured `detail`
/// field out of the body when the backend provides one.
fn status_error(status: u16, body: &str) -> ApiError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["detail"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string());
    ApiError::Status { status, detail }
}

/// Endpoint path and parent query key for one dimension.
const fn endpoint(dimension: Dimension) -> (&'static str, Option<&'static str>) {
    match dimension {
        Dimension::Region => ("/regioes", None),
        Dimension::Municipality => ("/municipios", Some("regiao")),
        Dimension::Neighborhood => ("/bairros", Some("municipio")),
        Dimension::CrimeType => ("/delitos", None),
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn fetch_options(
        &self,
        dimension: Dimension,
        parent: Option<&str>,
    ) -> Result<Vec<OptionItem>, ApiError> {
        let (path, parent_key) = endpoint(dimension);
        let mut request = self.client.get(self.url(path));
        if let (Some(key), Some(value)) = (parent_key, parent) {
            request = request.query(&[(key, value)]);
        }

        log::debug!("Fetching {dimension} options (parent: {parent:?})");
        let response = request.send().await?;
        let body: OptionListResponse = Self::read_json(response).await?;
        Ok(body.into_options())
    }

    async fn fetch_occurrences(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<FeatureCollection, ApiError> {
        let params = occurrence_query(criteria);
        let response = self
            .client
            .get(self.url("/ocorrencias"))
            .query(&params)
            .send()
            .await?;
        let body: OccurrencesResponse = Self::read_json(response).await?;
        log::debug!(
            "Fetched {} occurrence features",
            body.geojson.features.len()
        );
        Ok(body.geojson)
    }

    async fn fetch_insights(&self, request: &InsightsRequest) -> Result<InsightsReport, ApiError> {
        let response = self
            .client
            .post(self.url("/insights"))
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_scope_by_parent_dimension() {
        assert_eq!(endpoint(Dimension::Region), ("/regioes", None));
        assert_eq!(
            endpoint(Dimension::Municipality),
            ("/municipios", Some("regiao"))
        );
        assert_eq!(
            endpoint(Dimension::Neighborhood),
            ("/bairros", Some("municipio"))
        );
        assert_eq!(endpoint(Dimension::CrimeType), ("/delitos", None));
    }

    #[test]
    fn status_error_extracts_structured_detail() {
        let err = status_error(503, r#"{"detail":"Serviço indisponível."}"#);
        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, 503);
                assert_eq!(detail, "Serviço indisponível.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_error_falls_back_to_raw_body() {
        let err = status_error(500, "Internal Server Error\n");
        match err {
            ApiError::Status { detail, .. } => assert_eq!(detail, "Internal Server Error"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.url("/regioes"), "http://localhost:8000/api/regioes");
    }
}
