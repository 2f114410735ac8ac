#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Insights coordinator.
//!
//! Submits the current filter criteria to the analytics endpoint and
//! shapes the response into a ranked, collapsible breakdown. A
//! zero-total result is a valid, distinct state (analysis and
//! recommendation without breakdown); a malformed response fails at
//! deserialization and is surfaced as an error, never rendered blank.

use sentinela_api::{ApiError, Backend};
use sentinela_api_models::{BreakdownEntry, InsightsReport, InsightsRequest};
use sentinela_filter_models::FilterCriteria;

/// How many breakdown entries are shown inline; the remainder sits
/// behind a show-more toggle.
pub const INLINE_LIMIT: usize = 10;

/// Renderable insights result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightsView {
    /// Total occurrence count for the filter set.
    pub total: u64,
    /// Top breakdown entries, sorted descending by count.
    pub inline: Vec<BreakdownEntry>,
    /// Remaining entries, available behind the show-more toggle.
    pub collapsed: Vec<BreakdownEntry>,
    /// One-sentence analysis.
    pub analysis: String,
    /// One-sentence recommendation.
    pub recommendation: String,
}

impl InsightsView {
    /// Shapes a validated report for rendering.
    ///
    /// The breakdown is sorted descending by count and split at
    /// [`INLINE_LIMIT`]. A zero-total report renders no breakdown at
    /// all, whatever the response carried.
    #[must_use]
    pub fn from_report(report: InsightsReport) -> Self {
        let (inline, collapsed) = if report.quantidade_total == 0 {
            (Vec::new(), Vec::new())
        } else {
            let mut entries = report.detalhamento_ocorrencias;
            entries.sort_by(|a, b| b.quantidade.cmp(&a.quantidade));
            let collapsed = entries.split_off(entries.len().min(INLINE_LIMIT));
            (entries, collapsed)
        };

        Self {
            total: report.quantidade_total,
            inline,
            collapsed,
            analysis: report.analise_curta,
            recommendation: report.recomendacao_curta,
        }
    }

    /// Whether there is any breakdown to show.
    #[must_use]
    pub fn has_breakdown(&self) -> bool {
        !self.inline.is_empty()
    }
}

/// Requests the analytical summary for the current filter set.
///
/// # Errors
///
/// Returns [`ApiError`] on transport failure, non-success status, or a
/// malformed response body (missing required fields).
pub async fn request_insights(
    backend: &dyn Backend,
    criteria: &FilterCriteria,
) -> Result<InsightsView, ApiError> {
    let request = InsightsRequest::from(criteria);
    let report = backend.fetch_insights(&request).await?;
    log::debug!(
        "Insights: {} occurrences across {} types",
        report.quantidade_total,
        report.detalhamento_ocorrencias.len()
    );
    Ok(InsightsView::from_report(report))
}
