#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Unified search resolution for the Sentinela dashboard.
//!
//! Typed search, voice search, and geolocation-derived place names all
//! terminate in [`resolve`], which matches the normalized query against
//! the currently loaded option lists and names the filter dimension to
//! mutate. One resolution algorithm regardless of input modality.

pub mod input;

use sentinela_filter_models::{Dimension, FilterState, OptionItem, text};

/// How the normalized query is compared against option names.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// The normalized forms must be equal.
    #[default]
    Exact,
    /// The normalized option name must contain the normalized query.
    Contains,
}

/// A resolved search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// The dimension the query matched.
    pub dimension: Dimension,
    /// The matched option.
    pub option: OptionItem,
}

/// Search priority: most specific dimension first, so a neighborhood
/// name wins over a similarly-named municipality or region.
const PRIORITY: [Dimension; 3] = [
    Dimension::Neighborhood,
    Dimension::Municipality,
    Dimension::Region,
];

/// Resolves a raw query against the loaded option lists.
///
/// The query is normalized (case-fold, diacritic strip, trim) and
/// compared against each loaded list in priority order. Lists that are
/// not in the `Ready` state are skipped. Returns `None` for a blank
/// query or when nothing matches; the caller reports "not found" and
/// leaves all state unchanged.
#[must_use]
pub fn resolve(state: &FilterState, raw_text: &str, strategy: MatchStrategy) -> Option<SearchMatch> {
    let query = text::normalize(raw_text);
    if query.is_empty() {
        return None;
    }

    for dimension in PRIORITY {
        let Some(options) = state.loaded_options(dimension) else {
            continue;
        };
        let matched = options.iter().find(|option| {
            let name = text::normalize(&option.display_name);
            match strategy {
                MatchStrategy::Exact => name == query,
                MatchStrategy::Contains => name.contains(&query),
            }
        });
        if let Some(option) = matched {
            log::debug!(
                "Query {raw_text:?} resolved to {dimension} {:?}",
                option.display_name
            );
            return Some(SearchMatch {
                dimension,
                option: option.clone(),
            });
        }
    }

    log::debug!("Query {raw_text:?} matched no loaded option");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(
        regions: Vec<OptionItem>,
        municipalities: Vec<OptionItem>,
        neighborhoods: Vec<OptionItem>,
    ) -> FilterState {
        let mut state = FilterState::new();
        for (dimension, options) in [
            (Dimension::Region, regions),
            (Dimension::Municipality, municipalities),
            (Dimension::Neighborhood, neighborhoods),
        ] {
            let token = state.begin_reload(dimension);
            state.apply_options(token, options);
        }
        state
    }

    #[test]
    fn lowercase_query_without_diacritics_matches_municipality() {
        let state = state_with(
            vec![OptionItem::new("5", "REGIÃO DE CAMPINAS")],
            vec![OptionItem::new("campinas", "Campinas")],
            vec![],
        );

        let matched = resolve(&state, "campinas", MatchStrategy::Exact).unwrap();

        assert_eq!(matched.dimension, Dimension::Municipality);
        assert_eq!(matched.option.display_name, "Campinas");
    }

    #[test]
    fn neighborhood_wins_over_similarly_named_municipality() {
        let state = state_with(
            vec![],
            vec![OptionItem::new("centro", "Centro")],
            vec![OptionItem::new("centro-nb", "Centro")],
        );

        let matched = resolve(&state, "CENTRO", MatchStrategy::Exact).unwrap();

        assert_eq!(matched.dimension, Dimension::Neighborhood);
        assert_eq!(matched.option.id, "centro-nb");
    }

    #[test]
    fn no_match_returns_none() {
        let state = state_with(
            vec![OptionItem::new("5", "Santos")],
            vec![OptionItem::new("campinas", "Campinas")],
            vec![],
        );
        assert_eq!(resolve(&state, "guarulhos", MatchStrategy::Exact), None);
    }

    #[test]
    fn blank_query_returns_none() {
        let state = state_with(vec![OptionItem::new("5", "Santos")], vec![], vec![]);
        assert_eq!(resolve(&state, "   ", MatchStrategy::Exact), None);
    }

    #[test]
    fn contains_strategy_matches_partial_names() {
        let state = state_with(
            vec![],
            vec![OptionItem::new("sjc", "São José dos Campos")],
            vec![],
        );

        assert_eq!(resolve(&state, "jose", MatchStrategy::Exact), None);
        let matched = resolve(&state, "jose", MatchStrategy::Contains).unwrap();
        assert_eq!(matched.option.id, "sjc");
    }

    #[test]
    fn unloaded_lists_are_skipped() {
        // Neighborhood list still loading; the municipality match wins.
        let mut state = FilterState::new();
        let token = state.begin_reload(Dimension::Municipality);
        state.apply_options(token, vec![OptionItem::new("campinas", "Campinas")]);
        state.begin_reload(Dimension::Neighborhood);

        let matched = resolve(&state, "campinas", MatchStrategy::Exact).unwrap();
        assert_eq!(matched.dimension, Dimension::Municipality);
    }
}
