#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter domain types for the Sentinela occurrence dashboard.
//!
//! Defines the current filter criteria, the cascading option lists for
//! each filter dimension, and the per-dimension request sequence numbers
//! that resolve races between overlapping option-list reloads. All
//! mutation goes through explicit setters; criteria are never partially
//! updated while a fetch is in flight.

pub mod text;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Reporting period for occurrence queries.
///
/// Serialized values match the backend query parameter
/// (`periodo=last_30_days` etc.).
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum Period {
    /// Rolling 30-day window.
    #[serde(rename = "last_30_days")]
    #[strum(serialize = "last_30_days")]
    Last30Days,
    /// Rolling 90-day window. This is the fallback when no period is
    /// selected.
    #[default]
    #[serde(rename = "last_quarter")]
    #[strum(serialize = "last_quarter")]
    LastQuarter,
    /// The full 2025 statistical year.
    #[serde(rename = "all_2025")]
    #[strum(serialize = "all_2025")]
    All2025,
}

/// A cascading filter dimension.
///
/// The geographic dimensions form a dependency chain
/// (region → municipality → neighborhood); crime type is independent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    /// Police-district region (the top of the geographic chain).
    Region,
    /// Municipality, constrained by the selected region.
    Municipality,
    /// Neighborhood, constrained by the selected municipality.
    Neighborhood,
    /// Crime type, independent of the geographic chain.
    CrimeType,
}

impl Dimension {
    /// All dimensions, in cascade order.
    pub const ALL: [Self; 4] = [
        Self::Region,
        Self::Municipality,
        Self::Neighborhood,
        Self::CrimeType,
    ];

    /// The dimension directly dependent on this one, if any.
    #[must_use]
    pub const fn dependent(self) -> Option<Self> {
        match self {
            Self::Region => Some(Self::Municipality),
            Self::Municipality => Some(Self::Neighborhood),
            Self::Neighborhood | Self::CrimeType => None,
        }
    }
}

/// One selectable entry in a cascading option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Backend identifier, passed back in query parameters.
    pub id: String,
    /// Human-readable name shown in the select control.
    pub display_name: String,
}

impl OptionItem {
    /// Convenience constructor.
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Lifecycle of one select control's option list.
///
/// These are the typed equivalents of the "loading", "no data", and
/// error placeholders. A select is only interactive in the `Ready`
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectState {
    /// A reload is in flight; the control is disabled.
    Loading,
    /// Options loaded and selectable.
    Ready(Vec<OptionItem>),
    /// The backend returned an empty list for the current parent scope.
    Empty,
    /// The reload failed; the control shows an error placeholder.
    Error,
}

impl SelectState {
    /// The loaded options, if this select is ready.
    #[must_use]
    pub fn options(&self) -> Option<&[OptionItem]> {
        match self {
            Self::Ready(items) => Some(items),
            _ => None,
        }
    }

    /// Whether the control is interactive.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// The current filter criteria.
///
/// Geographic selections are hierarchical: setting a region clears the
/// municipality and neighborhood, and setting a municipality clears the
/// neighborhood, so a stale child selection can never refer to a parent
/// it no longer belongs to.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Reporting period; always sent, defaulting to [`Period::LastQuarter`].
    pub period: Period,
    /// Selected region id.
    pub region: Option<String>,
    /// Selected municipality id.
    pub municipality: Option<String>,
    /// Selected neighborhood id.
    pub neighborhood: Option<String>,
    /// Selected crime-type id.
    pub crime_type: Option<String>,
    /// Free-text search term.
    pub search_term: String,
}

impl FilterCriteria {
    /// Sets the region, clearing the dependent municipality and
    /// neighborhood selections.
    pub fn set_region(&mut self, region: Option<String>) {
        self.region = region;
        self.municipality = None;
        self.neighborhood = None;
    }

    /// Sets the municipality, clearing the dependent neighborhood
    /// selection.
    pub fn set_municipality(&mut self, municipality: Option<String>) {
        self.municipality = municipality;
        self.neighborhood = None;
    }

    /// Sets the neighborhood.
    pub fn set_neighborhood(&mut self, neighborhood: Option<String>) {
        self.neighborhood = neighborhood;
    }

    /// Sets the crime type.
    pub fn set_crime_type(&mut self, crime_type: Option<String>) {
        self.crime_type = crime_type;
    }

    /// Sets the selection for `dimension`, enforcing the hierarchy
    /// invariants.
    pub fn select(&mut self, dimension: Dimension, value: Option<String>) {
        match dimension {
            Dimension::Region => self.set_region(value),
            Dimension::Municipality => self.set_municipality(value),
            Dimension::Neighborhood => self.set_neighborhood(value),
            Dimension::CrimeType => self.set_crime_type(value),
        }
    }

    /// The current selection for `dimension`.
    #[must_use]
    pub fn selection(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Region => self.region.as_deref(),
            Dimension::Municipality => self.municipality.as_deref(),
            Dimension::Neighborhood => self.neighborhood.as_deref(),
            Dimension::CrimeType => self.crime_type.as_deref(),
        }
    }

    /// Resets every criterion to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Decides whether a set of criteria counts as "filtered".
///
/// A filtered query fits the viewport to the returned data; an
/// unfiltered one resets to the default regional view. Whether the
/// free-text term participates is configurable because the product
/// iterations disagreed on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilteredPredicate {
    /// Whether a non-empty search term counts as a filter.
    pub count_search_term: bool,
}

impl Default for FilteredPredicate {
    fn default() -> Self {
        Self {
            count_search_term: true,
        }
    }
}

impl FilteredPredicate {
    /// Returns `true` if any dimension beyond the default period is set.
    #[must_use]
    pub fn is_filtered(&self, criteria: &FilterCriteria) -> bool {
        criteria.period != Period::default()
            || criteria.region.is_some()
            || criteria.municipality.is_some()
            || criteria.neighborhood.is_some()
            || criteria.crime_type.is_some()
            || (self.count_search_term && !criteria.search_term.trim().is_empty())
    }
}

/// Token identifying one option-list reload request.
///
/// Compared against the dimension's current sequence number when the
/// response arrives; only the most recently issued request may mutate
/// the option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    dimension: Dimension,
    seq: u64,
}

impl RequestToken {
    /// The dimension this token was issued for.
    #[must_use]
    pub const fn dimension(self) -> Dimension {
        self.dimension
    }
}

/// Outcome of applying an option-list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The response belonged to the latest request and was applied.
    Applied,
    /// A newer request for the same dimension superseded this response;
    /// it was discarded.
    Stale,
}

/// Option-list state for one dimension plus its request sequence number.
#[derive(Debug, Clone)]
struct DimensionSlot {
    options: SelectState,
    seq: u64,
}

impl DimensionSlot {
    const fn new() -> Self {
        Self {
            options: SelectState::Loading,
            seq: 0,
        }
    }
}

/// Holds the current criteria and the loaded option lists for every
/// cascading dimension.
///
/// Created once at startup; [`FilterState::reset`] restores the
/// criteria defaults without discarding loaded lists (they are reloaded
/// unscoped by the cascade resolver).
#[derive(Debug, Clone)]
pub struct FilterState {
    /// Current filter criteria.
    pub criteria: FilterCriteria,
    slots: [DimensionSlot; 4],
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterState {
    /// Creates a fresh state with every select in the loading state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            criteria: FilterCriteria {
                period: Period::LastQuarter,
                region: None,
                municipality: None,
                neighborhood: None,
                crime_type: None,
                search_term: String::new(),
            },
            slots: [
                DimensionSlot::new(),
                DimensionSlot::new(),
                DimensionSlot::new(),
                DimensionSlot::new(),
            ],
        }
    }

    const fn slot(&self, dimension: Dimension) -> &DimensionSlot {
        &self.slots[dimension as usize]
    }

    const fn slot_mut(&mut self, dimension: Dimension) -> &mut DimensionSlot {
        &mut self.slots[dimension as usize]
    }

    /// The select state for `dimension`.
    #[must_use]
    pub const fn options(&self, dimension: Dimension) -> &SelectState {
        &self.slot(dimension).options
    }

    /// The loaded option list for `dimension`, if ready.
    #[must_use]
    pub fn loaded_options(&self, dimension: Dimension) -> Option<&[OptionItem]> {
        self.slot(dimension).options.options()
    }

    /// Starts an option-list reload for `dimension`.
    ///
    /// The select drops to the loading placeholder immediately and the
    /// current selection for the dimension (and its dependents) is
    /// cleared, so a forgotten child selection can never outlive its
    /// parent. Returns the token that must accompany the response.
    pub fn begin_reload(&mut self, dimension: Dimension) -> RequestToken {
        self.criteria.select(dimension, None);
        let slot = self.slot_mut(dimension);
        slot.seq += 1;
        slot.options = SelectState::Loading;
        RequestToken {
            dimension,
            seq: slot.seq,
        }
    }

    /// Applies a successful option-list response.
    ///
    /// Discards the response if a newer reload for the same dimension
    /// was issued after `token`.
    pub fn apply_options(&mut self, token: RequestToken, options: Vec<OptionItem>) -> ApplyOutcome {
        let slot = self.slot_mut(token.dimension);
        if token.seq != slot.seq {
            return ApplyOutcome::Stale;
        }
        slot.options = if options.is_empty() {
            SelectState::Empty
        } else {
            SelectState::Ready(options)
        };
        ApplyOutcome::Applied
    }

    /// Records a failed option-list reload.
    ///
    /// Stale failures are discarded just like stale successes.
    pub fn fail_options(&mut self, token: RequestToken) -> ApplyOutcome {
        let slot = self.slot_mut(token.dimension);
        if token.seq != slot.seq {
            return ApplyOutcome::Stale;
        }
        slot.options = SelectState::Error;
        ApplyOutcome::Applied
    }

    /// Resets the criteria to their defaults.
    pub fn reset(&mut self) {
        self.criteria.clear();
    }
}
