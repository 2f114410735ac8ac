//! Locale-insensitive text normalization.
//!
//! A single deterministic pipeline applied symmetrically to option-list
//! display names and to user queries (typed, spoken, or derived from
//! reverse geocoding), so that "São Paulo", "SAO PAULO", and
//! "sao  paulo" all compare equal.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalizes a string for matching.
///
/// The pipeline:
/// 1. NFD decomposition, dropping combining marks (diacritic strip)
/// 2. Lowercase
/// 3. Collapse whitespace runs to single spaces
/// 4. Trim
#[must_use]
pub fn normalize(input: &str) -> String {
    let stripped: String = input.nfd().filter(|c| !is_combining_mark(*c)).collect();
    let lowered = stripped.to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize("São Paulo"), "sao paulo");
        assert_eq!(normalize("Ribeirão Preto"), "ribeirao preto");
    }

    #[test]
    fn folds_case() {
        assert_eq!(normalize("CAMPINAS"), "campinas");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(normalize("  santo   andré "), "santo andre");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize("   "), "");
    }
}
