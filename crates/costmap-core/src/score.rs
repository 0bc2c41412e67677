#![forbid(unsafe_code)]

//! Alignment scoring.
//!
//! Maps an item's per-priority score map plus a selected priority name to
//! a single intensity in `[0, 1]` used for color shading. Priority labels
//! and score-map keys drift apart upstream (labels are edited in the
//! admin UI, keys are frozen at ingest), so lookup is two-tier: exact
//! match on the canonical key first, then the first key related to it by
//! substring in either direction. Stricter or fuzzier matching would
//! change which programs light up; keep this policy as-is.

use crate::model::BudgetItem;

/// Intensity used when no priority is selected, the item has no score
/// map, or no key matches.
pub const NEUTRAL_INTENSITY: f64 = 0.5;

/// Raw scores are on a 1–5 scale; normalization divides by this.
pub const SCORE_SCALE: f64 = 5.0;

/// Canonicalize a priority name: lowercase, spaces to underscores.
///
/// This is the key scheme the data collaborator uses for score maps
/// (e.g. `"Safe Community"` → `"safe_community"`).
#[must_use]
pub fn canonical_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Normalize a raw 1–5 score to `[0, 1]` via `score / 5`, clamped.
///
/// A raw 4 maps to exactly 0.8. The alternative `(score - 1) / 4` formula
/// is intentionally not used anywhere.
#[must_use]
pub fn normalize_score(raw: f64) -> f64 {
    if !raw.is_finite() {
        return NEUTRAL_INTENSITY;
    }
    (raw / SCORE_SCALE).clamp(0.0, 1.0)
}

/// Computes per-item alignment intensity for a selected priority.
#[derive(Debug, Clone, Default)]
pub struct AlignmentScorer {
    key: Option<String>,
}

impl AlignmentScorer {
    /// Scorer for a selected priority name, or `None` for no selection.
    #[must_use]
    pub fn for_priority(priority: Option<&str>) -> Self {
        Self {
            key: priority.map(canonical_key),
        }
    }

    /// The canonical key this scorer looks up, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Intensity in `[0, 1]` for one item.
    ///
    /// Returns [`NEUTRAL_INTENSITY`] when no priority is selected, the
    /// item carries no scores, or nothing matches.
    #[must_use]
    pub fn intensity(&self, item: &BudgetItem) -> f64 {
        let Some(key) = self.key.as_deref() else {
            return NEUTRAL_INTENSITY;
        };
        if item.scores.is_empty() {
            return NEUTRAL_INTENSITY;
        }
        if let Some(raw) = item.scores.get(key) {
            return normalize_score(*raw);
        }
        // Substring fallback, first matching key in map order.
        for (candidate, raw) in &item.scores {
            if candidate.contains(key) || key.contains(candidate.as_str()) {
                return normalize_score(*raw);
            }
        }
        NEUTRAL_INTENSITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BudgetItem;

    fn item_with_scores(scores: &[(&str, f64)]) -> BudgetItem {
        scores
            .iter()
            .fold(BudgetItem::new(1, "x", "d", 1.0), |item, (k, v)| {
                item.with_score(*k, *v)
            })
    }

    #[test]
    fn canonical_key_lowercases_and_underscores() {
        assert_eq!(canonical_key("Safe Community"), "safe_community");
        assert_eq!(canonical_key("  Mobility "), "mobility");
    }

    #[test]
    fn raw_four_normalizes_to_point_eight() {
        // Locks in the score/5 formula.
        assert_eq!(normalize_score(4.0), 0.8);
        assert_eq!(normalize_score(5.0), 1.0);
        assert_eq!(normalize_score(0.0), 0.0);
    }

    #[test]
    fn normalize_clamps_out_of_range_and_non_finite() {
        assert_eq!(normalize_score(9.0), 1.0);
        assert_eq!(normalize_score(-2.0), 0.0);
        assert_eq!(normalize_score(f64::NAN), NEUTRAL_INTENSITY);
    }

    #[test]
    fn exact_match_wins() {
        let item = item_with_scores(&[("safe_community", 4.0), ("safe", 1.0)]);
        let scorer = AlignmentScorer::for_priority(Some("Safe Community"));
        assert_eq!(scorer.intensity(&item), 0.8);
    }

    #[test]
    fn substring_fallback_in_both_directions() {
        // Score key contains the canonical key.
        let item = item_with_scores(&[("community_safety_priority", 5.0)]);
        let scorer = AlignmentScorer::for_priority(Some("community safety"));
        assert_eq!(scorer.intensity(&item), 1.0);

        // Canonical key contains the score key.
        let item = item_with_scores(&[("mobility", 2.0)]);
        let scorer = AlignmentScorer::for_priority(Some("Mobility and Transit"));
        assert_eq!(scorer.intensity(&item), 0.4);
    }

    #[test]
    fn neutral_when_unselected_unscored_or_unmatched() {
        let scored = item_with_scores(&[("mobility", 5.0)]);
        assert_eq!(
            AlignmentScorer::for_priority(None).intensity(&scored),
            NEUTRAL_INTENSITY
        );

        let unscored = BudgetItem::new(2, "y", "d", 1.0);
        assert_eq!(
            AlignmentScorer::for_priority(Some("mobility")).intensity(&unscored),
            NEUTRAL_INTENSITY
        );

        assert_eq!(
            AlignmentScorer::for_priority(Some("parks")).intensity(&scored),
            NEUTRAL_INTENSITY
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalize_always_lands_in_unit_interval(raw in prop::num::f64::ANY) {
                let n = normalize_score(raw);
                prop_assert!((0.0..=1.0).contains(&n));
            }

            #[test]
            fn canonical_key_is_idempotent(name in "[A-Za-z ]{0,24}") {
                let once = canonical_key(&name);
                prop_assert_eq!(canonical_key(&once), once.clone());
                prop_assert!(!once.contains(char::is_uppercase));
                prop_assert!(!once.contains(' '));
            }

            #[test]
            fn intensity_is_bounded_for_any_scores(
                raw in prop::num::f64::ANY,
                key in "[a-z_]{1,16}",
            ) {
                let item = BudgetItem::new(1, "x", "d", 1.0).with_score(key.clone(), raw);
                let scorer = AlignmentScorer::for_priority(Some(&key));
                let i = scorer.intensity(&item);
                prop_assert!((0.0..=1.0).contains(&i));
            }
        }
    }
}
