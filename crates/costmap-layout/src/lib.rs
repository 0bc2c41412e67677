#![forbid(unsafe_code)]

//! Weighted treemap layout.
//!
//! [`Treemap::split`] partitions a rectangle among an ordered list of
//! positive weights so that each slice's area is proportional to its
//! weight. The algorithm is a recursive binary space partition with a
//! greedy balance heuristic: at every level it scans all split points,
//! keeps the one whose two halves are closest in total weight, and cuts
//! along the container's longer side. It favors roughly equal-area halves
//! per cut rather than near-square tiles, so it is *not* a squarified
//! treemap; the simpler heuristic is kept deliberately because it matches
//! the rectangle placement the rest of the system was built around.
//!
//! The split scan is O(n) per call across O(n) calls, so the worst case
//! is O(n²), fine for the tens to low hundreds of entries a budget view
//! produces.
//!
//! Degenerate input never panics: an empty list, a non-positive total
//! weight, or a collapsed container yields no placements; a zero or
//! negative weight drops that entry without disturbing its neighbors;
//! and any branch that would produce a non-finite sub-rectangle is
//! silently dropped. Every placement stays inside the container.

pub use costmap_core::geometry::RectF;

/// Default minimum side length for a leaf tile, in layout units.
///
/// Keeps lone tiles clickable even when the container is tiny.
pub const DEFAULT_MIN_LEAF_SIDE: f64 = 20.0;

/// One positioned entry from a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index of the entry in the input weight list.
    pub index: usize,
    /// Assigned rectangle.
    pub rect: RectF,
}

/// Treemap layout configuration.
#[derive(Debug, Clone, Copy)]
pub struct Treemap {
    min_leaf_side: f64,
}

impl Default for Treemap {
    fn default() -> Self {
        Self::new()
    }
}

impl Treemap {
    /// Create a layout with the default leaf floor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_leaf_side: DEFAULT_MIN_LEAF_SIDE,
        }
    }

    /// Set the minimum leaf side length.
    ///
    /// A floor of `0.0` disables it, which makes the output an exact
    /// partition of the container for any positive finite weights.
    #[must_use]
    pub const fn min_leaf_side(mut self, side: f64) -> Self {
        self.min_leaf_side = side;
        self
    }

    /// Partition `area` among `weights`, one placement per entry.
    ///
    /// Placements come back in input order of their subtrees (left half
    /// before right half at every cut). Any non-finite weight empties
    /// the whole result; a zero or negative weight omits only that
    /// entry. Entries in branches that collapse to zero or non-finite
    /// extents are omitted rather than reported with bogus geometry.
    #[must_use]
    pub fn split(&self, weights: &[f64], area: RectF) -> Vec<Placement> {
        if weights.iter().any(|w| !w.is_finite()) {
            return Vec::new();
        }
        // Negative weights would push split fractions outside [0, 1]
        // and shift sub-rectangles out of the container. Treat them as
        // zero so the entry is dropped and its neighbors stay put.
        let weights: Vec<f64> = weights.iter().map(|w| w.max(0.0)).collect();
        let mut out = Vec::with_capacity(weights.len());
        self.partition(&weights, 0, area, &mut out);
        out
    }

    fn partition(&self, weights: &[f64], base: usize, area: RectF, out: &mut Vec<Placement>) {
        if weights.is_empty() || !area.is_finite() || area.is_empty() {
            return;
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return;
        }

        if let [_single] = weights {
            let rect = RectF::new(
                area.x,
                area.y,
                area.width.max(self.min_leaf_side),
                area.height.max(self.min_leaf_side),
            );
            if rect.is_finite() {
                out.push(Placement { index: base, rect });
            }
            return;
        }

        // Scan every split point for the most weight-balanced cut.
        // First index wins ties.
        let mut best_index = 1;
        let mut best_ratio = f64::INFINITY;
        let mut prefix = 0.0;
        for (i, w) in weights.iter().enumerate().take(weights.len() - 1) {
            prefix += w;
            let left = prefix;
            let right = total - prefix;
            let ratio = if left > 0.0 && right > 0.0 {
                (left / right).max(right / left)
            } else {
                f64::INFINITY
            };
            if ratio < best_ratio {
                best_ratio = ratio;
                best_index = i + 1;
            }
        }

        let left_sum: f64 = weights[..best_index].iter().sum();
        let left_frac = left_sum / total;

        // Cut along the longer side.
        let (left_area, right_area) = if area.width > area.height {
            let left_w = left_frac * area.width;
            (
                RectF::new(area.x, area.y, left_w, area.height),
                RectF::new(area.x + left_w, area.y, area.width - left_w, area.height),
            )
        } else {
            let left_h = left_frac * area.height;
            (
                RectF::new(area.x, area.y, area.width, left_h),
                RectF::new(area.x, area.y + left_h, area.width, area.height - left_h),
            )
        };

        self.partition(&weights[..best_index], base, left_area, out);
        self.partition(&weights[best_index..], base + best_index, right_area, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact() -> Treemap {
        Treemap::new().min_leaf_side(0.0)
    }

    #[test]
    fn empty_input_yields_no_placements() {
        let area = RectF::from_size(200.0, 100.0);
        assert!(Treemap::new().split(&[], area).is_empty());
    }

    #[test]
    fn collapsed_container_yields_no_placements() {
        assert!(
            Treemap::new()
                .split(&[1.0, 2.0], RectF::from_size(0.0, 100.0))
                .is_empty()
        );
        assert!(
            Treemap::new()
                .split(&[1.0, 2.0], RectF::from_size(100.0, -5.0))
                .is_empty()
        );
    }

    #[test]
    fn zero_total_weight_yields_no_placements() {
        let area = RectF::from_size(200.0, 100.0);
        assert!(Treemap::new().split(&[0.0, 0.0, 0.0], area).is_empty());
    }

    #[test]
    fn non_finite_weights_yield_no_placements() {
        let area = RectF::from_size(200.0, 100.0);
        assert!(Treemap::new().split(&[1.0, f64::NAN], area).is_empty());
        assert!(Treemap::new().split(&[1.0, f64::INFINITY], area).is_empty());
    }

    #[test]
    fn equal_pair_splits_wide_container_in_half() {
        let area = RectF::from_size(200.0, 100.0);
        let placements = Treemap::new().split(&[100.0, 100.0], area);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].index, 0);
        assert_eq!(placements[0].rect, RectF::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(placements[1].index, 1);
        assert_eq!(placements[1].rect, RectF::new(100.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn unequal_pair_splits_proportionally() {
        let area = RectF::from_size(400.0, 100.0);
        let placements = Treemap::new().split(&[300.0, 100.0], area);
        assert_eq!(placements[0].rect, RectF::new(0.0, 0.0, 300.0, 100.0));
        assert_eq!(placements[1].rect, RectF::new(300.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn tall_container_splits_vertically() {
        let area = RectF::from_size(100.0, 200.0);
        let placements = Treemap::new().split(&[1.0, 1.0], area);
        assert_eq!(placements[0].rect, RectF::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(placements[1].rect, RectF::new(0.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn single_entry_gets_full_container() {
        let area = RectF::new(5.0, 7.0, 300.0, 200.0);
        let placements = Treemap::new().split(&[42.0], area);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].rect, area);
    }

    #[test]
    fn leaf_floor_prevents_degenerate_tiles() {
        let area = RectF::from_size(8.0, 5.0);
        let placements = Treemap::new().split(&[1.0], area);
        assert_eq!(placements[0].rect.width, DEFAULT_MIN_LEAF_SIDE);
        assert_eq!(placements[0].rect.height, DEFAULT_MIN_LEAF_SIDE);

        // Disabled floor keeps the true extent.
        let placements = exact().split(&[1.0], area);
        assert_eq!(placements[0].rect, area);
    }

    #[test]
    fn zero_weight_entry_is_dropped_not_placed() {
        let area = RectF::from_size(200.0, 100.0);
        let placements = exact().split(&[5.0, 0.0], area);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].index, 0);
        assert_eq!(placements[0].rect, area);
    }

    #[test]
    fn negative_weight_is_dropped_and_stays_in_bounds() {
        let area = RectF::from_size(100.0, 100.0);
        let placements = exact().split(&[-1.0, 5.0], area);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].index, 1);
        assert_eq!(placements[0].rect, area);

        // Survivors around a dropped entry keep their 3:1 shares.
        let area = RectF::from_size(200.0, 100.0);
        let placements = exact().split(&[-2.0, 3.0, 1.0], area);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].index, 1);
        assert_eq!(placements[0].rect, RectF::new(0.0, 0.0, 150.0, 100.0));
        assert_eq!(placements[1].index, 2);
        assert_eq!(placements[1].rect, RectF::new(150.0, 0.0, 50.0, 100.0));
    }

    #[test]
    fn split_scan_prefers_first_balanced_index() {
        // Both i=1 and i=2 give a 1:1 ratio; the first must win, so entry
        // 0 sits alone in the left half.
        let area = RectF::from_size(200.0, 100.0);
        let placements = exact().split(&[2.0, 1.0, 1.0], area);
        assert_eq!(placements[0].index, 0);
        assert_eq!(placements[0].rect, RectF::new(0.0, 0.0, 100.0, 100.0));
        // Right half holds entries 1 and 2, stacked vertically (100x100
        // is square; ties on side length cut height).
        assert_eq!(placements[1].rect, RectF::new(100.0, 0.0, 100.0, 50.0));
        assert_eq!(placements[2].rect, RectF::new(100.0, 50.0, 100.0, 50.0));
    }

    #[test]
    fn placements_cover_input_order() {
        let area = RectF::from_size(640.0, 480.0);
        let weights = [40.0, 25.0, 15.0, 10.0, 5.0, 5.0];
        let placements = exact().split(&weights, area);
        let indices: Vec<usize> = placements.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }
}
