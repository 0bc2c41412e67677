#![forbid(unsafe_code)]

//! Department aggregation.
//!
//! Groups an already-filtered item list by department, sums costs, and
//! averages each member's alignment intensity. The output order (total
//! cost descending, first-seen order for ties) is the order the layout
//! engine consumes, so it also determines rectangle placement.

use std::cmp::Ordering;
use std::collections::HashMap;

use costmap_core::model::BudgetItem;
use costmap_core::score::AlignmentScorer;

/// Fallback group for items with no department.
pub const FALLBACK_GROUP: &str = "Other";

/// A department-level rollup, derived per recompute and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Department name (or [`FALLBACK_GROUP`]).
    pub name: String,
    /// Sum of member item costs.
    pub total_cost: f64,
    /// Mean of member alignment intensities, in `[0, 1]`.
    pub average_score: f64,
    /// Member items in input order.
    pub items: Vec<BudgetItem>,
}

/// Effective group name for an item: empty or blank keys collapse to
/// [`FALLBACK_GROUP`].
#[must_use]
pub fn group_name(item: &BudgetItem) -> &str {
    let key = item.group_key.trim();
    if key.is_empty() { FALLBACK_GROUP } else { key }
}

/// Group filtered items by department.
///
/// Groups with zero items simply never appear. The scorer decides each
/// item's intensity contribution; with no priority selected every item
/// contributes the neutral value, so `average_score` stays neutral too.
#[must_use]
pub fn aggregate(items: &[&BudgetItem], scorer: &AlignmentScorer) -> Vec<Group> {
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Group, f64)> = Vec::new();

    for item in items {
        let name = group_name(item);
        let idx = *order.entry(name.to_string()).or_insert_with(|| {
            groups.push((
                Group {
                    name: name.to_string(),
                    total_cost: 0.0,
                    average_score: 0.0,
                    items: Vec::new(),
                },
                0.0,
            ));
            groups.len() - 1
        });
        let (group, score_sum) = &mut groups[idx];
        group.total_cost += item.cost;
        *score_sum += scorer.intensity(item);
        group.items.push((*item).clone());
    }

    let mut groups: Vec<Group> = groups
        .into_iter()
        .map(|(mut group, score_sum)| {
            group.average_score = score_sum / group.items.len() as f64;
            group
        })
        .collect();

    // Stable sort keeps first-seen order for equal totals.
    groups.sort_by(|a, b| {
        b.total_cost
            .partial_cmp(&a.total_cost)
            .unwrap_or(Ordering::Equal)
    });
    groups
}
