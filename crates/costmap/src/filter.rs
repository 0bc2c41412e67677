#![forbid(unsafe_code)]

//! Composable item filtering.
//!
//! Every filter dimension is an independent predicate and all active
//! dimensions combine with logical AND. A dimension that is inactive
//! passes everything: an empty group set means all departments, an empty
//! quartile set means all quartiles, and a budget range spanning the
//! dataset's full cost span means no cost filtering. Filtering selects,
//! it never mutates; an empty result is a valid state, not an error.
//!
//! [`FilterCriteria`] is a pure value object. Updates build a new value
//! (`with_*` methods consume and return), so a host can keep prior
//! criteria around for undo without defensive copies.

use std::collections::{BTreeSet, HashSet};

use costmap_core::model::{BudgetItem, ItemId, Quartile, cost_span};

/// Search dimension state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchFilter {
    /// No active search.
    #[default]
    Inactive,
    /// Case-insensitive substring match against name, description,
    /// service type, and department (the local fallback).
    Text(String),
    /// Exact id membership, supplied by the external semantic-search
    /// collaborator. An empty set is a search with zero hits, which
    /// legitimately filters everything out.
    Ids(HashSet<ItemId>),
}

/// Filter state for one visualization session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Inclusive cost bounds, or `None` when unset.
    pub budget_range: Option<(f64, f64)>,
    /// Departments to keep; empty keeps all.
    pub group_keys: BTreeSet<String>,
    /// Quartiles to keep; empty keeps all.
    pub quartiles: BTreeSet<Quartile>,
    /// Search dimension.
    pub search: SearchFilter,
}

impl FilterCriteria {
    /// Criteria with every dimension inactive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inclusive budget range. Bounds are swapped into order if
    /// reversed; a non-finite bound clears the range.
    #[must_use]
    pub fn with_budget_range(mut self, min: f64, max: f64) -> Self {
        if min.is_finite() && max.is_finite() {
            self.budget_range = Some(if min <= max { (min, max) } else { (max, min) });
        } else {
            self.budget_range = None;
        }
        self
    }

    /// Clear the budget range.
    #[must_use]
    pub fn without_budget_range(mut self) -> Self {
        self.budget_range = None;
        self
    }

    /// Add a department to the group filter.
    #[must_use]
    pub fn with_group_key(mut self, key: impl Into<String>) -> Self {
        self.group_keys.insert(key.into());
        self
    }

    /// Replace the group filter wholesale.
    #[must_use]
    pub fn with_group_keys(mut self, keys: impl IntoIterator<Item = String>) -> Self {
        self.group_keys = keys.into_iter().collect();
        self
    }

    /// Add a quartile to the quartile filter.
    #[must_use]
    pub fn with_quartile(mut self, quartile: Quartile) -> Self {
        self.quartiles.insert(quartile);
        self
    }

    /// Set the search dimension.
    #[must_use]
    pub fn with_search(mut self, search: SearchFilter) -> Self {
        self.search = search;
        self
    }

    /// Drop the cross-department dimensions (group keys and quartiles).
    ///
    /// Drilling into a department applies this: those filters no longer
    /// mean anything inside a single department. Budget range and search
    /// survive.
    #[must_use]
    pub fn without_group_dimensions(mut self) -> Self {
        self.group_keys.clear();
        self.quartiles.clear();
        self
    }

    /// Select the items from the full dataset that pass every active
    /// dimension, preserving input order.
    ///
    /// `items` must be the complete dataset: the budget range is judged
    /// inactive against its full cost span.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [BudgetItem]) -> Vec<&'a BudgetItem> {
        let span = cost_span(items);
        let needle = match &self.search {
            SearchFilter::Text(q) => {
                let q = q.trim().to_lowercase();
                if q.is_empty() { None } else { Some(q) }
            }
            _ => None,
        };
        items
            .iter()
            .filter(|item| self.passes(item, span, needle.as_deref()))
            .collect()
    }

    fn passes(&self, item: &BudgetItem, span: Option<(f64, f64)>, needle: Option<&str>) -> bool {
        if let Some((lo, hi)) = self.budget_range {
            // A range covering the full span filters nothing.
            let covers_all = span.is_some_and(|(min, max)| lo <= min && hi >= max);
            if !covers_all && !(item.cost >= lo && item.cost <= hi) {
                return false;
            }
        }
        if !self.group_keys.is_empty() && !self.group_keys.contains(&item.group_key) {
            return false;
        }
        if !self.quartiles.is_empty() {
            match item.quartile {
                Some(q) if self.quartiles.contains(&q) => {}
                _ => return false,
            }
        }
        match &self.search {
            SearchFilter::Inactive => true,
            SearchFilter::Ids(ids) => ids.contains(&item.id),
            SearchFilter::Text(_) => match needle {
                Some(needle) => text_matches(item, needle),
                None => true,
            },
        }
    }
}

fn text_matches(item: &BudgetItem, needle: &str) -> bool {
    let hit = |field: &str| field.to_lowercase().contains(needle);
    hit(&item.name)
        || item.description.as_deref().is_some_and(hit)
        || item.service_type.as_deref().is_some_and(hit)
        || hit(&item.group_key)
}
