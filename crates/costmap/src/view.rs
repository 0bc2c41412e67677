#![forbid(unsafe_code)]

//! Drill-down view state.
//!
//! Two steady states: the department overview and a single department's
//! program view. Transitions are a pure reducer over the pair
//! `(ViewState, FilterCriteria)` with no hidden component state, so
//! re-entering the overview with unchanged data and filters reproduces
//! the previous layout exactly.

use costmap_core::model::ItemId;

use crate::filter::FilterCriteria;

/// Which level of the hierarchy feeds the layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Department overview (initial state).
    #[default]
    Departments,
    /// Programs of one department.
    Programs {
        /// The drilled-into department.
        group: String,
    },
}

impl ViewState {
    /// True at the department level.
    #[must_use]
    pub fn is_departments(&self) -> bool {
        matches!(self, ViewState::Departments)
    }

    /// The drilled-into department, if any.
    #[must_use]
    pub fn selected_group(&self) -> Option<&str> {
        match self {
            ViewState::Departments => None,
            ViewState::Programs { group } => Some(group),
        }
    }
}

/// User interactions the state machine understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A department tile was clicked.
    SelectGroup(String),
    /// The breadcrumb back to the overview was clicked.
    Breadcrumb,
    /// A program tile was clicked.
    SelectItem(ItemId),
}

/// Result of one reduced event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State after the event.
    pub state: ViewState,
    /// Criteria after the event.
    pub criteria: FilterCriteria,
    /// Item to surface to the external details collaborator, if the
    /// event selected one.
    pub selected_item: Option<ItemId>,
}

/// Reduce one event against the current state and criteria.
///
/// Drilling into a department clears the group and quartile filter
/// dimensions (they no longer apply inside one department); budget range
/// and search persist through every transition. Events that make no
/// sense in the current state (breadcrumb at the overview, item click at
/// the overview) leave everything unchanged.
#[must_use]
pub fn reduce(state: &ViewState, criteria: &FilterCriteria, event: ViewEvent) -> Transition {
    match (state, event) {
        (_, ViewEvent::SelectGroup(group)) => Transition {
            state: ViewState::Programs { group },
            criteria: criteria.clone().without_group_dimensions(),
            selected_item: None,
        },
        (ViewState::Programs { .. }, ViewEvent::Breadcrumb) => Transition {
            state: ViewState::Departments,
            criteria: criteria.clone(),
            selected_item: None,
        },
        (ViewState::Programs { .. }, ViewEvent::SelectItem(id)) => Transition {
            state: state.clone(),
            criteria: criteria.clone(),
            selected_item: Some(id),
        },
        // No-ops at the overview.
        (ViewState::Departments, ViewEvent::Breadcrumb | ViewEvent::SelectItem(_)) => Transition {
            state: state.clone(),
            criteria: criteria.clone(),
            selected_item: None,
        },
    }
}
