#![forbid(unsafe_code)]

//! Budget treemap core.
//!
//! costmap turns a flat list of budget line-items into a two-level
//! (department → program) treemap: rectangle areas proportional to cost,
//! colors encoding department identity or priority-alignment intensity,
//! with live filtering, search highlighting, and drill-down navigation.
//!
//! The pipeline is a pure function chain (filter, aggregate, layout,
//! color) re-run synchronously on every state change:
//!
//! ```
//! use costmap::prelude::*;
//!
//! let mut session = Session::new(SessionConfig::new().container(960.0, 600.0));
//! session.load_items(vec![
//!     BudgetItem::new(1, "Patrol", "Police", 4_200_000.0),
//!     BudgetItem::new(2, "Paramedics", "Fire", 2_800_000.0),
//! ]);
//! let tiles = session.recompute();
//! assert_eq!(tiles.len(), 2);
//! ```
//!
//! Rendering, REST serving, and navigation live in external
//! collaborators; this crate only produces the ordered tile list.

pub mod aggregate;
pub mod filter;
pub mod session;
pub mod view;

// --- Core re-exports -------------------------------------------------------

pub use costmap_core::geometry::RectF;
pub use costmap_core::model::{
    BudgetItem, IngestError, ItemId, Quartile, cost_span, ingest_json, ingest_values,
};
pub use costmap_core::score::{
    AlignmentScorer, NEUTRAL_INTENSITY, canonical_key, normalize_score,
};

// --- Layout re-exports -----------------------------------------------------

pub use costmap_layout::{DEFAULT_MIN_LEAF_SIDE, Placement, Treemap};

// --- Style re-exports ------------------------------------------------------

pub use costmap_style::{ColorMapper, ColorScheme, Rgb};

// --- Crate-local re-exports ------------------------------------------------

pub use aggregate::{FALLBACK_GROUP, Group, aggregate as aggregate_groups, group_name};
pub use filter::{FilterCriteria, SearchFilter};
pub use session::{
    Debouncer, SearchError, SearchProvider, Session, SessionConfig, Tile, TileKind,
};
pub use view::{Transition, ViewEvent, ViewState, reduce};

// --- Prelude ---------------------------------------------------------------

/// Common imports for hosts embedding the core.
pub mod prelude {
    pub use crate::{
        BudgetItem, ColorScheme, FilterCriteria, ItemId, Quartile, RectF, SearchFilter, Session,
        SessionConfig, Tile, TileKind, ViewEvent, ViewState,
    };
}
