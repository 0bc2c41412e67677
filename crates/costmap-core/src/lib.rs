#![forbid(unsafe_code)]

//! Core data model for the costmap budget visualization engine.
//!
//! This crate holds the pieces every other costmap crate builds on:
//!
//! - [`model`] - budget items, quartiles, and tolerant record ingest
//! - [`geometry`] - float rectangles for treemap tiles
//! - [`score`] - priority alignment scoring and normalization

pub mod geometry;
pub mod model;
pub mod score;

pub use geometry::RectF;
pub use model::{BudgetItem, IngestError, ItemId, Quartile, cost_span, ingest_json, ingest_values};
pub use score::{AlignmentScorer, NEUTRAL_INTENSITY, canonical_key, normalize_score};
