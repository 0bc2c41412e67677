#![forbid(unsafe_code)]

//! Budget data model and record ingest.
//!
//! Items arrive from an external data collaborator as a JSON array of
//! records. Ingest is deliberately tolerant: records with a missing,
//! zero, negative, or non-numeric cost are dropped before any downstream
//! processing, and optional fields pass through opaquely. A dataset is
//! replaced atomically; items are read-only afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Stable identifier for budget items, assigned upstream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Create an item ID from its raw upstream value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse alignment-ranking bucket assigned to items upstream.
///
/// Quartile 1 is the most aligned with stated priorities, quartile 4 the
/// least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quartile {
    /// Quartile 1.
    MostAligned,
    /// Quartile 2.
    MoreAligned,
    /// Quartile 3.
    LessAligned,
    /// Quartile 4.
    LeastAligned,
}

impl Quartile {
    /// All quartiles in rank order.
    pub const ALL: [Quartile; 4] = [
        Quartile::MostAligned,
        Quartile::MoreAligned,
        Quartile::LessAligned,
        Quartile::LeastAligned,
    ];

    /// Numeric rank (1–4).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Quartile::MostAligned => 1,
            Quartile::MoreAligned => 2,
            Quartile::LessAligned => 3,
            Quartile::LeastAligned => 4,
        }
    }

    /// Convert a numeric rank to a quartile, returning `None` if out of range.
    #[must_use]
    pub const fn from_rank(rank: i64) -> Option<Self> {
        match rank {
            1 => Some(Quartile::MostAligned),
            2 => Some(Quartile::MoreAligned),
            3 => Some(Quartile::LessAligned),
            4 => Some(Quartile::LeastAligned),
            _ => None,
        }
    }

    /// Parse a quartile from the variety of shapes seen upstream.
    ///
    /// Accepts bare digits (`"2"`), `"Quartile N"` labels, and alignment
    /// text (`"Most Aligned"` .. `"Least Aligned"`), case-insensitively.
    /// Unrecognized text yields `None` rather than an error.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let t = text.trim().to_ascii_lowercase();
        if let Ok(n) = t.parse::<i64>() {
            return Self::from_rank(n);
        }
        for q in Self::ALL {
            let label = format!("quartile {}", q.rank());
            if t.contains(&label) {
                return Some(q);
            }
        }
        if t.contains("most aligned") {
            Some(Quartile::MostAligned)
        } else if t.contains("more aligned") {
            Some(Quartile::MoreAligned)
        } else if t.contains("less aligned") {
            Some(Quartile::LessAligned)
        } else if t.contains("least aligned") {
            Some(Quartile::LeastAligned)
        } else {
            None
        }
    }

    /// Short display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Quartile::MostAligned => "most aligned",
            Quartile::MoreAligned => "more aligned",
            Quartile::LessAligned => "less aligned",
            Quartile::LeastAligned => "least aligned",
        }
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single budget line item (a program within a department).
///
/// Immutable once loaded; filtering and layout only select and arrange
/// items, they never modify them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetItem {
    /// Stable upstream identifier.
    pub id: ItemId,
    /// Program name.
    pub name: String,
    /// Optional free-text description (searched by the local text filter).
    pub description: Option<String>,
    /// Optional service classification (searched by the local text filter).
    pub service_type: Option<String>,
    /// Owning department. Empty means unassigned; the aggregator maps it
    /// to the `"Other"` group.
    pub group_key: String,
    /// Total cost. Always finite and strictly positive after ingest.
    pub cost: f64,
    /// Optional alignment quartile.
    pub quartile: Option<Quartile>,
    /// Per-priority alignment scores on a 1–5 scale, keyed by canonical
    /// priority name.
    pub scores: BTreeMap<String, f64>,
}

impl BudgetItem {
    /// Create an item with the required fields; optional fields default
    /// to empty.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, group_key: impl Into<String>, cost: f64) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            description: None,
            service_type: None,
            group_key: group_key.into(),
            cost,
            quartile: None,
            scores: BTreeMap::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the service type.
    #[must_use]
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    /// Set the quartile.
    #[must_use]
    pub fn with_quartile(mut self, quartile: Quartile) -> Self {
        self.quartile = Some(quartile);
        self
    }

    /// Add a per-priority score (raw 1–5 scale).
    #[must_use]
    pub fn with_score(mut self, priority: impl Into<String>, score: f64) -> Self {
        self.scores.insert(priority.into(), score);
        self
    }
}

/// Full cost span `(min, max)` of a dataset, or `None` when empty.
///
/// The filter pipeline treats a budget range equal to this span as
/// inactive.
#[must_use]
pub fn cost_span(items: &[BudgetItem]) -> Option<(f64, f64)> {
    let mut iter = items.iter().map(|i| i.cost);
    let first = iter.next()?;
    let (min, max) = iter.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)));
    Some((min, max))
}

/// Cost field as it appears on the wire: a number, or anything else
/// (string, null, object) which invalidates the record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawCost {
    Number(f64),
    Invalid(serde_json::Value),
}

/// Quartile field as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawQuartile {
    Rank(i64),
    Text(String),
}

impl RawQuartile {
    fn parse(&self) -> Option<Quartile> {
        match self {
            RawQuartile::Rank(n) => Quartile::from_rank(*n),
            RawQuartile::Text(t) => Quartile::parse(t),
        }
    }
}

/// One record from the external data collaborator.
///
/// Field aliases follow the upstream REST payload, which names the cost
/// `total_cost`, the department `department` or `user_group`, and the
/// score map `priority_scores`.
#[derive(Debug, Clone, Deserialize)]
struct RawRecord {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    service_type: Option<String>,
    #[serde(default, alias = "department", alias = "user_group")]
    group_key: Option<String>,
    #[serde(default, alias = "total_cost")]
    cost: Option<RawCost>,
    #[serde(default)]
    quartile: Option<RawQuartile>,
    #[serde(default, alias = "priority_scores")]
    scores: BTreeMap<String, f64>,
}

/// Error loading an item payload.
#[derive(Debug)]
pub enum IngestError {
    /// Payload was not valid JSON.
    InvalidJson { message: String },
    /// Payload parsed but was not an array of records.
    NotAnArray,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson { message } => write!(f, "invalid item payload: {message}"),
            Self::NotAnArray => write!(f, "item payload must be a JSON array of records"),
        }
    }
}

impl std::error::Error for IngestError {}

/// Parse a JSON payload into budget items.
///
/// Per-record problems never fail the payload: records that do not match
/// the input contract, or whose cost is missing, non-numeric, non-finite,
/// zero, or negative, are dropped with a log event. Only a payload that
/// is not a JSON array is an error.
pub fn ingest_json(payload: &str) -> Result<Vec<BudgetItem>, IngestError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| IngestError::InvalidJson {
            message: e.to_string(),
        })?;
    let serde_json::Value::Array(records) = value else {
        return Err(IngestError::NotAnArray);
    };
    Ok(ingest_values(records))
}

/// Convert already-parsed JSON records into budget items, dropping
/// invalid ones.
#[must_use]
pub fn ingest_values(records: Vec<serde_json::Value>) -> Vec<BudgetItem> {
    let total = records.len();
    let mut items = Vec::with_capacity(total);
    for record in records {
        let raw: RawRecord = match serde_json::from_value(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "dropping malformed record");
                continue;
            }
        };
        let cost = match raw.cost {
            Some(RawCost::Number(c)) if c.is_finite() && c > 0.0 => c,
            _ => {
                warn!(id = raw.id, name = %raw.name, "dropping record with invalid cost");
                continue;
            }
        };
        items.push(BudgetItem {
            id: ItemId::new(raw.id),
            name: raw.name,
            description: raw.description,
            service_type: raw.service_type,
            group_key: raw.group_key.unwrap_or_default(),
            cost,
            quartile: raw.quartile.and_then(|q| q.parse()),
            scores: raw.scores,
        });
    }
    debug!(kept = items.len(), total, "ingested item records");
    items
}
