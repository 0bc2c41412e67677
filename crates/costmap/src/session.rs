#![forbid(unsafe_code)]

//! Visualization session.
//!
//! A [`Session`] owns everything one dashboard view needs: the loaded
//! items (replaced atomically, read-only afterwards), the filter
//! criteria, the drill-down state, the selected priority, and the
//! display configuration. [`Session::recompute`] runs the pure chain
//! filter → aggregate → layout → color and returns the ordered tile list
//! for the rendering collaborator; it is synchronous, side-effect-free,
//! and deterministic for a given session state.
//!
//! A session belongs to a single thread. A multi-user host must keep one
//! session per user and serialize writes to it; sharing one across
//! threads is not supported.

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use costmap_core::geometry::RectF;
use costmap_core::model::{BudgetItem, IngestError, ItemId, ingest_json};
use costmap_core::score::AlignmentScorer;
use costmap_layout::Treemap;
use costmap_style::{ColorMapper, ColorScheme, Rgb};

use crate::aggregate::{Group, aggregate, group_name};
use crate::filter::{FilterCriteria, SearchFilter};
use crate::view::{Transition, ViewEvent, ViewState, reduce};

/// Display configuration for one session.
///
/// Container dimensions are sanitized on construction: a non-finite or
/// non-positive value falls back to the default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Container width in layout units.
    pub container_width: f64,
    /// Container height in layout units.
    pub container_height: f64,
    /// Palette id.
    pub color_scheme: ColorScheme,
    /// Rectangles narrower than this are drawn without a text label.
    pub min_label_width: f64,
    /// Rectangles shorter than this are drawn without a text label.
    pub min_label_height: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            container_width: 960.0,
            container_height: 600.0,
            color_scheme: ColorScheme::default(),
            min_label_width: 48.0,
            min_label_height: 18.0,
        }
    }
}

impl SessionConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container size. Invalid dimensions keep the defaults.
    #[must_use]
    pub fn container(mut self, width: f64, height: f64) -> Self {
        if width.is_finite() && width > 0.0 {
            self.container_width = width;
        }
        if height.is_finite() && height > 0.0 {
            self.container_height = height;
        }
        self
    }

    /// Set the palette.
    #[must_use]
    pub fn color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    /// Set the label visibility thresholds.
    #[must_use]
    pub fn min_label_size(mut self, width: f64, height: f64) -> Self {
        if width.is_finite() && width >= 0.0 {
            self.min_label_width = width;
        }
        if height.is_finite() && height >= 0.0 {
            self.min_label_height = height;
        }
        self
    }
}

/// What a tile represents.
#[derive(Debug, Clone, PartialEq)]
pub enum TileKind {
    /// A department rollup at the overview level.
    Group {
        /// Department name.
        name: String,
        /// Sum of member costs.
        total_cost: f64,
        /// Mean alignment intensity.
        average_score: f64,
        /// Number of member programs.
        item_count: usize,
    },
    /// A single program inside the drilled department.
    Item {
        /// Stable item id.
        id: ItemId,
        /// Program name.
        name: String,
        /// Program cost.
        cost: f64,
        /// Alignment intensity for the selected priority.
        intensity: f64,
    },
}

impl TileKind {
    /// Display name of the underlying entity.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TileKind::Group { name, .. } | TileKind::Item { name, .. } => name,
        }
    }
}

/// One rectangle handed to the rendering collaborator.
///
/// Renderers must not alter the geometry, only draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// The entity this tile depicts.
    pub kind: TileKind,
    /// Assigned rectangle.
    pub rect: RectF,
    /// Fill color.
    pub fill: Rgb,
    /// Label color with readable contrast on the fill.
    pub label: Rgb,
    /// Whether the rectangle is large enough for a text label.
    pub show_label: bool,
}

/// Failure reported by an external search provider.
#[derive(Debug)]
pub enum SearchError {
    /// Backend failed or returned an unusable response.
    Backend {
        /// Provider-supplied description.
        message: String,
    },
    /// Provider did not answer in time.
    Timeout,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { message } => write!(f, "search backend failed: {message}"),
            Self::Timeout => write!(f, "search backend timed out"),
        }
    }
}

impl std::error::Error for SearchError {}

/// External semantic-search collaborator.
///
/// Implementations resolve a query string to a set of matching item ids.
/// Any error is downgraded at the session boundary to local substring
/// matching; it never reaches the layout core.
pub trait SearchProvider {
    /// Resolve a query to matching item ids.
    fn search(&self, query: &str) -> Result<HashSet<ItemId>, SearchError>;
}

/// Explicit-clock debounce gate for keystroke-driven recomputes.
///
/// The core recomputes fast, but a host feeding it every keystroke can
/// bound the work by only recomputing when [`Debouncer::ready`] fires.
/// The clock is passed in, so tests never sleep.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Recommended delay for text input.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

    /// Create a debouncer with the given delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record an input event at `now`, pushing the deadline back.
    pub fn record(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Check whether the debounced action should run at `now`.
    ///
    /// Returns `true` at most once per recorded burst.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether an input burst is waiting on its deadline.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

/// One visualization session: owned data, state, and the tile pipeline.
pub struct Session {
    items: Vec<BudgetItem>,
    criteria: FilterCriteria,
    view: ViewState,
    priority: Option<String>,
    config: SessionConfig,
    provider: Option<Box<dyn SearchProvider>>,
    layout: Treemap,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("items", &self.items.len())
            .field("criteria", &self.criteria)
            .field("view", &self.view)
            .field("priority", &self.priority)
            .field("config", &self.config)
            .field("provider", &self.provider.is_some())
            .finish()
    }
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            items: Vec::new(),
            criteria: FilterCriteria::new(),
            view: ViewState::Departments,
            priority: None,
            config,
            provider: None,
            layout: Treemap::new(),
        }
    }

    /// Attach an external semantic-search provider.
    #[must_use]
    pub fn with_search_provider(mut self, provider: Box<dyn SearchProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replace the dataset atomically.
    ///
    /// The view returns to the department overview since the previous
    /// drill target may not exist in the new data; criteria persist.
    pub fn load_items(&mut self, items: Vec<BudgetItem>) {
        debug!(count = items.len(), "dataset replaced");
        self.items = items;
        self.view = ViewState::Departments;
    }

    /// Parse and load a JSON payload from the data collaborator.
    pub fn load_json(&mut self, payload: &str) -> Result<(), IngestError> {
        let items = ingest_json(payload)?;
        self.load_items(items);
        Ok(())
    }

    /// The loaded items.
    #[must_use]
    pub fn items(&self) -> &[BudgetItem] {
        &self.items
    }

    /// Current filter criteria.
    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Replace the filter criteria with a new value.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Current view state.
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    /// Select the priority whose alignment drives tile shading, or
    /// `None` to shade by department identity.
    pub fn set_priority(&mut self, priority: Option<&str>) {
        self.priority = priority.map(str::to_string);
    }

    /// Selected priority name, if any.
    #[must_use]
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Set the search query.
    ///
    /// An attached provider resolves the query to item ids; if it fails,
    /// the failure is logged and the query falls back to local substring
    /// matching. A blank query deactivates the dimension.
    pub fn set_search_query(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.criteria = self.criteria.clone().with_search(SearchFilter::Inactive);
            return;
        }
        let search = match &self.provider {
            Some(provider) => match provider.search(query) {
                Ok(ids) => {
                    debug!(hits = ids.len(), "semantic search resolved");
                    SearchFilter::Ids(ids)
                }
                Err(e) => {
                    warn!(error = %e, "search provider failed, using local matching");
                    SearchFilter::Text(query.to_string())
                }
            },
            None => SearchFilter::Text(query.to_string()),
        };
        self.criteria = self.criteria.clone().with_search(search);
    }

    /// Apply a view event, returning the id of a selected item when the
    /// event was a program click (for the external details collaborator).
    pub fn handle(&mut self, event: ViewEvent) -> Option<ItemId> {
        let Transition {
            state,
            criteria,
            selected_item,
        } = reduce(&self.view, &self.criteria, event);
        debug!(from = ?self.view, to = ?state, "view transition");
        self.view = state;
        self.criteria = criteria;
        selected_item
    }

    /// Run the pure pipeline for the current state.
    ///
    /// An empty result means "no data for the current filters", a valid
    /// state the host should render as such, not an error.
    #[must_use]
    pub fn recompute(&self) -> Vec<Tile> {
        let filtered = self.criteria.apply(&self.items);
        let area = RectF::from_size(self.config.container_width, self.config.container_height);
        let scorer = AlignmentScorer::for_priority(self.priority.as_deref());
        let mapper = ColorMapper::new(self.config.color_scheme);
        let groups = aggregate(&filtered, &scorer);

        let tiles = match &self.view {
            ViewState::Departments => self.group_tiles(&groups, area, &mapper),
            ViewState::Programs { group } => {
                self.item_tiles(&filtered, &groups, group, area, &scorer, &mapper)
            }
        };
        debug!(tiles = tiles.len(), view = ?self.view, "recomputed layout");
        tiles
    }

    fn group_tiles(&self, groups: &[Group], area: RectF, mapper: &ColorMapper) -> Vec<Tile> {
        let weights: Vec<f64> = groups.iter().map(|g| g.total_cost).collect();
        self.layout
            .split(&weights, area)
            .into_iter()
            .map(|p| {
                let group = &groups[p.index];
                let fill = if self.priority.is_some() {
                    mapper.intensity(group.average_score)
                } else {
                    mapper.categorical(p.index)
                };
                self.tile(
                    TileKind::Group {
                        name: group.name.clone(),
                        total_cost: group.total_cost,
                        average_score: group.average_score,
                        item_count: group.items.len(),
                    },
                    p.rect,
                    fill,
                    mapper,
                )
            })
            .collect()
    }

    fn item_tiles(
        &self,
        filtered: &[&BudgetItem],
        groups: &[Group],
        group: &str,
        area: RectF,
        scorer: &AlignmentScorer,
        mapper: &ColorMapper,
    ) -> Vec<Tile> {
        // Programs are laid out largest-first, like the groups above
        // them; stable sort keeps input order for equal costs.
        let mut members: Vec<&BudgetItem> = filtered
            .iter()
            .copied()
            .filter(|item| group_name(item) == group)
            .collect();
        members.sort_by(|a, b| {
            b.cost
                .partial_cmp(&a.cost)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Departments keep their overview hue when no priority is
        // selected, so drilling doesn't recolor the world.
        let group_color = groups
            .iter()
            .position(|g| g.name == group)
            .map(|i| mapper.categorical(i));

        let weights: Vec<f64> = members.iter().map(|i| i.cost).collect();
        self.layout
            .split(&weights, area)
            .into_iter()
            .map(|p| {
                let item = members[p.index];
                let intensity = scorer.intensity(item);
                let fill = match (self.priority.as_deref(), group_color) {
                    (Some(_), _) => mapper.intensity(intensity),
                    (None, Some(color)) => color,
                    (None, None) => mapper.categorical(0),
                };
                self.tile(
                    TileKind::Item {
                        id: item.id,
                        name: item.name.clone(),
                        cost: item.cost,
                        intensity,
                    },
                    p.rect,
                    fill,
                    mapper,
                )
            })
            .collect()
    }

    fn tile(&self, kind: TileKind, rect: RectF, fill: Rgb, mapper: &ColorMapper) -> Tile {
        let show_label =
            rect.width >= self.config.min_label_width && rect.height >= self.config.min_label_height;
        Tile {
            kind,
            rect,
            fill,
            label: mapper.label_on(fill),
            show_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(items: Vec<BudgetItem>) -> Session {
        let mut session = Session::new(SessionConfig::new().container(200.0, 100.0));
        session.load_items(items);
        session
    }

    #[test]
    fn empty_dataset_yields_no_tiles() {
        let session = session_with(Vec::new());
        assert!(session.recompute().is_empty());
    }

    #[test]
    fn department_tiles_split_by_total_cost() {
        let session = session_with(vec![
            BudgetItem::new(1, "a", "Police", 60.0),
            BudgetItem::new(2, "b", "Police", 40.0),
            BudgetItem::new(3, "c", "Fire", 100.0),
        ]);
        let tiles = session.recompute();
        assert_eq!(tiles.len(), 2);
        // Equal totals: Police was seen first, so it places first.
        assert_eq!(tiles[0].kind.name(), "Police");
        assert_eq!(tiles[0].rect, RectF::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(tiles[1].kind.name(), "Fire");
        assert_eq!(tiles[1].rect, RectF::new(100.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn drill_down_lays_out_programs_largest_first() {
        let mut session = session_with(vec![
            BudgetItem::new(1, "Small", "Police", 100.0),
            BudgetItem::new(2, "Large", "Police", 300.0),
        ]);
        session.set_config(SessionConfig::new().container(400.0, 100.0));
        session.handle(ViewEvent::SelectGroup("Police".into()));
        let tiles = session.recompute();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].kind.name(), "Large");
        assert_eq!(tiles[0].rect, RectF::new(0.0, 0.0, 300.0, 100.0));
        assert_eq!(tiles[1].kind.name(), "Small");
        assert_eq!(tiles[1].rect, RectF::new(300.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn item_click_reports_selection() {
        let mut session = session_with(vec![BudgetItem::new(9, "a", "Police", 10.0)]);
        session.handle(ViewEvent::SelectGroup("Police".into()));
        let selected = session.handle(ViewEvent::SelectItem(ItemId::new(9)));
        assert_eq!(selected, Some(ItemId::new(9)));
        assert_eq!(session.view().selected_group(), Some("Police"));
    }

    #[test]
    fn priority_selection_switches_fill_to_intensity_ramp() {
        let mut session = session_with(vec![
            BudgetItem::new(1, "a", "Police", 50.0).with_score("mobility", 5.0),
            BudgetItem::new(2, "b", "Fire", 50.0).with_score("mobility", 5.0),
        ]);
        session.set_priority(Some("mobility"));
        let tiles = session.recompute();
        let (_, high) = session.config().color_scheme.ramp();
        // Both groups average 1.0, so both tiles sit at the ramp top.
        assert!(tiles.iter().all(|t| t.fill == high));
    }

    #[test]
    fn label_threshold_gates_small_tiles() {
        let mut session = session_with(vec![
            BudgetItem::new(1, "big", "A", 990.0),
            BudgetItem::new(2, "small", "B", 10.0),
        ]);
        session.set_config(
            SessionConfig::new()
                .container(1000.0, 100.0)
                .min_label_size(48.0, 18.0),
        );
        let tiles = session.recompute();
        let big = tiles.iter().find(|t| t.kind.name() == "A").unwrap();
        let small = tiles.iter().find(|t| t.kind.name() == "B").unwrap();
        assert!(big.show_label);
        assert!(!small.show_label); // floored to 20 units wide, still under 48
    }

    #[test]
    fn dataset_replacement_resets_view_to_overview() {
        let mut session = session_with(vec![BudgetItem::new(1, "a", "Police", 10.0)]);
        session.handle(ViewEvent::SelectGroup("Police".into()));
        session.load_items(vec![BudgetItem::new(2, "b", "Fire", 10.0)]);
        assert!(session.view().is_departments());
    }

    #[test]
    fn config_rejects_degenerate_container() {
        let config = SessionConfig::new().container(-5.0, f64::NAN);
        assert_eq!(config.container_width, SessionConfig::default().container_width);
        assert_eq!(
            config.container_height,
            SessionConfig::default().container_height
        );
    }

    #[test]
    fn debouncer_fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        assert!(!debouncer.ready(start));

        debouncer.record(start);
        assert!(debouncer.is_pending());
        assert!(!debouncer.ready(start + Duration::from_millis(100)));

        // A second keystroke pushes the deadline back.
        debouncer.record(start + Duration::from_millis(200));
        assert!(!debouncer.ready(start + Duration::from_millis(350)));
        assert!(debouncer.ready(start + Duration::from_millis(500)));
        // Fires once per burst.
        assert!(!debouncer.ready(start + Duration::from_millis(600)));
    }
}
