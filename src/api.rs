use crate::catalog::Catalog;
use crate::engine::{FilterEngine, RelationshipGraph, SettleMetrics, Settled, VisibilityMap};
use crate::selection::{ContentSelection, Selection};
use crate::{Facet, FacetValue, Mode};
use std::sync::Arc;
use std::time::Duration;

/// Options that affect settling.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Keep the values pruned by each pass in [`SettleReport::passes`].
    pub trace: bool,
}

/// Outcome of one settle run, as exposed to callers.
#[derive(Debug, Clone, Default)]
pub struct SettleReport {
    /// Every value deselected by the run, in facet/value order.
    pub pruned: Vec<FacetValue>,
    /// Per-pass trace. Pass values are only listed with [`Options::trace`].
    pub passes: Vec<PassSummary>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// A compact per-pass trace.
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub pass: usize,
    pub duration: Duration,
    pub pruned: usize,
    pub values: Vec<FacetValue>,
    pub constrained_facets: usize,
}

impl SettleReport {
    fn from_metrics(metrics: &SettleMetrics, pruned: Vec<FacetValue>) -> Self {
        let passes = metrics
            .passes
            .iter()
            .enumerate()
            .map(|(idx, pass)| PassSummary {
                pass: idx + 1,
                duration: pass.duration,
                pruned: pass.pruned,
                values: pass.pruned_values.clone(),
                constrained_facets: pass.constrained_facets,
            })
            .collect();
        SettleReport { pruned, passes, elapsed: metrics.total }
    }

    /// Whether the run had to deselect anything.
    pub fn changed(&self) -> bool {
        !self.pruned.is_empty()
    }
}

// --- Session ------------------------------------------------------------------

/// One selector instance: an engine plus the live selection.
///
/// Every mutation settles synchronously before returning, so
/// [`values`](Self::values) never reports a value that is hidden.
#[derive(Debug, Clone)]
pub struct FilterSession {
    engine: FilterEngine,
    options: Options,
    selection: Selection,
    visibility: VisibilityMap,
    last: SettleReport,
}

impl FilterSession {
    /// Start a session seeded with `initial` (e.g. the values of a post being
    /// edited). Pre-selected values that are inconsistent are dropped.
    pub fn new(engine: FilterEngine, initial: &ContentSelection) -> Self {
        Self::with_options(engine, Selection::from(initial), Options::default())
    }

    pub fn with_options(engine: FilterEngine, selection: Selection, options: Options) -> Self {
        let mut session = FilterSession {
            engine,
            options,
            selection,
            visibility: VisibilityMap::default(),
            last: SettleReport::default(),
        };
        session.settle();
        session
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    /// Flip one checkbox.
    pub fn toggle(&mut self, value: FacetValue) -> &SettleReport {
        if self.accepts(&value) {
            self.selection.toggle(value);
        }
        self.settle()
    }

    pub fn set_checked(&mut self, value: FacetValue, checked: bool) -> &SettleReport {
        if self.accepts(&value) {
            self.selection.set_checked(value, checked);
        }
        self.settle()
    }

    pub fn clear(&mut self, facet: Facet) -> &SettleReport {
        self.selection.clear(facet);
        self.settle()
    }

    pub fn clear_all(&mut self) -> &SettleReport {
        self.selection.clear_all();
        self.settle()
    }

    /// Point the session at a freshly built graph. The old graph is released
    /// and the selection is settled against the new one. A graph of another
    /// mode switches the session's mode.
    pub fn repoint(&mut self, graph: Arc<RelationshipGraph>) -> &SettleReport {
        if graph.mode() != self.mode() {
            tracing::debug!(from = self.mode().name(), to = graph.mode().name(), "session switched mode");
        }
        self.engine = FilterEngine::new(graph);
        self.settle()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    pub fn last_report(&self) -> &SettleReport {
        &self.last
    }

    /// The confirmed choice, shaped for form submission.
    pub fn values(&self) -> ContentSelection {
        self.selection.to_content(self.mode())
    }

    /// View model of one column, or `None` if the facet is not part of the mode.
    ///
    /// `query` is the column's search box text; matching is a case-insensitive
    /// substring test on the item name.
    pub fn column(&self, facet: Facet, catalog: &Catalog, query: &str) -> Option<ColumnView> {
        let visibility = self.visibility.get(facet)?;
        let needle = query.trim().to_lowercase();

        let items: Vec<ColumnItem> = catalog
            .items(facet)
            .into_iter()
            .map(|(value, name)| ColumnItem {
                checked: self.selection.contains(&value),
                filter_hidden: !visibility.allows(&value),
                search_hidden: !needle.is_empty() && !name.to_lowercase().contains(&needle),
                name: name.to_string(),
                value,
            })
            .collect();

        Some(ColumnView {
            facet,
            title: facet.label(),
            checked_count: self.selection.get(facet).len(),
            items,
        })
    }

    fn accepts(&self, value: &FacetValue) -> bool {
        let active = self.mode().facets().has(value.facet());
        if !active {
            tracing::warn!(value = %value, mode = self.mode().name(), "ignoring value of a facet outside the mode");
        }
        active
    }

    fn settle(&mut self) -> &SettleReport {
        let before = self.selection.clone();
        let Settled { visibility, metrics } = self.engine.settle_with(&mut self.selection, &self.options);
        let pruned: Vec<FacetValue> = before.iter().filter(|value| !self.selection.contains(value)).cloned().collect();
        if !pruned.is_empty() {
            tracing::debug!(pruned = pruned.len(), passes = metrics.passes.len(), "selection settled");
        }
        self.visibility = visibility;
        self.last = SettleReport::from_metrics(&metrics, pruned);
        &self.last
    }
}

// --- Column view models -----------------------------------------------------------

/// One option row of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnItem {
    pub value: FacetValue,
    pub name: String,
    pub checked: bool,
    /// Hidden because other facets' selections exclude it.
    pub filter_hidden: bool,
    /// Hidden because it does not match the column's search text.
    pub search_hidden: bool,
}

impl ColumnItem {
    pub fn is_shown(&self) -> bool {
        !self.filter_hidden && !self.search_hidden
    }
}

/// Everything a renderer needs to draw one column.
#[derive(Debug, Clone)]
pub struct ColumnView {
    pub facet: Facet,
    pub title: &'static str,
    pub items: Vec<ColumnItem>,
    pub checked_count: usize,
}

impl ColumnView {
    pub fn shown(&self) -> impl Iterator<Item = &ColumnItem> {
        self.items.iter().filter(|item| item.is_shown())
    }

    /// Header badge text: the checked count, or empty when nothing is checked.
    pub fn count_label(&self) -> String {
        if self.checked_count > 0 { self.checked_count.to_string() } else { String::new() }
    }
}
