//! Settle metrics.
//!
//! A settle run is a sequence of resolve + prune passes. These structs
//! record how long each pass took and what it removed, for debugging and for
//! the CLI report.
//!
//! Metrics are cheap by default: `PassMetrics::pruned_values` is filled only
//! when the caller asks for traces, the count always is.

use crate::FacetValue;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct SettleMetrics {
    /// Total elapsed time for the settle run.
    pub total: Duration,
    /// One entry per pass, including the final pass that pruned nothing.
    pub passes: Vec<PassMetrics>,
}

impl SettleMetrics {
    /// Total number of values deselected across all passes.
    pub fn pruned(&self) -> usize {
        self.passes.iter().map(|pass| pass.pruned).sum()
    }
}

/// Timing and pruning for a single resolve + prune pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    /// Elapsed time for the pass.
    pub duration: Duration,
    /// Number of selected values removed because they were hidden.
    pub pruned: usize,
    /// The removed values, in facet/value order (only when tracing).
    pub pruned_values: Vec<FacetValue>,
    /// Facets that ended the pass with a concrete (non-unconstrained) visibility.
    pub constrained_facets: usize,
}
