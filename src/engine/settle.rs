//! The selection consistency invariant.
//!
//! Every selected value must be visible. `prune` removes hidden values
//! right after a visibility result is computed, in the same call, so the
//! selection and the visibility never diverge outside this module.
//!
//! Pruning can change other facets' constraints: dropping one of two
//! selected series narrows the car classes it reached, and dropping the
//! last selected car lifts its constraint entirely. `settle` therefore
//! repeats resolve + prune until a pass removes nothing:
//!
//! ```text
//! selection ──▶ resolve ──▶ prune ──┐
//!     ▲                            │ removed > 0
//!     └────────────────────────────┘
//!                                  │ removed = 0
//!                                  ▼
//!                       stable selection + its visibility
//! ```
//!
//! Selections only shrink, so the loop ends after at most one pass per
//! selected value plus one. Settling an already settled selection is a
//! single pass that changes nothing.

use super::graph::RelationshipGraph;
use super::metrics::{PassMetrics, SettleMetrics};
use super::resolve::{VisibilityMap, resolve_visibility};
use super::routes::RoutePlan;
use crate::FacetValue;
use crate::selection::Selection;
use std::time::Instant;

/// Remove every selected value that `visibility` hides. Returns the removed
/// values in facet/value order.
pub(crate) fn prune(selection: &mut Selection, visibility: &VisibilityMap) -> Vec<FacetValue> {
    let hidden: Vec<FacetValue> = selection.iter().filter(|value| !visibility.allows(value)).cloned().collect();
    for value in &hidden {
        selection.remove(value);
        tracing::trace!(value = %value, "deselected hidden value");
    }
    hidden
}

pub(crate) fn settle(
    graph: &RelationshipGraph,
    routes: &RoutePlan,
    selection: &mut Selection,
    trace: bool,
) -> (VisibilityMap, SettleMetrics) {
    let start = Instant::now();
    let mut metrics = SettleMetrics::default();

    loop {
        let pass_start = Instant::now();
        let visibility = resolve_visibility(graph, routes, selection);
        let removed = prune(selection, &visibility);
        let pruned = removed.len();

        metrics.passes.push(PassMetrics {
            duration: pass_start.elapsed(),
            pruned,
            pruned_values: if trace { removed } else { Vec::new() },
            constrained_facets: visibility.iter().filter(|(_, v)| !v.is_unconstrained()).count(),
        });
        tracing::debug!(pass = metrics.passes.len(), pruned, selected = selection.len(), "settle pass");

        if pruned == 0 {
            metrics.total = start.elapsed();
            return (visibility, metrics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CarClassCar, Relationships, SeriesCarClass};
    use crate::{Facet, Mode};

    fn relationships() -> Relationships {
        Relationships {
            series_car_classes: vec![
                SeriesCarClass { series_id: 1, car_class_id: 10 },
                SeriesCarClass { series_id: 2, car_class_id: 20 },
            ],
            car_class_cars: vec![
                CarClassCar { car_class_id: 10, car_id: 100 },
                CarClassCar { car_class_id: 20, car_id: 200 },
            ],
            ..Default::default()
        }
    }

    fn run(selection: &mut Selection, mode: Mode) -> (VisibilityMap, SettleMetrics) {
        let graph = RelationshipGraph::build(&relationships(), mode);
        let routes = RoutePlan::plan(&graph);
        settle(&graph, &routes, selection, true)
    }

    #[test]
    fn consistent_selection_settles_in_one_pass() {
        let mut sel = selection! { series: [1], car: [100] };
        let (_, metrics) = run(&mut sel, Mode::Normal);
        assert_eq!(metrics.passes.len(), 1);
        assert_eq!(metrics.pruned(), 0);
        assert_eq!(sel, selection! { series: [1], car: [100] });
    }

    #[test]
    fn conflicting_values_are_pruned_together() {
        // series 1 hides car 200 and car 200 hides series 1
        let mut sel = selection! { series: [1], car: [200] };
        let (vis, metrics) = run(&mut sel, Mode::Normal);
        assert!(sel.is_empty());
        assert!(vis.is_unconstrained());
        assert_eq!(metrics.passes[0].pruned_values, vec![FacetValue::Series(1), FacetValue::Car(200)]);
        assert_eq!(metrics.passes.len(), 2);
    }

    #[test]
    fn pruning_repeats_until_stable() {
        // car 100 only fits class 10, which the selected class 20 excludes
        let mut sel = selection! { series: [1, 2], car_class: [20], car: [100] };
        let (vis, _) = run(&mut sel, Mode::Normal);
        for value in sel.iter() {
            assert!(vis.allows(value), "{value} selected but hidden");
        }
        let again = sel.clone();
        let (_, metrics) = run(&mut sel, Mode::Normal);
        assert_eq!(sel, again);
        assert_eq!(metrics.passes.len(), 1);
    }

    #[test]
    fn inactive_facets_are_dropped_in_event_mode() {
        let mut sel = selection! { category: ["oval"], series: [1], car_class: [10] };
        let (vis, _) = run(&mut sel, Mode::Event);
        assert!(sel.get(Facet::Category).is_empty());
        assert!(sel.get(Facet::Series).is_empty());
        assert!(sel.contains(&FacetValue::CarClass(10)));
        assert!(vis.get(Facet::Series).is_none());
    }
}
