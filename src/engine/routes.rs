//! Route planning between facets.
//!
//! A selection in facet G constrains facet F through the shortest chain of
//! relations that joins them (Car -> CarClass -> Series -> Category, say).
//! Routes are derived once per graph by breadth-first search over the hops
//! that carry data, rather than spelled out per facet pair, so the same
//! resolver serves both modes.
//!
//! ```text
//! Category ── Series ── CarClass ── Car        Track (isolated)
//! ```
//!
//! Facet pairs without a connecting path (anything involving Track, or a
//! relation with no records) get no route and never constrain each other.

use super::graph::{Hop, RelationshipGraph};
use crate::Facet;
use std::collections::{HashMap, VecDeque};

/// Shortest hop sequence for every connected ordered pair of facets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePlan {
    routes: HashMap<(Facet, Facet), Vec<Hop>>,
}

impl RoutePlan {
    pub fn plan(graph: &RelationshipGraph) -> Self {
        let hops = graph.live_hops();
        let facets = graph.mode().facets();
        let mut routes = HashMap::new();

        for source in facets.iter_facets() {
            let parents = breadth_first(source, &hops);

            for target in facets.iter_facets().filter(|&t| t != source) {
                let mut path = Vec::new();
                let mut at = target;
                while let Some(hop) = parents.get(&at) {
                    path.push(*hop);
                    at = hop.from;
                }
                if path.is_empty() {
                    continue;
                }
                path.reverse();
                tracing::trace!(from = %source, to = %target, hops = path.len(), "planned route");
                routes.insert((source, target), path);
            }
        }

        RoutePlan { routes }
    }

    pub fn route(&self, from: Facet, to: Facet) -> Option<&[Hop]> {
        self.routes.get(&(from, to)).map(Vec::as_slice)
    }

    /// Facets that can constrain `target`, in column order, with their routes.
    pub fn sources_for(&self, target: Facet) -> impl Iterator<Item = (Facet, &[Hop])> + '_ {
        Facet::ALL.into_iter().filter_map(move |source| self.route(source, target).map(|route| (source, route)))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Parent hop of every facet reachable from `source`.
fn breadth_first(source: Facet, hops: &[Hop]) -> HashMap<Facet, Hop> {
    let mut parents = HashMap::new();
    let mut seen = source.flag();
    let mut queue = VecDeque::from([source]);

    while let Some(current) = queue.pop_front() {
        for hop in hops.iter().filter(|hop| hop.from == current) {
            if seen.contains(hop.to.flag()) {
                continue;
            }
            seen |= hop.to.flag();
            parents.insert(hop.to, *hop);
            queue.push_back(hop.to);
        }
    }

    parents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mode;
    use crate::catalog::{CarClassCar, CategoryCode, Relationships, SeriesCarClass, SeriesCategory};

    fn full() -> Relationships {
        Relationships {
            series_categories: vec![SeriesCategory { series_id: 1, category: CategoryCode::parse("oval").unwrap() }],
            series_car_classes: vec![SeriesCarClass { series_id: 1, car_class_id: 2 }],
            car_class_cars: vec![CarClassCar { car_class_id: 2, car_id: 3 }],
        }
    }

    fn hops(route: &[Hop]) -> Vec<(Facet, Facet)> {
        route.iter().map(|hop| (hop.from, hop.to)).collect()
    }

    #[test]
    fn routes_follow_the_relation_chain() {
        let plan = RoutePlan::plan(&RelationshipGraph::build(&full(), Mode::Normal));

        assert_eq!(hops(plan.route(Facet::Series, Facet::Category).unwrap()), vec![(Facet::Series, Facet::Category)]);
        assert_eq!(
            hops(plan.route(Facet::Car, Facet::Category).unwrap()),
            vec![(Facet::Car, Facet::CarClass), (Facet::CarClass, Facet::Series), (Facet::Series, Facet::Category)]
        );
        assert_eq!(
            hops(plan.route(Facet::Category, Facet::CarClass).unwrap()),
            vec![(Facet::Category, Facet::Series), (Facet::Series, Facet::CarClass)]
        );
        // 4 connected facets -> 12 ordered pairs
        assert_eq!(plan.len(), 12);
    }

    #[test]
    fn track_has_no_routes() {
        let plan = RoutePlan::plan(&RelationshipGraph::build(&full(), Mode::Normal));
        for facet in Facet::ALL {
            assert!(plan.route(facet, Facet::Track).is_none());
            assert!(plan.route(Facet::Track, facet).is_none());
        }
        assert_eq!(plan.sources_for(Facet::Track).count(), 0);
    }

    #[test]
    fn event_mode_links_only_car_class_and_car() {
        let plan = RoutePlan::plan(&RelationshipGraph::build(&full(), Mode::Event));
        assert_eq!(plan.len(), 2);
        assert!(plan.route(Facet::Car, Facet::CarClass).is_some());
        assert!(plan.route(Facet::Series, Facet::CarClass).is_none());
    }

    #[test]
    fn relation_without_records_disconnects_its_facet() {
        let mut rels = full();
        rels.series_categories.clear();
        let plan = RoutePlan::plan(&RelationshipGraph::build(&rels, Mode::Normal));
        assert!(plan.route(Facet::Series, Facet::Category).is_none());
        assert!(plan.route(Facet::Category, Facet::Car).is_none());
        assert!(plan.route(Facet::Car, Facet::Series).is_some());
    }
}
