//! Relationship graph construction.
//!
//! This is the *static* side of the engine: adjacency multimaps derived from
//! the flat relation lists of a catalog. Each relation active in the mode
//! yields two directed maps (forward and reverse), so normal mode holds six
//! maps and event mode two.
//!
//! ## Invariants
//!
//! - A graph is a pure function of its relation records and mode. Rebuilding
//!   from the same records (in any order, with duplicates) yields equal maps.
//! - Maps are never mutated after `build`. Consumers share a graph through
//!   `Arc` and swap in a fresh one when catalog data reloads.
//! - Track takes part in no relation, so it never appears in a map.

use crate::catalog::Relationships;
use crate::engine::ValueSet;
use crate::{Facet, FacetValue, Mode};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static EMPTY_ADJACENCY: Lazy<Adjacency> = Lazy::new(Adjacency::new);

bitflags::bitflags! {
    /// A set of facets, e.g. the facets active in a [`Mode`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FacetSet: u8 {
        const CATEGORY  = 1 << 0;
        const SERIES    = 1 << 1;
        const CAR_CLASS = 1 << 2;
        const CAR       = 1 << 3;
        const TRACK     = 1 << 4;
    }
}

impl FacetSet {
    /// Member facets in canonical column order.
    pub fn iter_facets(self) -> impl Iterator<Item = Facet> {
        Facet::ALL.into_iter().filter(move |facet| self.contains(facet.flag()))
    }

    pub fn has(self, facet: Facet) -> bool {
        self.contains(facet.flag())
    }
}

/// Lookup from one facet's values to associated values in another facet.
pub type Adjacency = HashMap<FacetValue, ValueSet>;

/// One directed step between two related facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hop {
    pub from: Facet,
    pub to: Facet,
}

impl Hop {
    pub fn new(from: Facet, to: Facet) -> Self {
        Hop { from, to }
    }
}

/// Immutable adjacency multimaps for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipGraph {
    mode: Mode,
    maps: HashMap<Hop, Adjacency>,
}

impl RelationshipGraph {
    /// Build the directed multimaps for every relation active in `mode`.
    ///
    /// Relations outside the mode are ignored even when records exist. An
    /// empty relation list still produces its two (empty) maps.
    pub fn build(relationships: &Relationships, mode: Mode) -> Self {
        let mut maps = HashMap::new();

        for &relation in mode.relations() {
            let (left, right) = relation.endpoints();
            let mut forward = Adjacency::new();
            let mut reverse = Adjacency::new();

            for (a, b) in relationships.pairs(relation) {
                forward.entry(a.clone()).or_default().insert(b.clone());
                reverse.entry(b).or_default().insert(a);
            }

            tracing::trace!(
                relation = ?relation,
                forward_keys = forward.len(),
                reverse_keys = reverse.len(),
                "indexed relation"
            );

            maps.insert(Hop::new(left, right), forward);
            maps.insert(Hop::new(right, left), reverse);
        }

        let graph = RelationshipGraph { mode, maps };
        tracing::debug!(
            mode = mode.name(),
            maps = graph.maps.len(),
            edges = graph.edge_count(),
            "built relationship graph"
        );
        graph
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn adjacency(&self, hop: Hop) -> Option<&Adjacency> {
        self.maps.get(&hop)
    }

    /// Like [`adjacency`](Self::adjacency), but a hop outside the mode reads
    /// as an empty map.
    pub(crate) fn hop_map(&self, hop: Hop) -> &Adjacency {
        self.maps.get(&hop).unwrap_or(&EMPTY_ADJACENCY)
    }

    /// Hops that carry at least one edge, in relation order. Route planning
    /// walks only these, so a relation without data constrains nothing.
    pub fn live_hops(&self) -> Vec<Hop> {
        let mut hops = Vec::new();
        for &relation in self.mode.relations() {
            let (left, right) = relation.endpoints();
            for hop in [Hop::new(left, right), Hop::new(right, left)] {
                if self.maps.get(&hop).is_some_and(|m| !m.is_empty()) {
                    hops.push(hop);
                }
            }
        }
        hops
    }

    /// Number of distinct undirected edges across all relations.
    pub fn edge_count(&self) -> usize {
        self.mode
            .relations()
            .iter()
            .filter_map(|relation| {
                let (left, right) = relation.endpoints();
                self.maps.get(&Hop::new(left, right))
            })
            .map(|map| map.values().map(|targets| targets.len()).sum::<usize>())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CarClassCar, CategoryCode, SeriesCarClass, SeriesCategory};

    fn relationships() -> Relationships {
        Relationships {
            series_categories: vec![
                SeriesCategory { series_id: 1, category: CategoryCode::parse("oval").unwrap() },
                SeriesCategory { series_id: 1, category: CategoryCode::parse("oval").unwrap() },
            ],
            series_car_classes: vec![
                SeriesCarClass { series_id: 1, car_class_id: 5 },
                SeriesCarClass { series_id: 2, car_class_id: 5 },
            ],
            car_class_cars: vec![CarClassCar { car_class_id: 5, car_id: 50 }],
        }
    }

    #[test]
    fn normal_mode_builds_six_maps() {
        let graph = RelationshipGraph::build(&relationships(), Mode::Normal);
        let reverse = graph.adjacency(Hop::new(Facet::CarClass, Facet::Series)).unwrap();
        assert_eq!(reverse[&FacetValue::CarClass(5)], ValueSet::from([FacetValue::Series(1), FacetValue::Series(2)]));
        assert_eq!(graph.live_hops().len(), 6);
        // duplicate series/category rows collapse
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn event_mode_only_indexes_car_classes_and_cars() {
        let graph = RelationshipGraph::build(&relationships(), Mode::Event);
        assert!(graph.adjacency(Hop::new(Facet::Series, Facet::CarClass)).is_none());
        assert_eq!(
            graph.live_hops(),
            vec![Hop::new(Facet::CarClass, Facet::Car), Hop::new(Facet::Car, Facet::CarClass)]
        );
    }

    #[test]
    fn empty_relations_give_empty_maps() {
        let graph = RelationshipGraph::build(&Relationships::default(), Mode::Normal);
        let map = graph.adjacency(Hop::new(Facet::Series, Facet::Category)).unwrap();
        assert!(map.is_empty());
        assert!(graph.live_hops().is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn rebuild_is_order_independent() {
        let mut shuffled = relationships();
        shuffled.series_car_classes.reverse();
        assert_eq!(
            RelationshipGraph::build(&relationships(), Mode::Normal),
            RelationshipGraph::build(&shuffled, Mode::Normal)
        );
    }

    #[test]
    fn facet_set_iterates_in_column_order() {
        let facets: Vec<Facet> = (FacetSet::TRACK | FacetSet::SERIES).iter_facets().collect();
        assert_eq!(facets, vec![Facet::Series, Facet::Track]);
    }
}
