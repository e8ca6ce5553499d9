//! Facet visibility resolution.
//!
//! For every facet F active in the mode, visibility is the intersection of
//! what each *other* selected facet allows:
//!
//! ```text
//! visible(F) = ⋂ { walk(selected(G), route(G -> F)) | G ≠ F, selected(G) ≠ ∅ }
//! ```
//!
//! With no constraining facet the result is `Unconstrained` (show every
//! catalog value). Constraints are intersected, not unioned: a value must be
//! reachable from every active constraint to remain valid. A reachable set
//! that is empty is a legitimate outcome ("impossible combination"), not an
//! error.
//!
//! A facet's own selection never narrows itself; the route plan has no
//! route from a facet to itself.

use super::algebra::{ValueSet, expand, expand_chain, expand_chain3, intersect};
use super::graph::{Hop, RelationshipGraph};
use super::routes::RoutePlan;
use crate::selection::Selection;
use crate::{Facet, FacetValue};
use std::collections::BTreeMap;

/// Which values of one facet remain valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// No other facet constrains this one; every catalog value is shown.
    Unconstrained,
    /// Exactly these values are shown. May be empty.
    Only(ValueSet),
}

impl Visibility {
    pub fn allows(&self, value: &FacetValue) -> bool {
        match self {
            Visibility::Unconstrained => true,
            Visibility::Only(values) => values.contains(value),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Visibility::Unconstrained)
    }

    /// The concrete set, or `None` when unconstrained.
    pub fn values(&self) -> Option<&ValueSet> {
        match self {
            Visibility::Unconstrained => None,
            Visibility::Only(values) => Some(values),
        }
    }

    /// Members of `all` that are shown.
    pub fn visible_in(&self, all: &ValueSet) -> ValueSet {
        match self {
            Visibility::Unconstrained => all.clone(),
            Visibility::Only(values) => intersect(all, values),
        }
    }

    fn narrow(self, reach: ValueSet) -> Visibility {
        match self {
            Visibility::Unconstrained => Visibility::Only(reach),
            Visibility::Only(current) => Visibility::Only(intersect(&current, &reach)),
        }
    }
}

/// Visibility of every facet active in the engine's mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    entries: BTreeMap<Facet, Visibility>,
}

impl VisibilityMap {
    pub fn get(&self, facet: Facet) -> Option<&Visibility> {
        self.entries.get(&facet)
    }

    /// Whether `value` may stay selected. Values of facets outside the mode
    /// are never allowed.
    pub fn allows(&self, value: &FacetValue) -> bool {
        self.entries.get(&value.facet()).is_some_and(|v| v.allows(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Facet, &Visibility)> {
        self.entries.iter().map(|(facet, visibility)| (*facet, visibility))
    }

    pub fn facets(&self) -> impl Iterator<Item = Facet> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.entries.values().all(Visibility::is_unconstrained)
    }
}

pub(crate) fn resolve_visibility(
    graph: &RelationshipGraph,
    routes: &RoutePlan,
    selection: &Selection,
) -> VisibilityMap {
    let mut entries = BTreeMap::new();

    for target in graph.mode().facets().iter_facets() {
        let mut visibility = Visibility::Unconstrained;

        for (source, route) in routes.sources_for(target) {
            let keys = selection.get(source);
            if keys.is_empty() {
                continue;
            }
            let reach = walk(graph, keys, route);
            tracing::trace!(from = %source, to = %target, selected = keys.len(), reachable = reach.len(), "constraint");
            visibility = visibility.narrow(reach);
        }

        entries.insert(target, visibility);
    }

    VisibilityMap { entries }
}

/// Expand `keys` along `route`.
fn walk(graph: &RelationshipGraph, keys: &ValueSet, route: &[Hop]) -> ValueSet {
    let map = |hop: &Hop| graph.hop_map(*hop);
    match route {
        [] => ValueSet::new(),
        [a] => expand(keys, map(a)),
        [a, b] => expand_chain(keys, map(a), map(b)),
        [a, b, c] => expand_chain3(keys, map(a), map(b), map(c)),
        longer => longer.iter().fold(keys.clone(), |reached, hop| expand(&reached, map(hop))),
    }
}
