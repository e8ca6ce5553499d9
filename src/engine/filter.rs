//! The reusable engine entry point.
//!
//! One `FilterEngine` serves every selector surface of a mode (post
//! creation, post editing, the browse panel). It owns nothing mutable: the
//! graph and route plan are shared behind `Arc`, and selections are passed
//! in by the caller.

use super::graph::RelationshipGraph;
use super::metrics::SettleMetrics;
use super::resolve::{VisibilityMap, resolve_visibility};
use super::routes::RoutePlan;
use super::settle::settle;
use crate::catalog::Relationships;
use crate::selection::Selection;
use crate::{Mode, Options};
use std::sync::Arc;

/// Resolves visibility and settles selections against one relationship graph.
///
/// Usage: build with [`FilterEngine::from_relationships`] (or
/// [`FilterEngine::new`] for a shared graph), then call [`resolve`] for a
/// read-only view or [`settle`] to also enforce consistency.
///
/// [`resolve`]: FilterEngine::resolve
/// [`settle`]: FilterEngine::settle
#[derive(Debug, Clone)]
pub struct FilterEngine {
    graph: Arc<RelationshipGraph>,
    routes: Arc<RoutePlan>,
}

/// A settled selection's visibility plus how settling went.
#[derive(Debug, Clone)]
pub struct Settled {
    pub visibility: VisibilityMap,
    pub metrics: SettleMetrics,
}

impl FilterEngine {
    /// Create an engine over an already built graph; routes are planned here.
    pub fn new(graph: Arc<RelationshipGraph>) -> Self {
        let routes = Arc::new(RoutePlan::plan(&graph));
        tracing::debug!(mode = graph.mode().name(), routes = routes.len(), "filter engine ready");
        FilterEngine { graph, routes }
    }

    pub fn from_relationships(relationships: &Relationships, mode: Mode) -> Self {
        Self::new(Arc::new(RelationshipGraph::build(relationships, mode)))
    }

    pub fn mode(&self) -> Mode {
        self.graph.mode()
    }

    pub fn graph(&self) -> &Arc<RelationshipGraph> {
        &self.graph
    }

    pub fn routes(&self) -> &RoutePlan {
        &self.routes
    }

    /// Visibility for `selection` without touching it.
    ///
    /// The result may hide values that are still selected; use [`settle`]
    /// before reading a selection out.
    ///
    /// [`settle`]: FilterEngine::settle
    pub fn resolve(&self, selection: &Selection) -> VisibilityMap {
        resolve_visibility(&self.graph, &self.routes, selection)
    }

    /// Prune `selection` to a fixpoint and return the final visibility.
    pub fn settle(&self, selection: &mut Selection) -> Settled {
        self.settle_with(selection, &Options::default())
    }

    pub fn settle_with(&self, selection: &mut Selection, options: &Options) -> Settled {
        let (visibility, metrics) = settle(&self.graph, &self.routes, selection, options.trace);
        Settled { visibility, metrics }
    }
}
