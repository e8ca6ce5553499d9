//! Facet filtering engine.
//!
//! The engine is a pure function of a relationship graph (built once from
//! catalog data) and the current selection. It is split into focused
//! submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! Relationships ──┐
//!                 │  RelationshipGraph::build      (graph.rs)
//!                 └──────────────┬────────────────
//!                                │  adjacency multimaps, two per relation
//!                                v
//!                      RoutePlan::plan              (routes.rs)
//!                        - shortest hop path per facet pair
//!                                │
//! Selection ─────────────────────┼─ resolve_visibility (resolve.rs)
//!                                │    - expand along routes (algebra.rs)
//!                                │    - intersect per target facet
//!                                v
//!                      settle                      (settle.rs)
//!                        - prune hidden selections
//!                        - repeat to a fixpoint
//!                                │
//!                                v
//!                      VisibilityMap + SettleMetrics (metrics.rs)
//! ```
//!
//! Settling mirrors a saturation loop: each pass resolves visibility from
//! the current selection and drops every selected value that is hidden.
//! Removing a value can change what other facets allow, so passes repeat
//! until one removes nothing. Selections only shrink, which bounds the loop
//! by the number of selected values.
//!
//! ## Responsibilities by module
//!
//! - `graph.rs`: `FacetSet`, `Hop` and the immutable `RelationshipGraph`.
//! - `algebra.rs`: `expand`, `expand_chain`, `expand_chain3`, `intersect`.
//! - `routes.rs`: breadth-first route planning over the active relations.
//! - `resolve.rs`: per-facet `Visibility` from other facets' selections.
//! - `settle.rs`: the consistency invariant (no selected-and-hidden value).
//! - `filter.rs`: `FilterEngine`, the reusable entry point per mode.
//! - `metrics.rs`: per-pass timing and pruned values.
//!
//! ## Debugging
//!
//! Graph builds, route plans and settle passes are reported through
//! `tracing` at `debug`/`trace` level (`RUST_LOG=paddock=trace`).

#[path = "engine/algebra.rs"]
mod algebra;
#[path = "engine/filter.rs"]
mod filter;
#[path = "engine/graph.rs"]
mod graph;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/routes.rs"]
mod routes;
#[path = "engine/settle.rs"]
mod settle;

pub use algebra::{ValueSet, expand, expand_chain, expand_chain3, intersect};
pub use filter::{FilterEngine, Settled};
pub use graph::{Adjacency, FacetSet, Hop, RelationshipGraph};
pub use metrics::{PassMetrics, SettleMetrics};
pub use resolve::{Visibility, VisibilityMap};
pub use routes::RoutePlan;
