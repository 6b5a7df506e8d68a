use crate::graph::{Edge, Weight, V};

/// Interface of a max-flow engine over an undirected graph where every edge has capacity 1.
pub trait MaxFlow {
    /// Builds the engine over `edges`, on vertices `0..num_vertices`.
    fn new(edges: &[Edge], num_vertices: usize) -> Self;
    /// Number of edge-disjoint paths between `s` and `t`. Capacities are reset before each run.
    fn max_flow(&mut self, s: V, t: V) -> Weight;
    /// After `max_flow(s, t)`, whether `v` is on the side of `s` in the minimum cut that was found.
    fn is_source_side(&self, v: V) -> bool;
}
