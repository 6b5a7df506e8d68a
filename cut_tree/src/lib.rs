pub mod bi_dinitz;
pub mod config;
pub mod connected_components_filter;
pub mod cut_tree_with_2ecc;
pub mod dinitz;
pub mod disjoint_cut_set;
pub mod error;
pub mod gomory_hu_tree_builder;
pub mod graph;
pub mod greedy_treepacking;
pub mod io;
pub mod max_flow;
pub mod plain_gusfield;
pub mod query_handler;
pub mod separator;
pub mod two_edge_cc_filter;
pub mod union_find;

pub use config::CutTreeConfig;
pub use error::{Error, Result};
pub use query_handler::CutTreeQueryHandler;

use bi_dinitz::BiDinitz;
use connected_components_filter::ConnectedComponentsFilter;
use cut_tree_with_2ecc::CutTreeWith2ECC;
use dinitz::Dinitz;
use graph::{Edge, Weight, V};
use plain_gusfield::PlainGusfield;
use two_edge_cc_filter::TwoEdgeCCFilter;

/// Builds the cut tree of one connected graph whose vertices are `0..num_vertices`.
pub trait CutTreeBuilder {
    fn new(edges: Vec<Edge>, num_vertices: usize, config: &CutTreeConfig) -> Self;
    fn query(&self, u: V, v: V) -> Weight;
    /// Parent and edge weight of every vertex, `None` for the root.
    fn parent_weight(&self) -> &[Option<(V, Weight)>];
}

/// Minimum cut oracle for a whole graph, which may be disconnected.
pub trait GomoryHuTree: Sized {
    /// Self loops and parallel edges of `edges` are ignored.
    fn build(edges: &[Edge], num_vertices: usize, config: &CutTreeConfig) -> Self;

    fn num_vertices(&self) -> usize;

    /// Minimum cut between `u` and `v`. Panics if `u == v` or either is out of range.
    fn query(&self, u: V, v: V) -> Weight;

    fn try_query(&self, u: V, v: V) -> Result<Weight> {
        error::check_query(u, v, self.num_vertices())?;
        Ok(self.query(u, v))
    }

    /// The `n - 1` weighted edges of the tree.
    fn tree_edges(&self) -> Vec<(V, V, Weight)>;

    fn write_tree(&self, writer: impl std::io::Write) -> Result<()> {
        io::write_tree(writer, &self.tree_edges())
    }
}

/// The fastest cut tree on this crate.
pub type CutTree = TwoEdgeCCFilter<CutTreeWith2ECC>;
pub type GusfieldDinitz = ConnectedComponentsFilter<PlainGusfield<Dinitz>>;
pub type GusfieldBiDinitz = ConnectedComponentsFilter<PlainGusfield<BiDinitz>>;
