//! Runs one cut-tree builder per connected component.

use crate::{
    config::CutTreeConfig,
    graph::{to_simple_undirected, Edge, Weight, V},
    union_find::UnionFind,
    CutTreeBuilder, GomoryHuTree,
};

#[derive(Debug)]
pub struct ConnectedComponentsFilter<H> {
    component: Vec<usize>,
    /// Id of each vertex inside its component. Ids follow global order.
    local: Vec<V>,
    local_to_global: Vec<Vec<V>>,
    handlers: Vec<H>,
}

impl<H: CutTreeBuilder> ConnectedComponentsFilter<H> {
    /// `edges` must be simple and oriented `u < v`, as produced by [`to_simple_undirected`].
    pub fn from_simple_edges(edges: &[Edge], n: usize, config: &CutTreeConfig) -> Self {
        let mut uf = UnionFind::new(n);
        for &(u, v) in edges {
            assert!(u < n && v < n, "edge ({u}, {v}) out of range for {n} vertices");
            uf.unite(u, v);
        }
        let (component, num_components) = uf.component_ids();
        let mut local = vec![0; n];
        let mut local_to_global = vec![vec![]; num_components];
        for v in 0..n {
            let l2g: &mut Vec<V> = &mut local_to_global[component[v]];
            local[v] = l2g.len();
            l2g.push(v);
        }
        let mut component_edges = vec![vec![]; num_components];
        for &(u, v) in edges {
            component_edges[component[u]].push((local[u], local[v]));
        }
        log::debug!("{num_components} connected components on {n} vertices");
        let handlers = component_edges
            .into_iter()
            .zip(&local_to_global)
            .map(|(e, l2g)| H::new(e, l2g.len(), config))
            .collect();
        Self {
            component,
            local,
            local_to_global,
            handlers,
        }
    }

    pub fn num_components(&self) -> usize {
        self.handlers.len()
    }

    pub fn handlers(&self) -> &[H] {
        &self.handlers
    }

    pub fn component_of(&self, v: V) -> usize {
        self.component[v]
    }

    /// Zero weight edges from the first vertex of component 0 to the first vertex of every other
    /// component.
    pub(crate) fn component_links(&self) -> impl Iterator<Item = (V, V, Weight)> + '_ {
        self.local_to_global
            .iter()
            .skip(1)
            .map(|l2g| (self.local_to_global[0][0], l2g[0], 0))
    }

    /// Edges of every component's tree, in global ids.
    pub(crate) fn handler_tree_edges(&self) -> impl Iterator<Item = (V, V, Weight)> + '_ {
        self.handlers
            .iter()
            .zip(&self.local_to_global)
            .flat_map(|(h, l2g)| {
                h.parent_weight()
                    .iter()
                    .enumerate()
                    .filter_map(move |(v, pw)| pw.map(|(p, w)| (l2g[v], l2g[p], w)))
            })
    }
}

impl<H: CutTreeBuilder> GomoryHuTree for ConnectedComponentsFilter<H> {
    fn build(edges: &[Edge], num_vertices: usize, config: &CutTreeConfig) -> Self {
        let edges = to_simple_undirected(edges.iter().copied());
        Self::from_simple_edges(&edges, num_vertices, config)
    }

    fn num_vertices(&self) -> usize {
        self.component.len()
    }

    fn query(&self, u: V, v: V) -> Weight {
        let n = self.num_vertices();
        assert!(u < n && v < n, "query({u}, {v}) out of range for {n} vertices");
        let c = self.component[u];
        if c != self.component[v] {
            return 0;
        }
        self.handlers[c].query(self.local[u], self.local[v])
    }

    fn tree_edges(&self) -> Vec<(V, V, Weight)> {
        self.component_links()
            .chain(self.handler_tree_edges())
            .collect()
    }
}
