//! Removes bridges, then runs one cut-tree builder per 2-edge-connected component.
//!
//! Every bridge is a cut of value 1 and every other edge lies on a cycle, so the minimum cut
//! between two vertices of different blocks of the same component is exactly 1.

use crate::{
    config::CutTreeConfig,
    connected_components_filter::ConnectedComponentsFilter,
    graph::{to_simple_undirected, Edge, Graph, Weight, V},
    union_find::UnionFind,
    CutTreeBuilder, GomoryHuTree,
};

#[derive(Debug)]
pub struct TwoEdgeCCFilter<H> {
    component: Vec<usize>,
    bridges: Vec<Edge>,
    blocks: ConnectedComponentsFilter<H>,
    /// First vertex of every connected component.
    roots: Vec<V>,
}

/// Splits the edges of a simple graph into bridges and the rest.
fn find_bridges(g: &Graph) -> (Vec<Edge>, Vec<Edge>) {
    const UNVISITED: usize = usize::MAX;
    let n = g.num_vertices();
    let mut order = vec![UNVISITED; n];
    let mut low = vec![0; n];
    let mut cur = 0;
    let (mut bridges, mut block_edges) = (vec![], vec![]);
    for root in 0..n {
        if order[root] != UNVISITED {
            continue;
        }
        order[root] = cur;
        low[root] = cur;
        cur += 1;
        // Vertex, DFS parent, next neighbor index.
        let mut stack = vec![(root, UNVISITED, 0)];
        while let Some(&mut (v, parent, ref mut i)) = stack.last_mut() {
            if let Some(&to) = g.neighbors(v).get(*i) {
                *i += 1;
                if to == parent {
                    continue;
                }
                if order[to] == UNVISITED {
                    order[to] = cur;
                    low[to] = cur;
                    cur += 1;
                    stack.push((to, v, 0));
                } else {
                    low[v] = low[v].min(order[to]);
                    if v < to {
                        block_edges.push((v, to));
                    }
                }
                continue;
            }
            stack.pop();
            if parent != UNVISITED {
                low[parent] = low[parent].min(low[v]);
                let e = (parent.min(v), parent.max(v));
                if order[parent] < low[v] {
                    bridges.push(e);
                } else {
                    block_edges.push(e);
                }
            }
        }
    }
    (bridges, block_edges)
}

impl<H: CutTreeBuilder> TwoEdgeCCFilter<H> {
    pub fn bridges(&self) -> &[Edge] {
        &self.bridges
    }

    pub fn blocks(&self) -> &ConnectedComponentsFilter<H> {
        &self.blocks
    }
}

impl<H: CutTreeBuilder> GomoryHuTree for TwoEdgeCCFilter<H> {
    fn build(edges: &[Edge], num_vertices: usize, config: &CutTreeConfig) -> Self {
        let n = num_vertices;
        let edges = to_simple_undirected(edges.iter().copied());
        let mut uf = UnionFind::new(n);
        for &(u, v) in &edges {
            assert!(u < n && v < n, "edge ({u}, {v}) out of range for {n} vertices");
            uf.unite(u, v);
        }
        let (component, num_components) = uf.component_ids();
        let mut roots = vec![usize::MAX; num_components];
        for v in (0..n).rev() {
            roots[component[v]] = v;
        }

        let g = Graph::new(&edges, n);
        let (bridges, mut block_edges) = find_bridges(&g);
        assert_eq!(
            bridges.len() + block_edges.len(),
            edges.len(),
            "bridges and block edges must partition the edges"
        );
        drop(g);
        drop(edges);
        log::debug!(
            "{} bridges, {} edges inside 2-edge-connected components",
            bridges.len(),
            block_edges.len()
        );
        block_edges.sort_unstable();
        let blocks = ConnectedComponentsFilter::from_simple_edges(&block_edges, n, config);
        Self {
            component,
            bridges,
            blocks,
            roots,
        }
    }

    fn num_vertices(&self) -> usize {
        self.component.len()
    }

    fn query(&self, u: V, v: V) -> Weight {
        match self.blocks.query(u, v) {
            0 if self.component[u] == self.component[v] => 1,
            ans => ans,
        }
    }

    fn tree_edges(&self) -> Vec<(V, V, Weight)> {
        let links = self.roots.iter().skip(1).map(|&r| (self.roots[0], r, 0));
        let bridges = self.bridges.iter().map(|&(u, v)| (u, v, 1));
        let block_edges = self.blocks.handler_tree_edges().inspect(|&(u, v, w)| {
            assert!(w >= 2, "edge ({u}, {v}) inside a block has weight {w}");
        });
        links.chain(bridges).chain(block_edges).collect()
    }
}
