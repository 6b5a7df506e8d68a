//! Greedy packing of edge-disjoint spanning arborescences.
//!
//! Every round grows one arborescence from the root by DFS, consuming the arcs it uses. After
//! `deg(root)` rounds, a vertex that received `deg(v)` arcs has `deg(v)` edge-disjoint paths from
//! the root, so its minimum cut against the root equals its degree.

use derivative::Derivative;

use crate::graph::{Edge, V};

/// Remaining out-arcs of one vertex, with a cyclic cursor.
#[derive(Debug, Clone, Default)]
struct ArcList {
    cursor: usize,
    to: Vec<V>,
}

impl ArcList {
    fn current(&self) -> V {
        self.to[self.cursor]
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor == self.to.len() {
            self.cursor = 0;
        }
    }

    fn remove_current(&mut self) {
        self.to.swap_remove(self.cursor);
        if self.cursor == self.to.len() {
            self.cursor = 0;
        }
    }

    fn len(&self) -> usize {
        self.to.len()
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct GreedyTreePacking {
    arcs: Vec<ArcList>,
    inedge_count: Vec<usize>,
    #[derivative(Debug = "ignore")]
    used_revision: Vec<u32>,
    #[derivative(Debug = "ignore")]
    vertices_revision: u32,
    /// At most this many arcs are tried per visited vertex in one round.
    dfs_edge_max: usize,
}

impl GreedyTreePacking {
    pub fn new(edges: &[Edge], n: usize, dfs_edge_max: usize) -> Self {
        let mut arcs = vec![ArcList::default(); n];
        for &(u, v) in edges {
            arcs[u].to.push(v);
            arcs[v].to.push(u);
        }
        let degree: Vec<usize> = arcs.iter().map(ArcList::len).collect();
        for l in &mut arcs {
            l.to.sort_by_key(|&to| degree[to]);
        }
        Self {
            arcs,
            inedge_count: vec![0; n],
            used_revision: vec![0; n],
            vertices_revision: 1,
            dfs_edge_max,
        }
    }

    /// Packs `deg(root)` arborescences rooted at `root`, consuming this packing's arcs.
    pub fn arborescence_packing(&mut self, root: V) {
        for _ in 0..self.arcs[root].len() {
            self.dfs(root);
            self.vertices_revision += 1;
        }
    }

    /// Number of arborescences that reached `v`.
    pub fn inedge_count(&self, v: V) -> usize {
        self.inedge_count[v]
    }

    fn budget(&self, v: V) -> usize {
        self.arcs[v].len().min(self.dfs_edge_max)
    }

    fn dfs(&mut self, root: V) {
        let rev = self.vertices_revision;
        self.used_revision[root] = rev;
        // Vertex and number of arcs it may still try.
        let mut stack = vec![(root, self.budget(root))];
        while let Some(&mut (v, ref mut remaining)) = stack.last_mut() {
            if *remaining == 0 || self.arcs[v].len() == 0 {
                stack.pop();
                continue;
            }
            *remaining -= 1;
            let to = self.arcs[v].current();
            if self.used_revision[to] == rev {
                self.arcs[v].advance();
            } else {
                self.arcs[v].remove_current();
                self.inedge_count[to] += 1;
                self.used_revision[to] = rev;
                stack.push((to, self.budget(to)));
            }
        }
    }
}
