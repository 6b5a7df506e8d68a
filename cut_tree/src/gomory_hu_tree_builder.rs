//! Incremental construction of the Gomory-Hu tree from the cuts found so far.
//!
//! While building, every tree edge is stored at some member of each of the two groups it
//! connects. When a cut splits a group, the tree edges stored at vertices that moved to the new
//! side are re-homed so that this keeps holding.

use std::fmt::{Debug, Formatter};

use debug_tree::{add_branch_to, AsTree, TreeBuilder};

use crate::{
    disjoint_cut_set::DisjointCutSet,
    graph::{Weight, V},
};

/// Half of a tree edge. Its twin lives at `edges[to][rev]`.
#[derive(Debug, Clone, Copy)]
struct TreeEdge {
    to: V,
    weight: Weight,
    rev: usize,
}

pub struct GomoryHuTreeBuilder {
    n: usize,
    add_edge_count: usize,
    edges: Vec<Vec<TreeEdge>>,
    /// Edges of contracted degree-2 vertices, only added in `build`.
    degree2_edges: Vec<(V, V)>,
    depth: Vec<usize>,
    parent_weight: Vec<Option<(V, Weight)>>,
    built: bool,
}

impl GomoryHuTreeBuilder {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            add_edge_count: 0,
            edges: vec![vec![]; n],
            degree2_edges: vec![],
            depth: vec![0; n],
            parent_weight: vec![None; n],
            built: false,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Records the weight 2 edge of a contracted degree-2 vertex.
    pub fn add_degree2_edge(&mut self, u: V, v: V) {
        self.add_edge_count += 1;
        self.degree2_edges.push((u, v));
    }

    fn push_pair(&mut self, u: V, v: V, weight: Weight) {
        let (iu, iv) = (self.edges[u].len(), self.edges[v].len());
        self.edges[u].push(TreeEdge {
            to: v,
            weight,
            rev: iv,
        });
        self.edges[v].push(TreeEdge {
            to: u,
            weight,
            rev: iu,
        });
    }

    /// Records the cut of weight `cost` that separates the vertices `vs` (containing `u`) from
    /// the rest, where `v` is on the other side.
    ///
    /// `dcs` must already reflect the split: `u` and the members of its old group that ended up on
    /// its side share a new group.
    pub fn add_edge(&mut self, u: V, v: V, cost: Weight, vs: &[V], dcs: &DisjointCutSet) {
        assert_ne!(u, v);
        self.add_edge_count += 1;

        // Tree edges held by the new group's members now belong to `v`'s group.
        for &w in vs {
            if !dcs.is_same_group(u, w) {
                continue;
            }
            for e in std::mem::take(&mut self.edges[w]) {
                let pos = self.edges[v].len();
                self.edges[v].push(e);
                let back = &mut self.edges[e.to][e.rev];
                back.to = v;
                back.rev = pos;
            }
        }

        // Tree edges from this side into `v`'s group must now end at `u`.
        for &w in vs {
            if w == u {
                continue;
            }
            for i in 0..self.edges[w].len() {
                let TreeEdge { to: t, weight, rev } = self.edges[w][i];
                if !dcs.is_same_group(t, v) {
                    continue;
                }
                self.edges[t].swap_remove(rev);
                if let Some(&moved) = self.edges[t].get(rev) {
                    self.edges[moved.to][moved.rev].rev = rev;
                }
                let pos = self.edges[u].len();
                self.edges[w][i].to = u;
                self.edges[w][i].rev = pos;
                self.edges[u].push(TreeEdge {
                    to: w,
                    weight,
                    rev: i,
                });
            }
        }

        log::trace!("tree edge ({u}, {v}) weight {cost}, {} on u's side", vs.len());
        self.push_pair(u, v, cost);
    }

    /// Inserts two synthetic vertices `sside`, `tside` into the edge `s-t` that was just added,
    /// giving the path `s - sside - tside - t` with every edge weighing the cut value.
    pub fn contraction(&mut self, s: V, t: V, sside: V, tside: V) {
        assert_eq!(sside, self.edges.len(), "synthetic vertices must be added in order");
        assert_eq!(tside, sside + 1);
        self.edges.resize_with(self.edges.len() + 2, Vec::new);
        let (is, it) = (self.edges[s].len() - 1, self.edges[t].len() - 1);
        assert_eq!(self.edges[s][is].to, t, "last tree edge of {s} must go to {t}");
        assert_eq!(self.edges[t][it].to, s, "last tree edge of {t} must go to {s}");
        let f = self.edges[s][is].weight;

        self.edges[s][is] = TreeEdge {
            to: sside,
            weight: f,
            rev: 0,
        };
        self.edges[sside].push(TreeEdge {
            to: s,
            weight: f,
            rev: is,
        });
        self.edges[t][it] = TreeEdge {
            to: tside,
            weight: f,
            rev: 0,
        };
        self.edges[tside].push(TreeEdge {
            to: t,
            weight: f,
            rev: it,
        });
        self.push_pair(sside, tside, f);
    }

    /// Splices in the deferred edges, removes the synthetic vertices and roots the tree at 0.
    pub fn build(&mut self) {
        for (u, v) in std::mem::take(&mut self.degree2_edges) {
            self.push_pair(u, v, 2);
        }
        for v in self.n..self.edges.len() {
            assert_eq!(
                self.edges[v].len(),
                2,
                "synthetic vertex {v} must be on exactly two tree edges"
            );
            let (a, b) = (self.edges[v][0].to, self.edges[v][1].to);
            for e in &mut self.edges[a] {
                if e.to == v {
                    e.to = b;
                }
            }
            for e in &mut self.edges[b] {
                if e.to == v {
                    e.to = a;
                }
            }
        }
        assert_eq!(
            self.add_edge_count,
            self.n.saturating_sub(1),
            "a tree on {} vertices needs {} edges",
            self.n,
            self.n.saturating_sub(1)
        );

        if self.n > 0 {
            let mut visited = 1;
            let mut stack = vec![0];
            self.parent_weight[0] = None;
            self.depth[0] = 0;
            while let Some(v) = stack.pop() {
                let parent = self.parent_weight[v].map(|(p, _)| p);
                for i in 0..self.edges[v].len() {
                    let TreeEdge { to, weight, .. } = self.edges[v][i];
                    if Some(to) == parent {
                        continue;
                    }
                    self.parent_weight[to] = Some((v, weight));
                    self.depth[to] = self.depth[v] + 1;
                    visited += 1;
                    assert!(visited <= self.n, "tree edges contain a cycle");
                    stack.push(to);
                }
            }
            assert_eq!(visited, self.n, "tree edges do not span every vertex");
        }
        self.edges = vec![];
        self.built = true;
    }

    /// Minimum cut between `u` and `v`. Panics unless built, `u != v` and both are in range.
    pub fn query(&self, u: V, v: V) -> Weight {
        assert!(self.built, "query before build");
        assert_ne!(u, v);
        assert!(u < self.n && v < self.n, "({u}, {v}) out of range");
        let (mut u, mut v) = (u, v);
        let mut ans = Weight::MAX;
        while u != v {
            if self.depth[u] < self.depth[v] {
                std::mem::swap(&mut u, &mut v);
            }
            let Some((p, w)) = self.parent_weight[u] else {
                unreachable!("{u} is deeper but has no parent");
            };
            ans = ans.min(w);
            u = p;
        }
        ans
    }

    /// Parent and edge weight of every vertex. The root, vertex 0, has none.
    pub fn parent_weight(&self) -> &[Option<(V, Weight)>] {
        assert!(self.built, "parent_weight before build");
        &self.parent_weight
    }

    fn tree_dbg<T: AsTree>(&self, v: V, children: &[Vec<V>], tree: &T) {
        let label = match self.parent_weight[v] {
            Some((_, w)) => format!("{v} (w = {w})"),
            None => format!("{v}"),
        };
        add_branch_to!(*tree, "{label}");
        for &c in &children[v] {
            self.tree_dbg(c, children, tree);
        }
    }
}

impl Debug for GomoryHuTreeBuilder {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if !self.built {
            return f
                .debug_struct("GomoryHuTreeBuilder")
                .field("n", &self.n)
                .field("add_edge_count", &self.add_edge_count)
                .field("edges", &self.edges)
                .field("degree2_edges", &self.degree2_edges)
                .finish();
        }
        let mut children = vec![vec![]; self.n];
        for (v, pw) in self.parent_weight.iter().enumerate() {
            if let Some((p, _)) = pw {
                children[*p].push(v);
            }
        }
        let builder = TreeBuilder::new();
        let _b = builder.add_branch("GomoryHuTree");
        if self.n > 0 {
            self.tree_dbg(0, &children, &builder);
        }
        writeln!(f, "{}", builder.string())
    }
}
