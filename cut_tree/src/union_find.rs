//! Disjoint-set forest with path compression and union by rank.

use crate::graph::V;

#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<V>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn root(&mut self, mut v: V) -> V {
        let mut r = v;
        while self.parent[r] != r {
            r = self.parent[r];
        }
        while self.parent[v] != r {
            v = std::mem::replace(&mut self.parent[v], r);
        }
        r
    }

    /// Joins the sets of `u` and `v`. Returns false if they already were the same set.
    pub fn unite(&mut self, u: V, v: V) -> bool {
        let (mut u, mut v) = (self.root(u), self.root(v));
        if u == v {
            return false;
        }
        if self.rank[u] < self.rank[v] {
            std::mem::swap(&mut u, &mut v);
        }
        self.parent[v] = u;
        if self.rank[u] == self.rank[v] {
            self.rank[u] += 1;
        }
        true
    }

    pub fn is_same(&mut self, u: V, v: V) -> bool {
        self.root(u) == self.root(v)
    }

    /// Dense component id per vertex, numbered in order of each component's smallest vertex.
    pub fn component_ids(&mut self) -> (Vec<usize>, usize) {
        let n = self.parent.len();
        let mut id_of_root = vec![usize::MAX; n];
        let mut ids = Vec::with_capacity(n);
        let mut count = 0;
        for v in 0..n {
            let r = self.root(v);
            if id_of_root[r] == usize::MAX {
                id_of_root[r] = count;
                count += 1;
            }
            ids.push(id_of_root[r]);
        }
        (ids, count)
    }
}
