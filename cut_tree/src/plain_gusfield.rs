//! Gusfield's algorithm: `n - 1` max-flow runs on the unchanged graph, no heuristics.

use std::{collections::VecDeque, marker::PhantomData};

use crate::{
    config::CutTreeConfig,
    graph::{Edge, Weight, V},
    max_flow::MaxFlow,
    union_find::UnionFind,
    CutTreeBuilder,
};

/// Flow-equivalent tree computed by Gusfield's algorithm with the flow engine `M`.
///
/// Works on disconnected graphs as well, components are chained by weight 0 edges.
#[derive(Debug, Clone)]
pub struct PlainGusfield<M: MaxFlow> {
    parent_weight: Vec<Option<(V, Weight)>>,
    depth: Vec<usize>,
    _flow: PhantomData<M>,
}

impl<M: MaxFlow> PlainGusfield<M> {
    pub fn new(edges: &[Edge], n: usize) -> Self {
        let mut uf = UnionFind::new(n);
        for &(u, v) in edges {
            uf.unite(u, v);
        }
        let (comp, num_comps) = uf.component_ids();
        let mut first = vec![usize::MAX; num_comps];
        for v in (0..n).rev() {
            first[comp[v]] = v;
        }

        let mut tree: Vec<Vec<(V, Weight)>> = vec![vec![]; n];
        let mut add_tree_edge = |u: V, v: V, w: Weight| {
            tree[u].push((v, w));
            tree[v].push((u, w));
        };
        for w in first.windows(2) {
            add_tree_edge(w[0], w[1], 0);
        }

        let mut p: Vec<V> = comp.iter().map(|&c| first[c]).collect();
        let mut mf = M::new(edges, n);
        for s in 0..n {
            let t = p[s];
            if t == s {
                continue;
            }
            let cost = mf.max_flow(s, t);
            add_tree_edge(s, t, cost);
            for v in s + 1..n {
                if p[v] == t && mf.is_source_side(v) {
                    p[v] = s;
                }
            }
        }

        // Root the tree at 0.
        let mut parent_weight = vec![None; n];
        let mut depth = vec![usize::MAX; n];
        if n > 0 {
            depth[0] = 0;
            let mut q = VecDeque::from([0]);
            while let Some(u) = q.pop_front() {
                for &(to, w) in &tree[u] {
                    if depth[to] != usize::MAX {
                        continue;
                    }
                    depth[to] = depth[u] + 1;
                    parent_weight[to] = Some((u, w));
                    q.push_back(to);
                }
            }
        }
        assert!(depth.iter().all(|&d| d != usize::MAX), "tree is not connected");
        Self {
            parent_weight,
            depth,
            _flow: PhantomData,
        }
    }

    pub fn query(&self, mut u: V, mut v: V) -> Weight {
        let n = self.depth.len();
        assert!(u != v, "query({u}, {v}) needs distinct vertices");
        assert!(u < n && v < n, "query({u}, {v}) out of range for {n} vertices");
        let mut ans = Weight::MAX;
        while u != v {
            if self.depth[u] > self.depth[v] {
                std::mem::swap(&mut u, &mut v);
            }
            let Some((p, w)) = self.parent_weight[v] else {
                unreachable!("root {v} is deeper than {u}");
            };
            ans = ans.min(w);
            v = p;
        }
        ans
    }

    pub fn parent_weight(&self) -> &[Option<(V, Weight)>] {
        &self.parent_weight
    }
}

impl<M: MaxFlow> CutTreeBuilder for PlainGusfield<M> {
    fn new(edges: Vec<Edge>, num_vertices: usize, _config: &CutTreeConfig) -> Self {
        PlainGusfield::new(&edges, num_vertices)
    }

    fn query(&self, u: V, v: V) -> Weight {
        PlainGusfield::query(self, u, v)
    }

    fn parent_weight(&self) -> &[Option<(V, Weight)>] {
        PlainGusfield::parent_weight(self)
    }
}
