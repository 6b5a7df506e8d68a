//! Plain Dinic max-flow, kept simple on purpose to cross-check the faster engines.

use std::collections::VecDeque;

use crate::{
    graph::{Edge, Weight, V},
    max_flow::MaxFlow,
};

const UNREACHED: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Arc {
    to: V,
    rev: usize,
    cap: i32,
}

#[derive(Debug, Clone)]
pub struct Dinitz {
    edges: Vec<Vec<Arc>>,
    level: Vec<usize>,
    iter: Vec<usize>,
}

impl Dinitz {
    fn bfs(&mut self, s: V) {
        self.level.fill(UNREACHED);
        self.level[s] = 0;
        let mut q = VecDeque::from([s]);
        while let Some(v) = q.pop_front() {
            for e in &self.edges[v] {
                if e.cap > 0 && self.level[e.to] == UNREACHED {
                    self.level[e.to] = self.level[v] + 1;
                    q.push_back(e.to);
                }
            }
        }
    }

    /// One augmenting path in the level graph, with an explicit stack of arcs.
    fn dfs(&mut self, s: V, t: V) -> i32 {
        let mut path: Vec<(V, usize)> = vec![];
        let mut v = s;
        loop {
            if v == t {
                let f = path
                    .iter()
                    .map(|&(u, i)| self.edges[u][i].cap)
                    .min()
                    .unwrap_or(0);
                for &(u, i) in &path {
                    let Arc { to, rev, .. } = self.edges[u][i];
                    self.edges[u][i].cap -= f;
                    self.edges[to][rev].cap += f;
                }
                return f;
            }
            let mut advanced = false;
            while self.iter[v] < self.edges[v].len() {
                let e = self.edges[v][self.iter[v]];
                if e.cap > 0 && self.level[e.to] == self.level[v] + 1 {
                    path.push((v, self.iter[v]));
                    v = e.to;
                    advanced = true;
                    break;
                }
                self.iter[v] += 1;
            }
            if !advanced {
                let Some((u, _)) = path.pop() else {
                    return 0;
                };
                self.iter[u] += 1;
                v = u;
            }
        }
    }
}

impl MaxFlow for Dinitz {
    fn new(edges: &[Edge], num_vertices: usize) -> Self {
        let mut g: Vec<Vec<Arc>> = vec![vec![]; num_vertices];
        for &(u, v) in edges {
            let (iu, iv) = (g[u].len(), g[v].len());
            g[u].push(Arc {
                to: v,
                rev: iv,
                cap: 1,
            });
            g[v].push(Arc {
                to: u,
                rev: iu,
                cap: 1,
            });
        }
        Self {
            edges: g,
            level: vec![UNREACHED; num_vertices],
            iter: vec![0; num_vertices],
        }
    }

    fn max_flow(&mut self, s: V, t: V) -> Weight {
        assert_ne!(s, t, "max_flow needs two distinct vertices");
        for e in self.edges.iter_mut().flatten() {
            e.cap = 1;
        }
        let mut flow = 0;
        loop {
            self.bfs(s);
            if self.level[t] == UNREACHED {
                return flow;
            }
            self.iter.fill(0);
            loop {
                let f = self.dfs(s, t);
                if f == 0 {
                    break;
                }
                flow += f as Weight;
            }
        }
    }

    fn is_source_side(&self, v: V) -> bool {
        self.level[v] != UNREACHED
    }
}
