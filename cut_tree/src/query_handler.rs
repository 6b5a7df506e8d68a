//! Answers cut queries from a tree written in the text format, without the original graph.

use std::{
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    error::{check_query, Error, Result},
    graph::{Weight, V},
    io::read_tree,
};

#[derive(Debug, Clone)]
pub struct CutTreeQueryHandler {
    adj: Vec<Vec<(V, Weight)>>,
    parent_weight: Vec<Option<(V, Weight)>>,
    depth: Vec<usize>,
}

impl CutTreeQueryHandler {
    /// Builds from `n - 1` weighted edges on the vertices `0..n`.
    pub fn new(edges: &[(V, V, Weight)]) -> Result<Self> {
        let n = edges.len() + 1;
        let mut adj = vec![vec![]; n];
        for &(u, v, w) in edges {
            for vertex in [u, v] {
                if vertex >= n {
                    return Err(Error::InvalidVertex {
                        vertex,
                        num_vertices: n,
                    });
                }
            }
            adj[u].push((v, w));
            adj[v].push((u, w));
        }

        let mut parent_weight = vec![None; n];
        let mut depth = vec![usize::MAX; n];
        depth[0] = 0;
        let mut q = VecDeque::from([0]);
        let mut reached = 1;
        while let Some(u) = q.pop_front() {
            for &(to, w) in &adj[u] {
                if depth[to] != usize::MAX {
                    continue;
                }
                depth[to] = depth[u] + 1;
                parent_weight[to] = Some((u, w));
                reached += 1;
                q.push_back(to);
            }
        }
        if reached != n {
            return Err(Error::NotATree(format!(
                "{} edges reach only {reached} of {n} vertices",
                edges.len()
            )));
        }
        Ok(Self {
            adj,
            parent_weight,
            depth,
        })
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        Self::new(&read_tree(reader)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn num_vertices(&self) -> usize {
        self.depth.len()
    }

    /// Lightest edge on the path between `u` and `v`, as `(child, parent, weight)`.
    fn min_edge(&self, mut u: V, mut v: V) -> (V, V, Weight) {
        let mut best = (v, v, Weight::MAX);
        while u != v {
            if self.depth[u] > self.depth[v] {
                std::mem::swap(&mut u, &mut v);
            }
            let Some((p, w)) = self.parent_weight[v] else {
                unreachable!("root {v} is deeper than {u}");
            };
            if w < best.2 {
                best = (v, p, w);
            }
            v = p;
        }
        best
    }

    /// Minimum cut between `u` and `v`. Panics if `u == v` or either is out of range.
    pub fn query(&self, u: V, v: V) -> Weight {
        let n = self.num_vertices();
        assert!(u != v, "query({u}, {v}) needs distinct vertices");
        assert!(u < n && v < n, "query({u}, {v}) out of range for {n} vertices");
        self.min_edge(u, v).2
    }

    pub fn try_query(&self, u: V, v: V) -> Result<Weight> {
        check_query(u, v, self.num_vertices())?;
        Ok(self.query(u, v))
    }

    /// The two sides of a minimum `u`-`v` cut: the tree split at the lightest edge on the path.
    pub fn cutset(&self, u: V, v: V) -> (Vec<V>, Vec<V>) {
        let n = self.num_vertices();
        assert!(u != v, "cutset({u}, {v}) needs distinct vertices");
        assert!(u < n && v < n, "cutset({u}, {v}) out of range for {n} vertices");
        let (a, b, _) = self.min_edge(u, v);
        let is_cut = |x: V, y: V| (x == a && y == b) || (x == b && y == a);

        let mut used = vec![false; n];
        let mut side = |start: V| {
            let mut out = vec![];
            let mut q = VecDeque::from([start]);
            used[start] = true;
            while let Some(x) = q.pop_front() {
                out.push(x);
                for &(y, _) in &self.adj[x] {
                    if used[y] || is_cut(x, y) {
                        continue;
                    }
                    used[y] = true;
                    q.push_back(y);
                }
            }
            out
        };
        let s = side(u);
        let t = side(v);
        assert_eq!(s.len() + t.len(), n, "cut sides must cover the tree");
        (s, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 -3- 1 -1- 2 -4- 3, and 1 -2- 4.
    fn handler() -> CutTreeQueryHandler {
        CutTreeQueryHandler::new(&[(0, 1, 3), (1, 2, 1), (2, 3, 4), (4, 1, 2)]).unwrap()
    }

    #[test]
    fn queries() {
        let h = handler();
        assert_eq!(h.num_vertices(), 5);
        assert_eq!(h.query(0, 1), 3);
        assert_eq!(h.query(0, 3), 1);
        assert_eq!(h.query(3, 4), 1);
        assert_eq!(h.query(0, 4), 2);
        assert_eq!(h.query(2, 3), 4);
        assert!(h.try_query(2, 2).is_err());
        assert!(h.try_query(0, 5).is_err());
    }

    #[test]
    fn cutsets() {
        let h = handler();
        let (mut s, mut t) = h.cutset(0, 3);
        s.sort();
        t.sort();
        assert_eq!((s, t), (vec![0, 1, 4], vec![2, 3]));
        let (s, t) = h.cutset(4, 0);
        assert_eq!((s, t), (vec![4], vec![0, 1, 2, 3]));
    }

    #[test]
    fn malformed() {
        assert!(matches!(
            CutTreeQueryHandler::new(&[(0, 1, 1), (0, 1, 1)]),
            Err(Error::NotATree(_))
        ));
        assert!(matches!(
            CutTreeQueryHandler::new(&[(0, 7, 1)]),
            Err(Error::InvalidVertex { vertex: 7, .. })
        ));
        assert!(CutTreeQueryHandler::from_reader("0 1 2\n1 2\n".as_bytes()).is_err());
        let h = CutTreeQueryHandler::from_reader("".as_bytes()).unwrap();
        assert_eq!(h.num_vertices(), 1);
    }
}
