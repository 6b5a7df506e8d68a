//! Basic undirected graph types shared by every module.

/// Vertex id. Vertices of a graph with `n` vertices are `0..n`.
pub type V = usize;
/// Edge count of a cut, which is also the weight of a Gomory-Hu tree edge.
pub type Weight = usize;
/// An undirected, unweighted edge.
pub type Edge = (V, V);

/// Drops self loops and parallel edges, orients every edge as `u < v` and sorts them.
pub fn to_simple_undirected(edges: impl IntoIterator<Item = Edge>) -> Vec<Edge> {
    let mut edges: Vec<Edge> = edges
        .into_iter()
        .filter(|&(u, v)| u != v)
        .map(|(u, v)| (u.min(v), u.max(v)))
        .collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Smallest vertex count that contains every endpoint.
pub fn num_vertices_of(edges: &[Edge]) -> usize {
    edges.iter().map(|&(u, v)| u.max(v) + 1).max().unwrap_or(0)
}

/// Adjacency lists of an undirected graph. Every edge appears in the lists of both endpoints.
#[derive(Debug, Clone)]
pub struct Graph {
    adj: Vec<Vec<V>>,
    num_edges: usize,
}

impl Graph {
    pub fn new(edges: &[Edge], n: usize) -> Self {
        let mut adj = vec![vec![]; n];
        for &(u, v) in edges {
            assert!(u < n && v < n, "edge ({u}, {v}) out of range for {n} vertices");
            adj[u].push(v);
            adj[v].push(u);
        }
        Self {
            adj,
            num_edges: edges.len(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.adj.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn neighbors(&self, v: V) -> &[V] {
        &self.adj[v]
    }

    pub fn degree(&self, v: V) -> usize {
        self.adj[v].len()
    }

    /// Each edge once, as `(u, v)` with `u < v`, in adjacency order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(u, l)| l.iter().filter(move |&&v| u < v).map(move |&v| (u, v)))
    }
}
