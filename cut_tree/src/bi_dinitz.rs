//! Dinic max-flow for unit capacity undirected graphs, growing level graphs from both ends.
//!
//! Every phase alternates BFS levels from `s` and from `t`, always expanding the side whose
//! frontier has fewer outgoing arcs, and stops as soon as the two searches touch. When a search
//! runs out of vertices, the side that ran out is remembered: its reached set is one side of a
//! minimum cut.
//!
//! Capacities are reset lazily. Every arc remembers the graph revision it was last written in, and
//! an arc from an older revision reads as its initial capacity. Visited marks are revision stamps
//! too, so starting a new flow or a new phase is O(1).

use std::collections::VecDeque;

use derivative::Derivative;

use crate::{
    graph::{Edge, Weight, V},
    max_flow::MaxFlow,
};

pub type Revision = u32;

/// A residual arc. The arc `edges[v][i]` has its twin at `edges[to][rev]`.
#[derive(Debug, Clone, Copy)]
pub struct FlowEdge {
    to: V,
    rev: usize,
    cap: i32,
    revision: Revision,
}

impl FlowEdge {
    const INIT_CAP: i32 = 1;

    fn new(to: V, rev: usize) -> Self {
        Self {
            to,
            rev,
            cap: Self::INIT_CAP,
            revision: 0,
        }
    }

    pub fn to(&self) -> V {
        self.to
    }

    pub fn rev(&self) -> usize {
        self.rev
    }

    /// Residual capacity as of `graph_revision`.
    pub fn cap(&self, graph_revision: Revision) -> i32 {
        if self.revision == graph_revision {
            self.cap
        } else {
            Self::INIT_CAP
        }
    }

    fn add_cap(&mut self, delta: i32, graph_revision: Revision) {
        self.cap = self.cap(graph_revision) + delta;
        self.revision = graph_revision;
    }

    fn reset(&mut self) {
        self.cap = Self::INIT_CAP;
        self.revision = 0;
    }
}

/// Which search ran out of vertices in the last phase of the last flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BfsFinish {
    /// Everything reachable from `s` was marked: that set is the source side of a min cut.
    SourceSideExhausted,
    /// Everything that reaches `t` was marked: that set is the sink side of a min cut.
    SinkSideExhausted,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct BiDinitz {
    edges: Vec<Vec<FlowEdge>>,
    /// Distance from `s` and distance from `t` in the current phase.
    level: Vec<(usize, usize)>,
    iter: Vec<usize>,
    bfs_revision: Vec<Revision>,
    dfs_revision: Vec<Revision>,
    /// Always even. The sink side stamp is this plus one.
    s_side_bfs_revision: Revision,
    t_side_bfs_revision: Revision,
    graph_revision: Revision,
    finish: BfsFinish,
    revision_limit: Revision,

    goal_root: Option<V>,
    #[derivative(Debug = "ignore")]
    goal_depth: Vec<usize>,
    goal_unreached: usize,
    goal_aster_ub: usize,
    /// Vertices on the goal oriented path being grown, plus its source.
    #[derivative(Debug = "ignore")]
    on_goal_path: Vec<bool>,

    #[derivative(Debug = "ignore")]
    qs: VecDeque<V>,
    #[derivative(Debug = "ignore")]
    qt: VecDeque<V>,
    #[derivative(Debug = "ignore")]
    path: Vec<(V, usize)>,
    /// Per frame of the blocking DFS: still walking up the s levels. For the goal search, the
    /// accumulated detour cost.
    #[derivative(Debug = "ignore")]
    frames: Vec<isize>,
}

impl BiDinitz {
    pub fn new(edges: &[Edge], n: usize) -> Self {
        let mut dz = Self {
            edges: vec![vec![]; n],
            level: vec![(0, 0); n],
            iter: vec![0; n],
            bfs_revision: vec![0; n],
            dfs_revision: vec![0; n],
            s_side_bfs_revision: 2,
            t_side_bfs_revision: 3,
            graph_revision: 0,
            finish: BfsFinish::SourceSideExhausted,
            revision_limit: Revision::MAX / 2,
            goal_root: None,
            goal_depth: vec![],
            goal_unreached: 0,
            goal_aster_ub: 2,
            on_goal_path: vec![false; n],
            qs: VecDeque::new(),
            qt: VecDeque::new(),
            path: vec![],
            frames: vec![],
        };
        for &(u, v) in edges {
            dz.add_undirected_edge(u, v);
        }
        dz
    }

    pub fn n(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, v: V) -> usize {
        self.edges[v].len()
    }

    pub fn edges(&self, v: V) -> &[FlowEdge] {
        &self.edges[v]
    }

    pub fn to(&self, v: V, i: usize) -> V {
        self.edges[v][i].to
    }

    /// Residual capacity of the arc `edges[v][i]` left by the last flow.
    pub fn cap(&self, v: V, i: usize) -> i32 {
        self.edges[v][i].cap(self.graph_revision)
    }

    /// Residual capacity of the twin of `edges[v][i]`, going back into `v`.
    pub fn rev_cap(&self, v: V, i: usize) -> i32 {
        let FlowEdge { to, rev, .. } = self.edges[v][i];
        self.edges[to][rev].cap(self.graph_revision)
    }

    pub fn finish(&self) -> BfsFinish {
        self.finish
    }

    /// Adds an isolated vertex and returns its id.
    pub fn add_vertex(&mut self) -> V {
        self.edges.push(vec![]);
        self.level.push((0, 0));
        self.iter.push(0);
        self.bfs_revision.push(0);
        self.dfs_revision.push(0);
        self.on_goal_path.push(false);
        if self.goal_root.is_some() {
            self.goal_depth.push(self.goal_unreached);
        }
        self.edges.len() - 1
    }

    fn add_undirected_edge(&mut self, u: V, v: V) {
        assert_ne!(u, v, "self loops are not supported");
        let (iu, iv) = (self.edges[u].len(), self.edges[v].len());
        self.edges[u].push(FlowEdge::new(v, iv));
        self.edges[v].push(FlowEdge::new(u, iu));
    }

    /// Splits the edge `edges[v][i]` between `v` and `to` into `v-sside` and `tside-to`.
    ///
    /// Applied to every edge of a min cut after contraction: `sside` stands for the whole sink side
    /// as seen from the source side and `tside` the other way around. The two sides stop sharing
    /// edges while every cut inside either side keeps its value.
    pub fn reconnect_edge(&mut self, v: V, i: usize, sside: V, tside: V) {
        let FlowEdge { to, rev: to_rev, .. } = self.edges[v][i];
        let FlowEdge {
            to: from,
            rev: from_rev,
            ..
        } = self.edges[to][to_rev];
        debug_assert_eq!((from, from_rev), (v, i));

        self.add_undirected_edge(sside, tside);
        let se = self.edges[sside].len() - 1;
        let te = self.edges[tside].len() - 1;

        self.edges[v][i].to = sside;
        self.edges[v][i].rev = se;
        self.edges[to][to_rev].to = tside;
        self.edges[to][to_rev].rev = te;
        self.edges[sside][se].to = from;
        self.edges[sside][se].rev = from_rev;
        self.edges[tside][te].to = to;
        self.edges[tside][te].rev = to_rev;
    }

    /// Prepares the goal oriented preflow towards `root`: computes BFS depths from `root` and
    /// sorts every adjacency list by the depth of the neighbor.
    ///
    /// From then on, every `max_flow(s, root)` first greedily routes flow along paths that never
    /// move away from `root` by more than `aster_ub` in total detour.
    pub fn goal_oriented_bfs_init(&mut self, root: V, aster_ub: usize) {
        let n = self.n();
        self.goal_root = Some(root);
        self.goal_aster_ub = aster_ub;
        self.goal_unreached = n;
        self.goal_depth.clear();
        self.goal_depth.resize(n, n);

        self.goal_depth[root] = 0;
        self.qs.clear();
        self.qs.push_back(root);
        while let Some(v) = self.qs.pop_front() {
            let ndepth = self.goal_depth[v] + 1;
            for e in &self.edges[v] {
                if self.goal_depth[e.to] > ndepth {
                    self.goal_depth[e.to] = ndepth;
                    self.qs.push_back(e.to);
                }
            }
        }

        for v in 0..n {
            let depth = &self.goal_depth;
            self.edges[v].sort_by_key(|e| depth[e.to]);
            for i in 0..self.edges[v].len() {
                let FlowEdge { to, rev, .. } = self.edges[v][i];
                self.edges[to][rev].rev = i;
            }
        }
    }

    /// Vertex `v` cannot reach `t` in the residual graph of the last flow, for the cut that was
    /// found.
    pub fn path_dont_exists_to_t(&self, v: V) -> bool {
        match self.finish {
            BfsFinish::SourceSideExhausted => self.bfs_revision[v] == self.s_side_bfs_revision,
            BfsFinish::SinkSideExhausted => self.bfs_revision[v] != self.t_side_bfs_revision,
        }
    }

    /// Vertex `v` cannot be reached from `s` in the residual graph of the last flow, for the cut
    /// that was found.
    pub fn path_dont_exists_from_s(&self, v: V) -> bool {
        match self.finish {
            BfsFinish::SourceSideExhausted => self.bfs_revision[v] != self.s_side_bfs_revision,
            BfsFinish::SinkSideExhausted => self.bfs_revision[v] == self.t_side_bfs_revision,
        }
    }

    /// Maximum number of edge-disjoint paths between `s` and `t`.
    pub fn max_flow(&mut self, s: V, t: V) -> Weight {
        assert_ne!(s, t, "max_flow needs two distinct vertices");
        self.reset_graph();

        let mut flow = 0;
        if self.goal_root == Some(t) {
            flow = self.goal_oriented_dfs(s);
            if flow == self.degree(s) {
                // Every edge of s is saturated, nothing else is reachable.
                self.bfs_revision[s] = self.s_side_bfs_revision;
                self.finish = BfsFinish::SourceSideExhausted;
                return flow;
            }
        }

        loop {
            self.next_phase();
            if !self.bi_bfs(s, t) {
                break;
            }
            loop {
                let f = self.blocking_dfs(s, t);
                if f == 0 {
                    break;
                }
                flow += f;
            }
        }
        flow
    }

    /// Starts a new flow: all capacities go back to their initial value.
    pub fn reset_graph(&mut self) {
        self.graph_revision += 1;
        if self.s_side_bfs_revision >= self.revision_limit {
            self.reset_revision();
        }
    }

    fn reset_revision(&mut self) {
        log::debug!("bi_dinitz: revision counters exhausted, resetting every stamp");
        for e in self.edges.iter_mut().flatten() {
            e.reset();
        }
        self.bfs_revision.fill(0);
        self.dfs_revision.fill(0);
        self.s_side_bfs_revision = 2;
        self.t_side_bfs_revision = 3;
        self.graph_revision = 0;
    }

    fn next_phase(&mut self) {
        self.s_side_bfs_revision += 2;
        self.t_side_bfs_revision += 2;
    }

    fn push_flow(&mut self, v: V, i: usize, f: i32) {
        let gr = self.graph_revision;
        let FlowEdge { to, rev, .. } = self.edges[v][i];
        self.edges[v][i].add_cap(-f, gr);
        self.edges[to][rev].add_cap(f, gr);
        assert!(
            self.edges[v][i].cap(gr) >= 0,
            "negative residual capacity on ({v}, {to})"
        );
    }

    /// Pushes `limit`-bounded flow along the arcs of `self.path`, returning the amount pushed.
    fn augment_path(&mut self, limit: i32) -> i32 {
        let gr = self.graph_revision;
        let path = std::mem::take(&mut self.path);
        let f = path
            .iter()
            .map(|&(u, i)| self.edges[u][i].cap(gr))
            .fold(limit, i32::min);
        assert!(f > 0, "augmenting path without residual capacity");
        for &(u, i) in &path {
            self.push_flow(u, i, f);
        }
        self.path = path;
        f
    }

    /// Grows levels from both ends until they meet. Returns whether they met.
    fn bi_bfs(&mut self, s: V, t: V) -> bool {
        let (s_stamp, t_stamp) = (self.s_side_bfs_revision, self.t_side_bfs_revision);
        let gr = self.graph_revision;
        self.qs.clear();
        self.qt.clear();
        self.qs.push_back(s);
        self.qt.push_back(t);
        self.level[s].0 = 0;
        self.level[t].1 = 0;
        self.bfs_revision[s] = s_stamp;
        self.bfs_revision[t] = t_stamp;

        let mut qs_next_cap = self.degree(s);
        let mut qt_next_cap = self.degree(t);
        let (mut slevel, mut tlevel) = (0, 0);
        while !self.qs.is_empty() && !self.qt.is_empty() {
            let mut path_found = false;
            if qs_next_cap <= qt_next_cap {
                for _ in 0..self.qs.len() {
                    let Some(v) = self.qs.pop_front() else { break };
                    qs_next_cap -= self.edges[v].len();
                    for e in &self.edges[v] {
                        let to = e.to;
                        if e.cap(gr) == 0 || self.bfs_revision[to] == s_stamp {
                            continue;
                        }
                        if self.bfs_revision[to] == t_stamp {
                            path_found = true;
                            continue;
                        }
                        self.bfs_revision[to] = s_stamp;
                        self.level[to].0 = slevel + 1;
                        qs_next_cap += self.edges[to].len();
                        self.qs.push_back(to);
                    }
                }
                slevel += 1;
            } else {
                for _ in 0..self.qt.len() {
                    let Some(v) = self.qt.pop_front() else { break };
                    qt_next_cap -= self.edges[v].len();
                    for e in &self.edges[v] {
                        let to = e.to;
                        if self.edges[to][e.rev].cap(gr) == 0 || self.bfs_revision[to] == t_stamp {
                            continue;
                        }
                        if self.bfs_revision[to] == s_stamp {
                            path_found = true;
                            continue;
                        }
                        self.bfs_revision[to] = t_stamp;
                        self.level[to].1 = tlevel + 1;
                        qt_next_cap += self.edges[to].len();
                        self.qt.push_back(to);
                    }
                }
                tlevel += 1;
            }
            if path_found {
                return true;
            }
        }

        self.finish = if self.qs.is_empty() {
            BfsFinish::SourceSideExhausted
        } else {
            BfsFinish::SinkSideExhausted
        };
        false
    }

    /// Finds one augmenting path in the current level graph and pushes its bottleneck.
    ///
    /// Walks up the s levels until it steps on a vertex reached from `t`, then walks down the t
    /// levels. Exhausted arcs advance the per-vertex cursor so the phase is linear overall.
    fn blocking_dfs(&mut self, s: V, t: V) -> Weight {
        let gr = self.graph_revision;
        let (s_stamp, t_stamp) = (self.s_side_bfs_revision, self.t_side_bfs_revision);
        self.path.clear();
        self.frames.clear();
        self.frames.push(1);
        let mut v = s;
        loop {
            if v == t {
                return self.augment_path(i32::MAX) as Weight;
            }
            if self.dfs_revision[v] != self.bfs_revision[v] {
                self.dfs_revision[v] = self.bfs_revision[v];
                self.iter[v] = 0;
            }
            let use_slevel = self.frames.last() == Some(&1);
            let mut next = None;
            while self.iter[v] < self.edges[v].len() {
                let e = self.edges[v][self.iter[v]];
                let to = e.to;
                if e.cap(gr) > 0 && self.bfs_revision[to] / 2 == s_stamp / 2 {
                    let to_t_side = self.bfs_revision[to] == t_stamp;
                    let admissible = if use_slevel {
                        to_t_side || self.level[v].0 < self.level[to].0
                    } else {
                        to_t_side && self.level[v].1 > self.level[to].1
                    };
                    if admissible {
                        next = Some((to, use_slevel && !to_t_side));
                        break;
                    }
                }
                self.iter[v] += 1;
            }
            match next {
                Some((to, next_slevel)) => {
                    self.path.push((v, self.iter[v]));
                    self.frames.push(next_slevel as isize);
                    v = to;
                }
                None => {
                    self.frames.pop();
                    let Some((u, _)) = self.path.pop() else {
                        return 0;
                    };
                    self.iter[u] += 1;
                    v = u;
                }
            }
        }
    }

    /// Greedily sends flow from `s` to the goal root. Returns the amount sent.
    fn goal_oriented_dfs(&mut self, s: V) -> Weight {
        self.next_phase();
        let mut flow = 0;
        self.on_goal_path[s] = true;
        for i in 0..self.degree(s) {
            loop {
                let cap = self.cap(s, i);
                if cap <= 0 {
                    break;
                }
                let add = self.goal_oriented_path(self.edges[s][i].to, cap);
                if add == 0 {
                    break;
                }
                flow += add as Weight;
                self.push_flow(s, i, add);
            }
        }
        self.on_goal_path[s] = false;
        flow
    }

    /// Sends up to `limit` flow from `start` to the goal root along one simple path whose total
    /// detour stays within the budget. Cursors make dead ends permanent for the current flow.
    fn goal_oriented_path(&mut self, start: V, limit: i32) -> i32 {
        if self.on_goal_path[start] {
            return 0;
        }
        let Some(root) = self.goal_root else {
            return 0;
        };
        let gr = self.graph_revision;
        let stamp = self.s_side_bfs_revision;
        let ub = self.goal_aster_ub as isize;
        self.path.clear();
        self.frames.clear();
        self.frames.push(0);
        let mut v = start;
        loop {
            if v == root {
                for &(u, _) in &self.path {
                    self.on_goal_path[u] = false;
                }
                return self.augment_path(limit);
            }
            self.on_goal_path[v] = true;
            if self.dfs_revision[v] != stamp {
                self.dfs_revision[v] = stamp;
                self.iter[v] = 0;
            }
            let cost = self.frames.last().copied().unwrap_or(0);
            let mut next = None;
            while self.iter[v] < self.edges[v].len() {
                let e = self.edges[v][self.iter[v]];
                let add = self.goal_depth[e.to] as isize - self.goal_depth[v] as isize + 1;
                // Lists are sorted by depth: nothing after this arc gets closer to the root.
                if add == 2 || cost + add > ub {
                    break;
                }
                // A vertex already on the path would send flow through one arc twice.
                if e.cap(gr) > 0 && !self.on_goal_path[e.to] {
                    next = Some((e.to, cost + add));
                    break;
                }
                self.iter[v] += 1;
            }
            match next {
                Some((to, ncost)) => {
                    self.path.push((v, self.iter[v]));
                    self.frames.push(ncost);
                    v = to;
                }
                None => {
                    self.on_goal_path[v] = false;
                    self.frames.pop();
                    let Some((u, _)) = self.path.pop() else {
                        return 0;
                    };
                    self.iter[u] += 1;
                    v = u;
                }
            }
        }
    }

    #[cfg(test)]
    fn set_revision_limit(&mut self, limit: Revision) {
        self.revision_limit = limit;
    }
}

impl MaxFlow for BiDinitz {
    fn new(edges: &[Edge], num_vertices: usize) -> Self {
        BiDinitz::new(edges, num_vertices)
    }

    fn max_flow(&mut self, s: V, t: V) -> Weight {
        BiDinitz::max_flow(self, s, t)
    }

    fn is_source_side(&self, v: V) -> bool {
        self.path_dont_exists_to_t(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dinitz::Dinitz;

    /// Two 4-cliques {0..4} and {4..8} joined by the edges 3-4 and 0-7.
    fn two_cliques() -> Vec<Edge> {
        let mut e = vec![];
        for base in [0, 4] {
            for u in base..base + 4 {
                for v in u + 1..base + 4 {
                    e.push((u, v));
                }
            }
        }
        e.push((3, 4));
        e.push((0, 7));
        e
    }

    #[test]
    fn simple_flows() {
        let mut dz = BiDinitz::new(&two_cliques(), 8);
        assert_eq!(dz.max_flow(1, 5), 2);
        assert_eq!(dz.max_flow(0, 3), 4);
        assert_eq!(dz.max_flow(3, 0), 4);
        assert_eq!(dz.max_flow(6, 2), 2);
        assert_eq!(dz.max_flow(4, 7), 4);
    }

    #[test]
    fn cut_sides() {
        let mut dz = BiDinitz::new(&two_cliques(), 8);
        assert_eq!(dz.max_flow(1, 6), 2);
        for v in 0..8 {
            assert_eq!(dz.path_dont_exists_to_t(v), v < 4, "v = {v}");
            assert_eq!(dz.path_dont_exists_from_s(v), v >= 4, "v = {v}");
        }
    }

    #[test]
    fn disconnected() {
        let mut dz = BiDinitz::new(&[(0, 1), (2, 3)], 5);
        assert_eq!(dz.max_flow(0, 3), 0);
        assert!(dz.path_dont_exists_to_t(1));
        assert!(!dz.path_dont_exists_to_t(2));
        assert_eq!(dz.max_flow(4, 0), 0);
        assert_eq!(dz.max_flow(0, 1), 1);
    }

    #[test]
    fn goal_oriented() {
        let mut dz = BiDinitz::new(&two_cliques(), 8);
        dz.goal_oriented_bfs_init(0, 2);
        for v in 1..4 {
            assert_eq!(dz.max_flow(v, 0), 3 + (v == 3) as usize);
        }
        assert_eq!(dz.max_flow(5, 0), 2);
        assert_eq!(dz.max_flow(7, 0), 2);
        // Other sinks don't use the preflow.
        assert_eq!(dz.max_flow(7, 5), 3);
        assert_eq!(dz.max_flow(4, 7), 4);
        // Adjacency lists are still consistent.
        for v in 0..8 {
            for (i, e) in dz.edges(v).iter().enumerate() {
                assert_eq!(dz.edges(e.to())[e.rev()].to(), v);
                assert_eq!(dz.edges(e.to())[e.rev()].rev(), i);
            }
        }
    }

    #[test]
    fn goal_oriented_large_budget() {
        // Many same depth edges, so detours can run back and forth between two vertices.
        let mut e = two_cliques();
        e.extend([(1, 5), (2, 6), (3, 7)]);
        let mut d = Dinitz::new(&e, 8);
        for ub in 0..8 {
            for root in 0..8 {
                let mut dz = BiDinitz::new(&e, 8);
                dz.goal_oriented_bfs_init(root, ub);
                for s in (0..8).filter(|&s| s != root) {
                    assert_eq!(dz.max_flow(s, root), d.max_flow(s, root), "({s}, {root}) ub {ub}");
                    assert!(dz.on_goal_path.iter().all(|&b| !b));
                }
            }
        }
    }

    #[test]
    fn reconnect_keeps_cut_values() {
        let mut dz = BiDinitz::new(&two_cliques(), 8);
        assert_eq!(dz.max_flow(0, 4), 2);
        let sside = dz.add_vertex();
        let tside = dz.add_vertex();
        let cut: Vec<(V, usize)> = (0..4)
            .flat_map(|v| (0..dz.degree(v)).map(move |i| (v, i)))
            .filter(|&(v, i)| dz.to(v, i) >= 4)
            .collect();
        assert_eq!(cut.len(), 2);
        for (v, i) in cut {
            dz.reconnect_edge(v, i, sside, tside);
        }
        assert_eq!(dz.degree(sside), 2);
        assert_eq!(dz.degree(tside), 2);
        assert_eq!(dz.max_flow(1, 5), 0);
        assert_eq!(dz.max_flow(1, sside), 2);
        assert_eq!(dz.max_flow(5, tside), 2);
        assert_eq!(dz.max_flow(3, 2), 3);
        assert_eq!(dz.max_flow(3, 0), 4);
    }

    #[test]
    fn revision_reset() {
        let mut dz = BiDinitz::new(&two_cliques(), 8);
        dz.set_revision_limit(10);
        for _ in 0..20 {
            assert_eq!(dz.max_flow(1, 5), 2);
            assert_eq!(dz.max_flow(2, 3), 3);
            assert_eq!(dz.max_flow(0, 3), 4);
        }
    }
}
