//! Gomory-Hu tree of a 2-edge-connected graph.
//!
//! Cheap heuristics settle as many vertices as possible before any flow runs, then the separator
//! runs Gomory-Hu steps in an order that tends to find balanced cuts early, so contraction
//! shrinks the flow graph quickly.

use std::{cmp::Reverse, collections::VecDeque, time::Instant};

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    bi_dinitz::BiDinitz,
    config::CutTreeConfig,
    disjoint_cut_set::DisjointCutSet,
    gomory_hu_tree_builder::GomoryHuTreeBuilder,
    graph::{Edge, Weight, V},
    greedy_treepacking::GreedyTreePacking,
    separator::Separator,
    CutTreeBuilder,
};

/// What each phase did while building.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutTreeStats {
    pub degree2_contracted: usize,
    pub pruned_by_tree_packing: usize,
    pub max_flow_times: usize,
    pub contractions: usize,
}

#[derive(Debug)]
pub struct CutTreeWith2ECC {
    num_vertices: usize,
    gh_builder: GomoryHuTreeBuilder,
    stats: CutTreeStats,
}

fn timed<T>(key: &str, enabled: bool, f: impl FnOnce() -> T) -> T {
    if !enabled {
        return f();
    }
    let start = Instant::now();
    let ret = f();
    log::info!("time.{key}: {:?}", start.elapsed());
    ret
}

/// First vertex of maximum degree.
fn first_max_degree(degree: &[usize]) -> Option<V> {
    (0..degree.len()).reduce(|best, v| if degree[best] < degree[v] { v } else { best })
}

/// Hangs every degree-2 vertex off its BFS parent with weight 2, then replaces each of them by an
/// edge between its two neighbors. Returns the remaining edges and the number of vertices hung.
fn contract_degree2_vertices(
    edges: Vec<Edge>,
    degree: &[usize],
    gh_builder: &mut GomoryHuTreeBuilder,
) -> (Vec<Edge>, usize) {
    let n = degree.len();
    let Some(root) = first_max_degree(degree) else {
        return (edges, 0);
    };
    let mut adj = vec![vec![]; n];
    for (u, v) in edges {
        adj[u].push(v);
        adj[v].push(u);
    }

    let mut contracted = 0;
    let mut visited = vec![false; n];
    let mut q = VecDeque::from([root]);
    visited[root] = true;
    while let Some(v) = q.pop_front() {
        for &u in &adj[v] {
            if visited[u] {
                continue;
            }
            visited[u] = true;
            q.push_back(u);
            if degree[u] == 2 {
                gh_builder.add_degree2_edge(u, v);
                contracted += 1;
            }
        }
    }

    for i in 0..n {
        if adj[i].len() != 2 {
            continue;
        }
        let (a, b) = (adj[i][0], adj[i][1]);
        for x in [a, b] {
            if let Some(p) = adj[x].iter().position(|&y| y == i) {
                adj[x].remove(p);
            }
        }
        adj[a].push(b);
        adj[b].push(a);
        adj[i].clear();
    }

    let edges = adj
        .iter()
        .enumerate()
        .flat_map(|(i, l)| l.iter().filter(move |&&to| i < to).map(move |&to| (i, to)))
        .collect();
    (edges, contracted)
}

/// Settles vertices whose min cut is their degree, attaching them as leaves.
///
/// Degree-2 vertices are settled by 2-edge-connectivity. Every packing root is a hub that stays
/// unsettled, and any vertex that received `deg(v)` arborescences hangs off it with weight
/// `deg(v)`.
fn find_cuts_by_tree_packing(
    edges: &[Edge],
    degree: &[usize],
    config: &CutTreeConfig,
    dcs: &mut DisjointCutSet,
    gh_builder: &mut GomoryHuTreeBuilder,
) -> usize {
    let n = degree.len();
    let Some(temp_root) = first_max_degree(degree) else {
        return 0;
    };
    let mut solved: Vec<Option<(V, Weight)>> = vec![None; n];
    let trivial = |v: V| config.enable_degree2_contraction && degree[v] == 2;
    for v in (0..n).filter(|&v| v != temp_root && trivial(v)) {
        solved[v] = Some((temp_root, 2));
    }

    if config.enable_greedy_tree_packing {
        let packing_base =
            GreedyTreePacking::new(edges, n, config.greedy_tree_packing_dfs_edge_max);
        let mut idx: Vec<V> = (0..n).collect();
        idx.shuffle(&mut StdRng::seed_from_u64(config.seed));
        idx.sort_by_key(|&v| Reverse(degree[v]));
        let mut hub = vec![false; n];
        for &root in idx.iter().take(config.try_greedy_tree_packing.min(n)) {
            if solved[root].is_some() || trivial(root) {
                continue;
            }
            hub[root] = true;
            let mut packing = packing_base.clone();
            packing.arborescence_packing(root);
            for to in 0..n {
                if to == root || to == temp_root || hub[to] || solved[to].is_some() {
                    continue;
                }
                if packing.inedge_count(to) == degree[to] {
                    solved[to] = Some((root, degree[to]));
                }
            }
        }
    }

    let mut pruned = 0;
    for (v, s) in solved.into_iter().enumerate() {
        let Some((parent, weight)) = s else {
            continue;
        };
        dcs.create_new_group(v);
        if !trivial(v) {
            gh_builder.add_edge(v, parent, weight, &[v], dcs);
        }
        pruned += 1;
    }
    log::debug!("tree packing settled {pruned} of {n} vertices");
    pruned
}

/// Sends flow from every vertex of the max degree vertex's group to it, without contracting.
fn find_cuts_by_goal_oriented_search(sep: &mut Separator, n: usize, aster_ub: usize) {
    let dz = sep.bi_dinitz();
    let Some(root) = (0..n).reduce(|best, v| {
        if dz.degree(best) < dz.degree(v) {
            v
        } else {
            best
        }
    }) else {
        return;
    };
    sep.goal_oriented_bfs_init(root, aster_ub);
    for v in 0..n {
        if v != root && sep.disjoint_cut_set().is_same_group(v, root) {
            sep.mincut(v, root, false);
        }
    }
}

/// Separates pairs among the `tries + 1` highest degree vertices that are still grouped.
fn separate_high_degreepairs(sep: &mut Separator, n: usize, tries: usize) {
    let dcs = sep.disjoint_cut_set();
    let mut vtxs: Vec<V> = (0..n)
        .filter(|&v| dcs.group_size(dcs.group_id(v)) >= 2)
        .collect();
    let tries = tries.min(vtxs.len().saturating_sub(1));
    let dz = sep.bi_dinitz();
    vtxs.sort_by_key(|&v| Reverse(dz.degree(v)));

    let mut cut_count = 0;
    for i in 1..=tries {
        for j in 0..i {
            let (s, t) = (vtxs[i], vtxs[j]);
            if !sep.disjoint_cut_set().is_same_group(s, t) {
                continue;
            }
            sep.mincut(s, t, true);
            cut_count += 1;
        }
    }
    if cut_count > 0 {
        log::debug!(
            "high degree pairs: {cut_count} cuts, {} contractions so far",
            sep.contraction_count()
        );
    }
}

fn separate_adjacent_pairs(sep: &mut Separator, n: usize) {
    for s in 0..n {
        // Contraction rewires arcs in place, so the degree of `s` is stable.
        for i in 0..sep.bi_dinitz().degree(s) {
            let t = sep.bi_dinitz().to(s, i);
            if sep.disjoint_cut_set().is_same_group(s, t) {
                sep.mincut(s, t, true);
            }
        }
    }
}

/// Separates every vertex from the grouped vertices within BFS distance `d` of it.
fn separate_near_pairs(sep: &mut Separator, n: usize, d: usize) {
    let mut used = vec![usize::MAX; sep.bi_dinitz().n()];
    let mut q = VecDeque::new();
    for s in 0..n {
        let dcs = sep.disjoint_cut_set();
        if dcs.group_size(dcs.group_id(s)) <= 1 {
            continue;
        }
        q.clear();
        q.push_back(s);
        used[s] = s;
        for _ in 0..d {
            for _ in 0..q.len() {
                let Some(v) = q.pop_front() else { break };
                for i in 0..sep.bi_dinitz().degree(v) {
                    let t = sep.bi_dinitz().to(v, i);
                    if used[t] == s {
                        continue;
                    }
                    used[t] = s;
                    q.push_back(t);
                    if sep.disjoint_cut_set().is_same_group(s, t) {
                        sep.mincut(s, t, true);
                        // Contraction adds vertices.
                        let m = sep.bi_dinitz().n();
                        if used.len() < m {
                            used.resize(m, usize::MAX);
                        }
                    }
                }
            }
        }
    }
}

fn separate_all(sep: &mut Separator, n: usize) {
    for group in 0..n {
        while let Some((s, t)) = sep.disjoint_cut_set().get_two_elements(group) {
            sep.mincut(s, t, true);
        }
    }
}

impl CutTreeWith2ECC {
    /// Builds the tree of the graph `edges` on vertices `0..num_vertices`.
    ///
    /// The graph must be simple and connected, and 2-edge-connected unless degree-2 contraction is
    /// disabled.
    pub fn new(edges: Vec<Edge>, num_vertices: usize, config: &CutTreeConfig) -> Self {
        assert!(
            config.separate_near_pairs_d >= 1,
            "separate_near_pairs_d must be at least 1"
        );
        let n = num_vertices;
        let timed_phases = n >= config.log_time_threshold;
        let mut stats = CutTreeStats::default();
        let mut gh_builder = GomoryHuTreeBuilder::new(n);
        let mut degree = vec![0; n];
        for &(u, v) in &edges {
            degree[u] += 1;
            degree[v] += 1;
        }

        let edges = if config.enable_degree2_contraction {
            let (edges, contracted) = timed("contract_degree2_vertices", timed_phases, || {
                contract_degree2_vertices(edges, &degree, &mut gh_builder)
            });
            stats.degree2_contracted = contracted;
            edges
        } else {
            edges
        };

        let mut dcs = DisjointCutSet::new(n);
        stats.pruned_by_tree_packing = timed("find_cuts_by_tree_packing", timed_phases, || {
            find_cuts_by_tree_packing(&edges, &degree, config, &mut dcs, &mut gh_builder)
        });

        let dz = BiDinitz::new(&edges, n);
        drop(edges);
        let mut sep = Separator::new(dz, dcs, gh_builder, config.contraction_lower_bound);

        if config.enable_goal_oriented_search {
            timed("find_cuts_by_goal_oriented_search", timed_phases, || {
                find_cuts_by_goal_oriented_search(&mut sep, n, config.goal_oriented_dfs_aster_ub)
            });
        }
        if config.try_large_degree_pairs > 0 {
            timed("separate_high_degreepairs", timed_phases, || {
                separate_high_degreepairs(&mut sep, n, config.try_large_degree_pairs)
            });
        }
        if config.enable_adjacent_cut {
            if config.separate_near_pairs_d == 1 {
                timed("separate_adjacent_pairs", timed_phases, || {
                    separate_adjacent_pairs(&mut sep, n)
                });
            } else {
                timed("separate_near_pairs", timed_phases, || {
                    separate_near_pairs(&mut sep, n, config.separate_near_pairs_d)
                });
            }
        }
        timed("separate_all", timed_phases, || separate_all(&mut sep, n));

        sep.output_debug_information();
        stats.max_flow_times = sep.max_flow_times();
        stats.contractions = sep.contraction_count();
        let mut gh_builder = sep.into_tree_builder();
        gh_builder.build();
        log::debug!("cut tree on {n} vertices: {stats:?}");
        Self {
            num_vertices: n,
            gh_builder,
            stats,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Minimum cut between `u` and `v`. Panics if `u == v` or either is out of range.
    pub fn query(&self, u: V, v: V) -> Weight {
        self.gh_builder.query(u, v)
    }

    pub fn parent_weight(&self) -> &[Option<(V, Weight)>] {
        self.gh_builder.parent_weight()
    }

    pub fn stats(&self) -> &CutTreeStats {
        &self.stats
    }

    pub fn tree_builder(&self) -> &GomoryHuTreeBuilder {
        &self.gh_builder
    }
}

impl CutTreeBuilder for CutTreeWith2ECC {
    fn new(edges: Vec<Edge>, num_vertices: usize, config: &CutTreeConfig) -> Self {
        CutTreeWith2ECC::new(edges, num_vertices, config)
    }

    fn query(&self, u: V, v: V) -> Weight {
        CutTreeWith2ECC::query(self, u, v)
    }

    fn parent_weight(&self) -> &[Option<(V, Weight)>] {
        CutTreeWith2ECC::parent_weight(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dinitz::Dinitz, max_flow::MaxFlow};

    fn cycle(n: usize) -> Vec<Edge> {
        (0..n).map(|v| (v.min((v + 1) % n), v.max((v + 1) % n))).collect()
    }

    fn check(edges: &[Edge], n: usize, config: &CutTreeConfig) -> CutTreeStats {
        let ct = CutTreeWith2ECC::new(edges.to_vec(), n, config);
        let mut d = Dinitz::new(edges, n);
        for u in 0..n {
            for v in u + 1..n {
                assert_eq!(ct.query(u, v), d.max_flow(u, v), "({u}, {v}) {config:?}");
            }
        }
        ct.stats().clone()
    }

    /// Two 5-cliques joined by two disjoint paths of length 3.
    fn cliques_and_paths() -> (Vec<Edge>, usize) {
        let mut e = vec![];
        for base in [0, 5] {
            for u in base..base + 5 {
                for v in u + 1..base + 5 {
                    e.push((u, v));
                }
            }
        }
        e.extend([(0, 10), (10, 11), (5, 11), (1, 12), (12, 13), (6, 13)]);
        (e, 14)
    }

    #[test]
    fn cycle_is_all_degree2() {
        let stats = check(&cycle(8), 8, &CutTreeConfig::default());
        assert_eq!(stats.degree2_contracted, 7);
        assert_eq!(stats.max_flow_times, 0);
    }

    #[test]
    fn every_phase_alone() {
        let (e, n) = cliques_and_paths();
        let base = CutTreeConfig::plain();
        let configs = [
            CutTreeConfig::default(),
            base.clone(),
            CutTreeConfig {
                enable_degree2_contraction: true,
                ..base.clone()
            },
            CutTreeConfig {
                enable_greedy_tree_packing: true,
                try_greedy_tree_packing: 3,
                ..base.clone()
            },
            CutTreeConfig {
                enable_goal_oriented_search: true,
                ..base.clone()
            },
            CutTreeConfig {
                try_large_degree_pairs: 5,
                ..base.clone()
            },
            CutTreeConfig {
                enable_adjacent_cut: true,
                ..base.clone()
            },
            CutTreeConfig {
                enable_adjacent_cut: true,
                separate_near_pairs_d: 3,
                ..base.clone()
            },
            CutTreeConfig {
                contraction_lower_bound: usize::MAX,
                ..CutTreeConfig::default()
            },
        ];
        for config in &configs {
            check(&e, n, config);
        }
    }

    #[test]
    fn tree_packing_prunes() {
        // Two packing rounds from any root reach every other cycle vertex twice. Only the root and
        // the first max degree vertex stay unsettled.
        let n = 9;
        let stats = check(
            &cycle(n),
            n,
            &CutTreeConfig {
                enable_degree2_contraction: false,
                ..CutTreeConfig::default()
            },
        );
        assert!(stats.pruned_by_tree_packing >= n - 2, "{stats:?}");
        let (e, n) = cliques_and_paths();
        check(
            &e,
            n,
            &CutTreeConfig {
                enable_degree2_contraction: false,
                try_greedy_tree_packing: 4,
                ..CutTreeConfig::default()
            },
        );
    }

    #[test]
    fn contraction_of_degree2_keeps_multi_edges() {
        // A 4-cycle with a chord: suppressing 1 and 3 leaves a triple edge 0-2.
        let e = vec![(0, 1), (1, 2), (2, 3), (0, 3), (0, 2)];
        let mut gh = GomoryHuTreeBuilder::new(4);
        let degree = [3, 2, 3, 2];
        let (rest, contracted) = contract_degree2_vertices(e.clone(), &degree, &mut gh);
        assert_eq!(contracted, 2);
        assert_eq!(rest, vec![(0, 2), (0, 2), (0, 2)]);
        check(&e, 4, &CutTreeConfig::default());
    }

    #[test]
    fn tiny() {
        let ct = CutTreeWith2ECC::new(vec![], 1, &CutTreeConfig::default());
        assert_eq!(ct.parent_weight(), &[None]);
        let ct = CutTreeWith2ECC::new(vec![], 0, &CutTreeConfig::default());
        assert_eq!(ct.num_vertices(), 0);
        let ct = CutTreeWith2ECC::new(vec![(0, 1)], 2, &CutTreeConfig::default());
        assert_eq!(ct.query(0, 1), 1);
    }

    #[test]
    #[should_panic]
    fn near_pairs_radius_zero() {
        CutTreeWith2ECC::new(
            vec![(0, 1)],
            2,
            &CutTreeConfig {
                separate_near_pairs_d: 0,
                ..CutTreeConfig::default()
            },
        );
    }
}
