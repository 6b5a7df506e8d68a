use std::fmt::Debug;

use common::{
    barabasi_albert, barbell, complete, cycle, erdos_renyi, grid, guard, init_logger, path,
};
use cut_tree::{
    dinitz::Dinitz, graph::Edge, max_flow::MaxFlow, CutTree, CutTreeConfig, GomoryHuTree,
    GusfieldBiDinitz, GusfieldDinitz,
};
use rand::{rngs::StdRng, SeedableRng};

mod common;

struct CTTests<T>(std::marker::PhantomData<T>)
where
    T: GomoryHuTree + Debug;

impl<T> CTTests<T>
where
    T: GomoryHuTree + Debug,
{
    /// Compares every pair against plain Dinic on the original graph.
    fn check_all_pairs(edges: &[Edge], n: usize, config: &CutTreeConfig) -> T {
        let t = guard(T::build(edges, n, config));
        let mut d = Dinitz::new(edges, n);
        for u in 0..n {
            for v in u + 1..n {
                let expected = d.max_flow(u, v);
                assert_eq!(t.query(u, v), expected, "({u}, {v}) with {config:?}");
                assert_eq!(t.query(v, u), expected);
            }
        }
        let tree = t.tree_edges();
        assert_eq!(tree.len(), n.saturating_sub(1));
        scopeguard::ScopeGuard::into_inner(t)
    }

    fn test_shapes(config: &CutTreeConfig) {
        let t = Self::check_all_pairs(&path(7), 7, config);
        assert_eq!(t.query(0, 6), 1);
        let t = Self::check_all_pairs(&cycle(9), 9, config);
        assert_eq!(t.query(2, 7), 2);
        let t = Self::check_all_pairs(&complete(7), 7, config);
        assert_eq!(t.query(0, 6), 6);
        let t = Self::check_all_pairs(&barbell(6, 2), 12, config);
        assert_eq!(t.query(1, 10), 2);
        assert_eq!(t.query(1, 4), 5);
        Self::check_all_pairs(&grid(4, 5), 20, config);
    }

    fn test_tiny(config: &CutTreeConfig) {
        let t = T::build(&[], 0, config);
        assert_eq!(t.num_vertices(), 0);
        assert!(t.tree_edges().is_empty());
        let t = T::build(&[], 1, config);
        assert!(t.tree_edges().is_empty());
        assert!(t.try_query(0, 0).is_err());
        let t = T::build(&[(0, 1)], 2, config);
        assert_eq!(t.query(0, 1), 1);
        let tree = t.tree_edges();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].2, 1);
        let t = T::build(&[], 2, config);
        assert_eq!(t.query(1, 0), 0);
    }

    fn test_random(seed: u64, config: &CutTreeConfig) {
        let mut rng = StdRng::seed_from_u64(seed);
        for (n, p) in [(30, 0.08), (40, 0.15), (25, 0.5)] {
            let e = erdos_renyi(n, p, &mut rng);
            log::debug!("erdos renyi n = {n} m = {}", e.len());
            Self::check_all_pairs(&e, n, config);
        }
        for (n, m) in [(40, 1), (40, 2), (50, 3)] {
            let e = barabasi_albert(n, m, &mut rng);
            Self::check_all_pairs(&e, n, config);
        }
    }

    fn test_all(config: &CutTreeConfig) {
        Self::test_tiny(config);
        Self::test_shapes(config);
        Self::test_random(4815162342, config);
    }
}

fn configs() -> Vec<CutTreeConfig> {
    let plain = CutTreeConfig::plain();
    vec![
        CutTreeConfig::default(),
        plain.clone(),
        CutTreeConfig {
            try_greedy_tree_packing: 5,
            greedy_tree_packing_dfs_edge_max: 2,
            ..CutTreeConfig::default()
        },
        CutTreeConfig {
            separate_near_pairs_d: 3,
            try_large_degree_pairs: 30,
            ..CutTreeConfig::default()
        },
        CutTreeConfig {
            enable_goal_oriented_search: true,
            goal_oriented_dfs_aster_ub: 4,
            ..plain.clone()
        },
        CutTreeConfig {
            contraction_lower_bound: 1,
            ..CutTreeConfig::default()
        },
        CutTreeConfig {
            contraction_lower_bound: usize::MAX,
            seed: 7,
            ..CutTreeConfig::default()
        },
    ]
}

#[test]
fn test_cut_tree() {
    init_logger();
    for config in configs() {
        CTTests::<CutTree>::test_all(&config);
    }
}

#[test]
fn test_gusfield_dinitz() {
    init_logger();
    CTTests::<GusfieldDinitz>::test_all(&CutTreeConfig::default());
}

#[test]
fn test_gusfield_bi_dinitz() {
    init_logger();
    CTTests::<GusfieldBiDinitz>::test_all(&CutTreeConfig::default());
}

#[test]
fn test_goal_oriented_budgets() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(2718281828);
    let graphs: Vec<_> = (0..50).map(|_| erdos_renyi(20, 0.3, &mut rng)).collect();
    for ub in 3..=5 {
        let config = CutTreeConfig {
            goal_oriented_dfs_aster_ub: ub,
            ..CutTreeConfig::default()
        };
        for e in &graphs {
            CTTests::<CutTree>::check_all_pairs(e, 20, &config);
        }
    }
}

#[test]
fn test_larger_random() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(9232345);
    let e = barabasi_albert(300, 3, &mut rng);
    let t = guard(CutTree::build(&e, 300, &CutTreeConfig::default()));
    let g = GusfieldBiDinitz::build(&e, 300, &CutTreeConfig::default());
    for u in 0..300 {
        for v in (u + 1..300).step_by(7) {
            assert_eq!(t.query(u, v), g.query(u, v), "({u}, {v})");
        }
    }
}

#[test]
fn test_deterministic() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(100000007);
    let e = erdos_renyi(60, 0.1, &mut rng);
    let config = CutTreeConfig::default();
    let mut out = [vec![], vec![]];
    for buf in &mut out {
        CutTree::build(&e, 60, &config).write_tree(buf).unwrap();
    }
    assert!(!out[0].is_empty());
    assert_eq!(out[0], out[1]);
}

#[test]
fn test_path_and_barbell() {
    init_logger();
    let t = CutTree::build(&path(5), 5, &CutTreeConfig::default());
    let mut tree = t.tree_edges();
    tree.sort();
    assert_eq!(tree, vec![(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 4, 1)]);
    assert_eq!(t.query(1, 3), 1);

    let k = 5;
    let t = CutTree::build(&barbell(k, 1), 2 * k, &CutTreeConfig::default());
    for a in 0..2 * k {
        for b in a + 1..2 * k {
            let expected = if (a < k) == (b < k) { k - 1 } else { 1 };
            assert_eq!(t.query(a, b), expected, "({a}, {b})");
        }
    }
}

#[test]
fn test_tree_triangle_property() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(3);
    let n = 35;
    let e = erdos_renyi(n, 0.2, &mut rng);
    let t = CutTree::build(&e, n, &CutTreeConfig::default());
    for a in 0..n {
        for b in 0..n {
            for c in 0..n {
                if a == b || b == c || a == c {
                    continue;
                }
                let ab = t.query(a, b);
                assert!(ab >= t.query(a, c).min(t.query(c, b)), "({a}, {b}, {c})");
            }
        }
    }
}

#[test]
#[should_panic]
fn test_query_same_vertex() {
    let t = CutTree::build(&cycle(4), 4, &CutTreeConfig::default());
    t.query(2, 2);
}

#[test]
#[should_panic]
fn test_query_out_of_range() {
    let t = CutTree::build(&cycle(4), 4, &CutTreeConfig::default());
    t.query(0, 4);
}
