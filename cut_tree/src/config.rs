/// Tuning knobs of [`CutTreeWith2ECC`](crate::cut_tree_with_2ecc::CutTreeWith2ECC).
///
/// Every phase before the final separation is a heuristic: turning any of them off changes the
/// running time, never the answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutTreeConfig {
    /// Suppress degree-2 vertices before anything else. Requires 2-edge-connected input.
    pub enable_degree2_contraction: bool,
    pub enable_greedy_tree_packing: bool,
    /// Number of highest degree vertices used as tree packing roots.
    pub try_greedy_tree_packing: usize,
    /// Arcs tried per visited vertex in one packing round.
    pub greedy_tree_packing_dfs_edge_max: usize,
    pub enable_goal_oriented_search: bool,
    /// Detour budget of the goal oriented preflow. Larger budgets find longer paths.
    pub goal_oriented_dfs_aster_ub: usize,
    /// Number of highest degree vertices whose pairs are separated early. 0 disables the phase.
    pub try_large_degree_pairs: usize,
    pub enable_adjacent_cut: bool,
    /// BFS radius of the near pairs phase. 1 means adjacent pairs only.
    pub separate_near_pairs_d: usize,
    /// Both sides of a cut need at least this many vertices for the graph to be contracted.
    pub contraction_lower_bound: usize,
    /// Seeds the tie-break order among tree packing roots of equal degree.
    pub seed: u64,
    /// Blocks with at least this many vertices log the wall time of every phase.
    pub log_time_threshold: usize,
}

impl Default for CutTreeConfig {
    fn default() -> Self {
        Self {
            enable_degree2_contraction: true,
            enable_greedy_tree_packing: true,
            try_greedy_tree_packing: 1,
            greedy_tree_packing_dfs_edge_max: usize::MAX,
            enable_goal_oriented_search: true,
            goal_oriented_dfs_aster_ub: 2,
            try_large_degree_pairs: 10,
            enable_adjacent_cut: true,
            separate_near_pairs_d: 1,
            contraction_lower_bound: 2,
            seed: 2012,
            log_time_threshold: 10000,
        }
    }
}

impl CutTreeConfig {
    /// Only the final separation phase: plain Gomory-Hu with the bidirectional flow and
    /// contraction. Works on any connected graph.
    pub fn plain() -> Self {
        Self {
            enable_degree2_contraction: false,
            enable_greedy_tree_packing: false,
            enable_goal_oriented_search: false,
            try_large_degree_pairs: 0,
            enable_adjacent_cut: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CutTreeConfig::default();
        assert_eq!(c.try_greedy_tree_packing, 1);
        assert_eq!(c.try_large_degree_pairs, 10);
        assert_eq!(c.separate_near_pairs_d, 1);
        assert_eq!(c.contraction_lower_bound, 2);
        assert_eq!(c.goal_oriented_dfs_aster_ub, 2);
        assert!(c.enable_degree2_contraction && c.enable_adjacent_cut);
    }

    #[test]
    fn plain_config() {
        let c = CutTreeConfig::plain();
        assert!(!c.enable_degree2_contraction);
        assert!(!c.enable_greedy_tree_packing);
        assert!(!c.enable_goal_oriented_search);
        assert_eq!(c.try_large_degree_pairs, 0);
        assert_eq!(c.contraction_lower_bound, 2);
    }
}
