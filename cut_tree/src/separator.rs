//! One Gomory-Hu step: separates two vertices of the same group by a minimum cut.
//!
//! After the flow, the side that the engine exhausted is collected by BFS. That side becomes a
//! new group, the cut goes into the tree builder, and when both sides are large enough the flow
//! graph is contracted along the cut so later flows on either side get smaller.

use std::collections::{BTreeMap, VecDeque};

use derivative::Derivative;

use crate::{
    bi_dinitz::{BfsFinish, BiDinitz},
    disjoint_cut_set::DisjointCutSet,
    gomory_hu_tree_builder::GomoryHuTreeBuilder,
    graph::{Weight, V},
    union_find::UnionFind,
};

/// Flows between two progress reports.
const PROGRESS_INTERVAL: usize = 10000;

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Separator {
    dz: BiDinitz,
    dcs: DisjointCutSet,
    gh_builder: GomoryHuTreeBuilder,
    contraction_lower_bound: usize,

    /// Also the mark value of the current flow in the `*_used` arrays.
    max_flow_times: usize,
    contraction_count: usize,
    #[derivative(Debug = "ignore")]
    grouping_used: Vec<usize>,
    #[derivative(Debug = "ignore")]
    contraction_used: Vec<usize>,

    #[derivative(Debug = "ignore")]
    mincut_group_counter: Vec<usize>,
    #[derivative(Debug = "ignore")]
    mincut_group_revision: Vec<usize>,
    /// Groups the last cut split without taking all of them.
    cross_other_mincut_count: usize,

    cut_size_all_time: BTreeMap<Weight, usize>,
    #[derivative(Debug = "ignore")]
    cut_size_for_period: BTreeMap<Weight, usize>,
    last_max_flow_cost: Weight,
    #[derivative(Debug = "ignore")]
    queue: VecDeque<V>,
}

impl Separator {
    pub fn new(
        dz: BiDinitz,
        dcs: DisjointCutSet,
        gh_builder: GomoryHuTreeBuilder,
        contraction_lower_bound: usize,
    ) -> Self {
        let n = dz.n();
        let groups = dcs.node_num();
        Self {
            dz,
            dcs,
            gh_builder,
            contraction_lower_bound,
            max_flow_times: 0,
            contraction_count: 0,
            grouping_used: vec![0; n],
            contraction_used: vec![0; n],
            mincut_group_counter: vec![0; groups],
            mincut_group_revision: vec![0; groups],
            cross_other_mincut_count: 0,
            cut_size_all_time: BTreeMap::new(),
            cut_size_for_period: BTreeMap::new(),
            last_max_flow_cost: 0,
            queue: VecDeque::new(),
        }
    }

    pub fn bi_dinitz(&self) -> &BiDinitz {
        &self.dz
    }

    pub fn disjoint_cut_set(&self) -> &DisjointCutSet {
        &self.dcs
    }

    pub fn contraction_count(&self) -> usize {
        self.contraction_count
    }

    pub fn max_flow_times(&self) -> usize {
        self.max_flow_times
    }

    pub fn into_tree_builder(self) -> GomoryHuTreeBuilder {
        self.gh_builder
    }

    pub fn goal_oriented_bfs_init(&mut self, root: V, aster_ub: usize) {
        self.dz.goal_oriented_bfs_init(root, aster_ub);
    }

    /// Separates `s` and `t`, which must be in the same group. Returns the cut value.
    pub fn mincut(&mut self, s: V, t: V, enable_contraction: bool) -> Weight {
        let (s, t) = if self.dz.degree(s) > self.dz.degree(t) {
            (t, s)
        } else {
            (s, t)
        };
        let one_side = self.max_flow(s, t);
        if enable_contraction {
            let other_side = self.dz.n() - one_side;
            if self.cross_other_mincut_count != 0 {
                log::warn!("({s},{t}) couldn't separate (crossed)");
            } else if one_side.min(other_side) >= self.contraction_lower_bound {
                self.contraction(s, t);
            }
        }
        self.last_max_flow_cost
    }

    fn print_progress_at_regular_intervals(&mut self, s: V, t: V, cost: Weight) {
        if self.max_flow_times % PROGRESS_INTERVAL != 0 {
            return;
        }
        log::info!(
            "max_flow_times = {}, ({s},{t}) cost = {cost}",
            self.max_flow_times
        );
        log::debug!(
            "cut sizes since last report: {:?}",
            self.cut_size_for_period
        );
        self.cut_size_for_period.clear();
    }

    fn check_crossed_mincut(&mut self, v: V) {
        if v >= self.dcs.node_num() {
            return;
        }
        let group = self.dcs.group_id(v);
        let size = self.dcs.group_size(group);
        if size == 1 {
            return;
        }
        debug_assert!(group < self.mincut_group_revision.len(), "group {group} out of range");
        let f = self.max_flow_times;
        if self.mincut_group_revision[group] != f {
            self.mincut_group_revision[group] = f;
            self.mincut_group_counter[group] = 0;
        }
        if self.mincut_group_counter[group] == 0 {
            self.cross_other_mincut_count += 1;
        }
        self.mincut_group_counter[group] += 1;
        if self.mincut_group_counter[group] == size {
            self.cross_other_mincut_count -= 1;
        }
    }

    /// Residual capacity in the direction the exhausted side was searched.
    fn side_cap(&self, source_side: bool, v: V, i: usize) -> i32 {
        if source_side {
            self.dz.cap(v, i)
        } else {
            self.dz.rev_cap(v, i)
        }
    }

    /// Runs the flow, moves the exhausted side into a new group and records the tree edge.
    /// Returns the number of vertices on that side.
    fn max_flow(&mut self, s: V, t: V) -> usize {
        let cost = self.dz.max_flow(s, t);
        self.last_max_flow_cost = cost;
        self.max_flow_times += 1;
        *self.cut_size_all_time.entry(cost).or_default() += 1;
        *self.cut_size_for_period.entry(cost).or_default() += 1;
        self.print_progress_at_regular_intervals(s, t, cost);

        self.cross_other_mincut_count = 0;
        let f = self.max_flow_times;
        let source_side = self.dz.finish() == BfsFinish::SourceSideExhausted;
        let (root, other) = if source_side { (s, t) } else { (t, s) };

        let mut vs = vec![root];
        let mut one_side = 0;
        self.grouping_used[root] = f;
        self.dcs.create_new_group(root);
        self.queue.clear();
        self.queue.push_back(root);
        while let Some(v) = self.queue.pop_front() {
            one_side += 1;
            for i in 0..self.dz.degree(v) {
                let to = self.dz.to(v, i);
                if self.side_cap(source_side, v, i) == 0 || self.grouping_used[to] == f {
                    continue;
                }
                self.grouping_used[to] = f;
                self.queue.push_back(to);
                vs.push(to);
                if self.dcs.is_same_group(other, to) {
                    self.dcs.move_other_group(to, root);
                } else {
                    self.check_crossed_mincut(to);
                }
            }
        }
        self.gh_builder.add_edge(root, other, cost, &vs, &self.dcs);
        one_side
    }

    /// Cuts every edge of the last min cut, attaching each side to a new vertex that stands for
    /// the other side.
    fn contraction(&mut self, s: V, t: V) {
        self.contraction_count += 1;
        let sside = self.dz.add_vertex();
        let tside = self.dz.add_vertex();
        self.grouping_used.extend([0, 0]);
        self.contraction_used.extend([0, 0]);
        self.gh_builder.contraction(s, t, sside, tside);

        let f = self.max_flow_times;
        let source_side = self.dz.finish() == BfsFinish::SourceSideExhausted;
        let (root, near, far) = if source_side {
            (s, sside, tside)
        } else {
            (t, tside, sside)
        };
        let mut num_reconnected = 0;
        self.contraction_used[root] = f;
        self.queue.clear();
        self.queue.push_back(root);
        while let Some(v) = self.queue.pop_front() {
            for i in 0..self.dz.degree(v) {
                let to = self.dz.to(v, i);
                if self.contraction_used[to] == f {
                    continue;
                }
                if self.side_cap(source_side, v, i) == 0 {
                    if self.grouping_used[to] != f {
                        self.dz.reconnect_edge(v, i, near, far);
                        num_reconnected += 1;
                    }
                } else {
                    self.contraction_used[to] = f;
                    self.queue.push_back(to);
                }
            }
        }
        assert_eq!(
            num_reconnected, self.last_max_flow_cost,
            "reconnected edges must be exactly the cut edges of ({s}, {t})"
        );
    }

    pub fn output_debug_information(&self) {
        log::debug!(
            "separator: {} max flows, {} contractions, cut sizes {:?}",
            self.max_flow_times,
            self.contraction_count,
            self.cut_size_all_time
        );
    }

    /// Checks that every group lists as many members as it counts, and that all of them are
    /// connected in the current flow graph.
    pub fn debug_verify(&self) {
        let mut uf = UnionFind::new(self.dz.n());
        for v in 0..self.dz.n() {
            for e in self.dz.edges(v) {
                uf.unite(v, e.to());
            }
        }
        for g in 0..self.dcs.num_groups() {
            let members = self.dcs.get_group(g);
            assert_eq!(members.len(), self.dcs.group_size(g), "group {g}");
            for w in members.windows(2) {
                assert!(uf.is_same(w[0], w[1]), "group {g} is split: {members:?}");
            }
        }
    }
}
