//! Partition of the vertices into groups that are still waiting to be separated.
//!
//! Every group is an intrusive doubly linked list over a fixed node arena, so moving a vertex
//! between groups is O(1). Vertex ids added to the flow graph after construction are never
//! members of any group.

use std::fmt::Formatter;

use derivative::Derivative;

use crate::graph::V;

pub type GroupId = usize;

const EMPTY: usize = usize::MAX;

fn idx_fmt(u: &usize, f: &mut Formatter) -> std::fmt::Result {
    if *u == EMPTY {
        write!(f, "∅")
    } else {
        write!(f, "{u}")
    }
}

#[derive(Derivative, Clone, Copy)]
#[derivative(Debug)]
struct Node {
    #[derivative(Debug(format_with = "idx_fmt"))]
    prev: usize,
    #[derivative(Debug(format_with = "idx_fmt"))]
    next: usize,
    group: GroupId,
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct DisjointCutSet {
    nodes: Vec<Node>,
    /// First member of each group.
    #[derivative(Debug = "ignore")]
    head: Vec<usize>,
    group_size: Vec<usize>,
    num_groups: usize,
}

impl DisjointCutSet {
    /// All `n` vertices start in group 0.
    pub fn new(n: usize) -> Self {
        let nodes = (0..n)
            .map(|i| Node {
                prev: if i == 0 { EMPTY } else { i - 1 },
                next: if i + 1 == n { EMPTY } else { i + 1 },
                group: 0,
            })
            .collect();
        let mut head = vec![EMPTY; n.max(1)];
        let mut group_size = vec![0; n.max(1)];
        if n > 0 {
            head[0] = 0;
        }
        group_size[0] = n;
        Self {
            nodes,
            head,
            group_size,
            num_groups: 1,
        }
    }

    pub fn node_num(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Both ids exist and are in the same group.
    pub fn is_same_group(&self, a: V, b: V) -> bool {
        a < self.nodes.len()
            && b < self.nodes.len()
            && self.nodes[a].group == self.nodes[b].group
    }

    pub fn group_id(&self, v: V) -> GroupId {
        self.nodes[v].group
    }

    pub fn group_size(&self, group: GroupId) -> usize {
        self.group_size[group]
    }

    /// Moves `v` into a brand new group of its own and returns its id.
    pub fn create_new_group(&mut self, v: V) -> GroupId {
        let group = self.num_groups;
        self.num_groups += 1;
        if group == self.head.len() {
            self.head.push(EMPTY);
            self.group_size.push(0);
        }
        self.erase(v);
        self.add(v, group);
        group
    }

    /// Moves `v` into the group that `dst` belongs to.
    pub fn move_other_group(&mut self, v: V, dst: V) {
        let group = self.nodes[dst].group;
        self.erase(v);
        self.add(v, group);
    }

    /// Some other member of `v`'s group, if there is one.
    pub fn other_id_in_same_group(&self, v: V) -> Option<V> {
        let head = self.head[self.nodes[v].group];
        if head != v {
            Some(head)
        } else {
            Some(self.nodes[v].next).filter(|&u| u != EMPTY)
        }
    }

    /// Two members of `group`, if it has at least two.
    pub fn get_two_elements(&self, group: GroupId) -> Option<(V, V)> {
        let first = self.head[group];
        if first == EMPTY || self.nodes[first].next == EMPTY {
            return None;
        }
        Some((first, self.nodes[first].next))
    }

    pub fn has_two_elements(&self, group: GroupId) -> bool {
        self.get_two_elements(group).is_some()
    }

    /// Iterates over the members of `group`, most recently added first.
    pub fn group_members(&self, group: GroupId) -> impl Iterator<Item = V> + '_ {
        let not_empty = |u: &usize| *u != EMPTY;
        std::iter::successors(Some(self.head[group]).filter(not_empty), move |&u| {
            Some(self.nodes[u].next).filter(not_empty)
        })
    }

    pub fn get_group(&self, group: GroupId) -> Vec<V> {
        self.group_members(group).collect()
    }

    fn erase(&mut self, v: V) {
        let Node { prev, next, group } = self.nodes[v];
        if prev == EMPTY {
            debug_assert_eq!(self.head[group], v);
            self.head[group] = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next != EMPTY {
            self.nodes[next].prev = prev;
        }
        self.group_size[group] -= 1;
        self.nodes[v].prev = EMPTY;
        self.nodes[v].next = EMPTY;
    }

    fn add(&mut self, v: V, group: GroupId) {
        let head = self.head[group];
        if head != EMPTY {
            self.nodes[head].prev = v;
        }
        self.nodes[v] = Node {
            prev: EMPTY,
            next: head,
            group,
        };
        self.head[group] = v;
        self.group_size[group] += 1;
    }
}
