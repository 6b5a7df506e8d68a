use cut_tree::{CutTree, CutTreeConfig, GomoryHuTree};

fn query(t: &CutTree, u: usize, v: usize) {
    println!("Minimum cut between {} and {}: {}", u, v, t.query(u, v));
}

fn main() {
    // Two 5-cliques {0..5} and {5..10}, joined by the edges 4-5 and 0-9, plus a tail 9-10-11.
    let mut edges = vec![];
    for base in [0, 5] {
        for u in base..base + 5 {
            for v in u + 1..base + 5 {
                edges.push((u, v));
            }
        }
    }
    edges.extend([(4, 5), (0, 9), (9, 10), (10, 11)]);
    let t = CutTree::build(&edges, 13, &CutTreeConfig::default());
    println!("Built the cut tree of a barbell with a tail and an isolated vertex 12");
    query(&t, 1, 2);
    query(&t, 1, 7);
    query(&t, 0, 9);
    query(&t, 3, 11);
    query(&t, 11, 12);
    println!("Tree edges:");
    for (u, v, w) in t.tree_edges() {
        println!("{} {} {}", u, v, w);
    }
}
