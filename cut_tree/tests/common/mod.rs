use std::{
    collections::BTreeSet,
    sync::{LazyLock, Mutex},
};

use cut_tree::graph::Edge;
use flexi_logger::{Logger, LoggerHandle};
use rand::{rngs::StdRng, seq::SliceRandom, Rng};
use scopeguard::{OnUnwind, ScopeGuard};

#[allow(dead_code)]
pub static LOGGER: LazyLock<Mutex<LoggerHandle>> = LazyLock::new(|| {
    Mutex::new(
        Logger::try_with_env_or_str("info")
            .unwrap()
            .write_mode(flexi_logger::WriteMode::SupportCapture)
            .log_to_stdout()
            .set_palette("196;208;3;7;8".to_owned())
            .format(|w, now, record| {
                let style = flexi_logger::style(record.level());
                write!(
                    w,
                    "{} {pref}[{}] {}{suf}",
                    now.format("%H:%M:%S"),
                    &record.level().as_str()[0..1],
                    record.args(),
                    pref = style.prefix(),
                    suf = style.suffix(),
                )
            })
            .start()
            .unwrap(),
    )
});

#[allow(dead_code)]
pub fn init_logger() {
    let _ = &*LOGGER;
}

#[allow(dead_code)]
pub fn guard<T: std::fmt::Debug>(t: T) -> ScopeGuard<T, impl FnOnce(T), OnUnwind> {
    scopeguard::guard_on_unwind(t, |t| log::error!("Crash with {t:?}"))
}

#[allow(dead_code)]
pub fn path(n: usize) -> Vec<Edge> {
    (1..n).map(|v| (v - 1, v)).collect()
}

#[allow(dead_code)]
pub fn cycle(n: usize) -> Vec<Edge> {
    let mut e = path(n);
    if n >= 3 {
        e.push((0, n - 1));
    }
    e
}

#[allow(dead_code)]
pub fn complete(n: usize) -> Vec<Edge> {
    (0..n)
        .flat_map(|u| (u + 1..n).map(move |v| (u, v)))
        .collect()
}

#[allow(dead_code)]
pub fn grid(rows: usize, cols: usize) -> Vec<Edge> {
    let id = |r: usize, c: usize| r * cols + c;
    let mut e = vec![];
    for r in 0..rows {
        for c in 0..cols {
            if r + 1 < rows {
                e.push((id(r, c), id(r + 1, c)));
            }
            if c + 1 < cols {
                e.push((id(r, c), id(r, c + 1)));
            }
        }
    }
    e
}

/// Two `k`-cliques on `0..k` and `k..2k`, joined by `links` disjoint edges.
#[allow(dead_code)]
pub fn barbell(k: usize, links: usize) -> Vec<Edge> {
    assert!(links <= k);
    let mut e = complete(k);
    e.extend(complete(k).into_iter().map(|(u, v)| (u + k, v + k)));
    e.extend((0..links).map(|i| (i, k + i)));
    e
}

#[allow(dead_code)]
pub fn erdos_renyi(n: usize, p: f64, rng: &mut StdRng) -> Vec<Edge> {
    let mut e = vec![];
    for u in 0..n {
        for v in u + 1..n {
            if rng.gen_bool(p) {
                e.push((u, v));
            }
        }
    }
    e
}

/// Preferential attachment: every new vertex links to `m` distinct earlier vertices, chosen
/// proportionally to their degree.
#[allow(dead_code)]
pub fn barabasi_albert(n: usize, m: usize, rng: &mut StdRng) -> Vec<Edge> {
    let mut e = complete((m + 1).min(n));
    let mut endpoints: Vec<usize> = e.iter().flat_map(|&(u, v)| [u, v]).collect();
    for v in m + 1..n {
        let mut targets = BTreeSet::new();
        while targets.len() < m {
            if let Some(&u) = endpoints.choose(rng) {
                targets.insert(u);
            }
        }
        for u in targets {
            e.push((u, v));
            endpoints.extend([u, v]);
        }
    }
    e
}
