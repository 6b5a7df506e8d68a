use thiserror::Error;

use crate::graph::V;

/// Errors at the input/output boundary of the crate.
///
/// Broken internal invariants are not reported here, they panic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("vertex {vertex} out of range for a graph with {num_vertices} vertices")]
    InvalidVertex { vertex: V, num_vertices: usize },

    #[error("a cut query needs two distinct vertices, got {0} twice")]
    SameVertex(V),

    #[error("edges do not form a tree: {0}")]
    NotATree(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Checks that `u` and `v` are distinct vertices of a graph with `n` vertices.
pub(crate) fn check_query(u: V, v: V, n: usize) -> Result<()> {
    for vertex in [u, v] {
        if vertex >= n {
            return Err(Error::InvalidVertex {
                vertex,
                num_vertices: n,
            });
        }
    }
    if u == v {
        return Err(Error::SameVertex(u));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_checks() {
        assert!(check_query(0, 1, 2).is_ok());
        assert!(matches!(check_query(1, 1, 2), Err(Error::SameVertex(1))));
        assert!(matches!(
            check_query(0, 5, 2),
            Err(Error::InvalidVertex {
                vertex: 5,
                num_vertices: 2
            })
        ));
        let msg = check_query(3, 0, 2).unwrap_err().to_string();
        assert_eq!(msg, "vertex 3 out of range for a graph with 2 vertices");
    }
}
