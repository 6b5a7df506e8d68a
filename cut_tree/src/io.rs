//! Text formats.
//!
//! Edge lists have one `u v` pair per line. Trees have one `u v w` triple per line. Blank lines
//! and lines starting with `#` are skipped by both readers.

use std::io::{BufRead, Write};

use crate::{
    error::{Error, Result},
    graph::{Edge, Weight, V},
};

fn parse_line<const N: usize>(line: &str, line_no: usize) -> Result<Option<[usize; N]>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let parse_err = |message: String| Error::Parse {
        line: line_no,
        message,
    };
    let mut out = [0; N];
    let mut tokens = line.split_whitespace();
    for slot in &mut out {
        let tok = tokens
            .next()
            .ok_or_else(|| parse_err(format!("expected {N} numbers, got {line:?}")))?;
        *slot = tok
            .parse()
            .map_err(|e| parse_err(format!("bad number {tok:?}: {e}")))?;
    }
    if let Some(extra) = tokens.next() {
        return Err(parse_err(format!("unexpected {extra:?} after {N} numbers")));
    }
    Ok(Some(out))
}

fn read_lines<const N: usize>(reader: impl BufRead) -> Result<Vec<[usize; N]>> {
    let mut out = vec![];
    for (i, line) in reader.lines().enumerate() {
        if let Some(values) = parse_line::<N>(&line?, i + 1)? {
            out.push(values);
        }
    }
    Ok(out)
}

pub fn read_edge_list(reader: impl BufRead) -> Result<Vec<Edge>> {
    Ok(read_lines::<2>(reader)?
        .into_iter()
        .map(|[u, v]| (u, v))
        .collect())
}

pub fn read_tree(reader: impl BufRead) -> Result<Vec<(V, V, Weight)>> {
    Ok(read_lines::<3>(reader)?
        .into_iter()
        .map(|[u, v, w]| (u, v, w))
        .collect())
}

pub fn write_tree(mut writer: impl Write, edges: &[(V, V, Weight)]) -> Result<()> {
    for &(u, v, w) in edges {
        writeln!(writer, "{u} {v} {w}")?;
    }
    writer.flush()?;
    Ok(())
}
