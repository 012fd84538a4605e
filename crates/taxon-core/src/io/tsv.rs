//! Tab-separated tables.
//!
//! Three shapes are read and written:
//!
//! | table      | columns                       | header                      |
//! |------------|-------------------------------|-----------------------------|
//! | edges      | `item  category  [relation]`  | `item\tcategory[\trelation]` |
//! | node list  | `category  [...]`             | `category`                  |
//! | depths     | `node  depth`                 | `node\tdepth`               |
//!
//! Node names are opaque: any non-empty string without a tab, `\r` or `\n`.
//! There is no comment syntax, so a row starting with `#` is data. Blank
//! lines are ignored. A header is only recognised on the first data line and
//! only when it matches exactly. Trailing `\r` is stripped so files produced
//! on Windows read the same.

use std::io::{BufRead, Write};

use crate::error::ErrorCode;
use crate::graph::edges::Edge;

/// Errors reading or writing a table.
#[derive(Debug, thiserror::Error)]
pub enum TsvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// 1-based line number of the offending row.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl TsvError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::InputUnreadable,
            Self::Malformed { .. } => ErrorCode::MalformedInput,
        }
    }
}

const EDGE_HEADERS: &[&[&str]] = &[&["item", "category"], &["item", "category", "relation"]];
const NODE_LIST_HEADERS: &[&[&str]] = &[&["category"]];
const DEPTH_HEADERS: &[&[&str]] = &[&["node", "depth"]];

/// Iterate `(line_number, fields)` over data lines, skipping a first line
/// that equals one of `headers`.
fn rows<R: BufRead>(
    reader: R,
    headers: &'static [&'static [&'static str]],
) -> impl Iterator<Item = Result<(usize, Vec<String>), TsvError>> {
    let mut first = true;
    reader
        .lines()
        .enumerate()
        .filter_map(move |(idx, line)| {
            let line = match line {
                Ok(line) => line,
                Err(err) => return Some(Err(TsvError::from(err))),
            };
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if line.trim().is_empty() {
                return None;
            }
            let fields: Vec<String> = line.split('\t').map(str::to_string).collect();
            let is_header = first && headers.iter().any(|header| fields == *header);
            first = false;
            if is_header {
                return None;
            }
            Some(Ok((idx + 1, fields)))
        })
}

fn field(fields: &[String], idx: usize, line: usize, what: &str) -> Result<String, TsvError> {
    match fields.get(idx) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(TsvError::Malformed {
            line,
            reason: format!("missing {what} column"),
        }),
    }
}

/// Read `(item, category)` rows. A third column, if present, is ignored.
///
/// # Errors
///
/// Returns [`TsvError::Malformed`] for rows with fewer than two non-empty
/// columns, or [`TsvError::Io`] if the reader fails.
pub fn read_edges<R: BufRead>(reader: R) -> Result<Vec<Edge>, TsvError> {
    let mut edges = Vec::new();
    for row in rows(reader, EDGE_HEADERS) {
        let (line, fields) = row?;
        let item = field(&fields, 0, line, "item")?;
        let category = field(&fields, 1, line, "category")?;
        edges.push(Edge { item, category });
    }
    Ok(edges)
}

/// Read the first column of every row.
///
/// # Errors
///
/// Returns [`TsvError::Malformed`] for rows whose first column is empty,
/// or [`TsvError::Io`] if the reader fails.
pub fn read_node_list<R: BufRead>(reader: R) -> Result<Vec<String>, TsvError> {
    let mut nodes = Vec::new();
    for row in rows(reader, NODE_LIST_HEADERS) {
        let (line, fields) = row?;
        nodes.push(field(&fields, 0, line, "category")?);
    }
    Ok(nodes)
}

/// Read `(node, depth)` rows.
///
/// # Errors
///
/// Returns [`TsvError::Malformed`] for missing columns or a depth that is
/// not a non-negative integer, or [`TsvError::Io`] if the reader fails.
pub fn read_depths<R: BufRead>(reader: R) -> Result<Vec<(String, u32)>, TsvError> {
    let mut depths = Vec::new();
    for row in rows(reader, DEPTH_HEADERS) {
        let (line, fields) = row?;
        let node = field(&fields, 0, line, "node")?;
        let raw = field(&fields, 1, line, "depth")?;
        let depth = raw.trim().parse::<u32>().map_err(|err| TsvError::Malformed {
            line,
            reason: format!("invalid depth '{raw}': {err}"),
        })?;
        depths.push((node, depth));
    }
    Ok(depths)
}

/// Reject names that would not read back as the same single field. `line`
/// is the 1-based output line the name was headed for.
fn check_name(name: &str, line: usize) -> Result<(), TsvError> {
    if name.is_empty() {
        return Err(TsvError::Malformed {
            line,
            reason: "empty node name".to_string(),
        });
    }
    if name.contains(['\t', '\n', '\r']) {
        return Err(TsvError::Malformed {
            line,
            reason: format!("node name {name:?} contains a tab or line break"),
        });
    }
    Ok(())
}

/// Write `(item, category)` rows with an `item\tcategory` header.
///
/// # Errors
///
/// Returns [`TsvError::Malformed`] for a name that is empty or contains a
/// tab or line break, or [`TsvError::Io`] if the writer fails.
pub fn write_edges<'a, W: Write>(
    mut writer: W,
    edges: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<usize, TsvError> {
    writeln!(writer, "item\tcategory")?;
    let mut count = 0;
    for (item, category) in edges {
        check_name(item, count + 2)?;
        check_name(category, count + 2)?;
        writeln!(writer, "{item}\t{category}")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Write `(node, depth)` rows with a `node\tdepth` header.
///
/// # Errors
///
/// Returns [`TsvError::Malformed`] for a name that is empty or contains a
/// tab or line break, or [`TsvError::Io`] if the writer fails.
pub fn write_depths<'a, W: Write>(
    mut writer: W,
    depths: impl IntoIterator<Item = (&'a str, u32)>,
) -> Result<usize, TsvError> {
    writeln!(writer, "node\tdepth")?;
    let mut count = 0;
    for (node, depth) in depths {
        check_name(node, count + 2)?;
        writeln!(writer, "{node}\t{depth}")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}
