//! Reader for partition files.
//!
//! The first line holds the node count `N`, followed by one partition id per
//! line for nodes `0..N`:
//!
//! ```text
//! 4
//! 0
//! 0
//! 1
//! 1
//! ```

use crate::error::{Error, Result};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Node count and partition ids read from a partition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionFile<T> {
    /// Node count announced by the header line
    pub nodes: usize,
    /// Partition id per node; shorter than `nodes` if the file was truncated
    pub partition_ids: Vec<T>,
}

/// Reads a partition file from disk.
pub fn read_partition_file<T, P>(path: P) -> Result<PartitionFile<T>>
where
    T: FromStr,
    T::Err: Display,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let partition = parse_partition_ids(BufReader::new(file)).map_err(|err| match err {
        Error::Read { source, .. } => Error::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    debug!(
        path = %path.display(),
        nodes = partition.nodes,
        read = partition.partition_ids.len(),
        "read partition file"
    );
    Ok(partition)
}

/// Parses the partition file format from any buffered reader.
///
/// Fails on the first line that is not a number. Lines past the announced
/// node count are ignored. Reader failures surface as [`Error::Read`] with the
/// line number; [`read_partition_file`] reports them as [`Error::Io`] with the
/// file path.
pub fn parse_partition_ids<T, R>(reader: R) -> Result<PartitionFile<T>>
where
    T: FromStr,
    T::Err: Display,
    R: BufRead,
{
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line.map_err(|source| Error::Read { line: 1, source })?,
        None => {
            return Err(Error::Parse {
                line: 1,
                message: "missing node count".to_string(),
            })
        }
    };
    let nodes: usize = parse_line(&header, 1)?;

    // The header is untrusted; grow past this as lines actually arrive.
    let mut partition_ids = Vec::with_capacity(nodes.min(1 << 20));
    for (i, line) in lines.take(nodes).enumerate() {
        let line = line.map_err(|source| Error::Read { line: i + 2, source })?;
        partition_ids.push(parse_line(&line, i + 2)?);
    }

    if partition_ids.len() < nodes {
        warn!(
            nodes,
            read = partition_ids.len(),
            "partition file ended before all nodes were read"
        );
    }

    Ok(PartitionFile {
        nodes,
        partition_ids,
    })
}

fn parse_line<T>(line: &str, line_number: usize) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let trimmed = line.trim();
    trimmed.parse().map_err(|err: T::Err| Error::Parse {
        line: line_number,
        message: format!("{trimmed:?}: {err}"),
    })
}
