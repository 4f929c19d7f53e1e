use serde::Serialize;
use std::fmt;

/// Space and run statistics of a [`RunLengthCompression`](crate::RunLengthCompression).
///
/// All figures cover the compressed region and the staging buffer combined.
/// Runs that continue across the boundary between the two are counted once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionStats {
    /// Number of symbols in the logical sequence
    pub len: usize,
    /// Number of maximal runs
    pub run_count: usize,
    /// Runs stored in the compressed region
    pub committed_runs: usize,
    /// Runs held in the staging buffer (a continuation of the last committed run included)
    pub buffered_runs: usize,
    /// Bytes used by run heads, the predecessor index and buffered offsets
    pub space_bytes: usize,
    /// Bytes a plain array of the same symbols would use
    pub naive_space_bytes: usize,
}

impl CompressionStats {
    /// Returns the average number of symbols per run.
    pub fn average_run_length(&self) -> f64 {
        if self.run_count == 0 {
            0.0
        } else {
            self.len as f64 / self.run_count as f64
        }
    }

    /// Returns the space used as a percentage of the naive encoding.
    pub fn relative_percentage(&self) -> f64 {
        if self.naive_space_bytes == 0 {
            0.0
        } else {
            (self.space_bytes as f64 / self.naive_space_bytes as f64) * 100.0
        }
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={} runs={} avg_run_length={:.2} space_bytes={} naive_space_bytes={} relative={:.2}%",
            self.len,
            self.run_count,
            self.average_run_length(),
            self.space_bytes,
            self.naive_space_bytes,
            self.relative_percentage()
        )
    }
}
