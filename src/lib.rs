//! # cpi-rs - Compressed Partition Index
//!
//! Run-length compression for large arrays of small symbols (such as the
//! partition id of every node in a partitioned graph) with fast random access.
//!
//! A [`RunLengthCompression`] keeps two tiers:
//! 1. **Compressed region**: one head per maximal run and a [`PredecessorIndex`]
//!    over run starts. Position `p` lives in run `rank(p) - 1`
//! 2. **Staging buffer**: up to `staging_capacity` recently appended runs,
//!    folded into the compressed region in one batch when full
//!
//! ## Example
//!
//! ```
//! use cpi_rs::{EngineConfig, RunLengthCompression};
//!
//! // Batch construction
//! let rlc = RunLengthCompression::<u16>::from_slice(&[5, 5, 5, 2, 2, 7]);
//! assert_eq!(rlc[4], 2);
//! assert_eq!(rlc.run_count(), 3);
//!
//! // Streaming construction
//! let config = EngineConfig::new().with_staging_capacity(2);
//! let mut streamed = RunLengthCompression::<u16>::with_config(config).unwrap();
//! streamed.extend([5, 5, 5, 2, 2, 7]);
//! assert_eq!(streamed.iter().copied().collect::<Vec<_>>(), vec![5, 5, 5, 2, 2, 7]);
//! println!("{}", streamed.stats());
//! ```
//!
//! ## Performance
//!
//! - O(1) amortized per pushed symbol, O(staging_capacity) worst case
//! - O(log r) random access with [`SortedPositions`], O(1) with [`RankBitVector`]
//! - Space proportional to the number of runs r (plus n bits for [`RankBitVector`])

mod config;
mod engine;
mod error;
mod iter;
mod predecessor;
mod rank_bitvector;
pub mod reader;
mod region;
mod staging;
mod stats;

#[cfg(test)]
mod tests;

pub use config::{EngineConfig, DEFAULT_STAGING_CAPACITY};
pub use engine::RunLengthCompression;
pub use error::{Error, Result};
pub use iter::{Iter, Run, Runs};
pub use predecessor::{PredecessorIndex, SortedPositions};
pub use rank_bitvector::RankBitVector;
pub use reader::{read_partition_file, PartitionFile};
pub use stats::CompressionStats;
