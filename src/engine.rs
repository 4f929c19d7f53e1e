use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::predecessor::{PredecessorIndex, SortedPositions};
use crate::region::CompressedRegion;
use crate::staging::StagingBuffer;
use crate::stats::CompressionStats;
use ahash::AHashMap as HashMap;
use std::hash::Hash;
use std::ops::Index;
use tracing::debug;

/// Run-length compressed sequence with random access.
///
/// The sequence is split into two tiers:
/// 1. A compressed region: run heads plus a [`PredecessorIndex`] over run
///    starts, covering the prefix `[0, compressed_len)`
/// 2. A staging buffer of at most `staging_capacity` runs covering the rest
///
/// Symbols pushed one at a time extend the last buffered run or open a new
/// one. When a new run does not fit, the buffer is consolidated into the
/// compressed region and cleared. Runs stay maximal across consolidations, so
/// pushing a sequence produces the same runs as [`from_slice`](Self::from_slice).
#[derive(Debug, Clone)]
pub struct RunLengthCompression<T, I = SortedPositions> {
    pub(crate) compressed: CompressedRegion<T, I>,
    pub(crate) staging: StagingBuffer<T>,
    config: EngineConfig,
}

impl<T: Hash + Eq + Clone, I: PredecessorIndex> RunLengthCompression<T, I> {
    /// Creates an empty instance with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(CompressedRegion::new(), EngineConfig::default())
    }

    /// Creates an empty instance, rejecting an unusable configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(CompressedRegion::new(), config))
    }

    /// Compresses a complete sequence in one scan.
    ///
    /// The whole input lands in the compressed region; the staging buffer
    /// starts out empty.
    pub fn from_slice(input: &[T]) -> Self {
        Self::build(input, EngineConfig::default())
    }

    /// Like [`from_slice`](Self::from_slice), with an explicit configuration
    /// for subsequent pushes.
    pub fn from_slice_with_config(input: &[T], config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(input, config))
    }

    fn build(input: &[T], config: EngineConfig) -> Self {
        let compressed = CompressedRegion::from_slice(input);
        debug!(
            symbols = compressed.len(),
            runs = compressed.run_count(),
            "built compressed region"
        );
        Self::from_parts(compressed, config)
    }

    fn from_parts(compressed: CompressedRegion<T, I>, config: EngineConfig) -> Self {
        Self {
            compressed,
            staging: StagingBuffer::with_capacity(config.staging_capacity),
            config,
        }
    }

    /// Appends a symbol to the sequence.
    ///
    /// O(1) unless a new run finds the staging buffer full, in which case the
    /// buffer is consolidated first (O(staging_capacity)).
    pub fn push(&mut self, value: T) {
        if let Err(value) = self.staging.try_push(value) {
            self.consolidate();
            let pushed = self.staging.try_push(value);
            debug_assert!(pushed.is_ok(), "empty staging buffer must accept a symbol");
        }
    }

    /// Appends every symbol of `iter` in order.
    pub fn extend<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        for value in iter {
            self.push(value);
        }
    }

    /// Folds the staging buffer into the compressed region.
    ///
    /// Does nothing when the buffer is empty.
    pub fn consolidate(&mut self) {
        if self.staging.is_empty() {
            return;
        }
        let runs = self.staging.run_count();
        let merged = self.compressed.absorb(&self.staging);
        self.staging.clear();
        debug!(
            runs,
            merged,
            compressed_len = self.compressed.len(),
            "consolidated staging buffer"
        );
    }

    /// Returns the symbol at `index`, or `None` if it is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        let compressed_len = self.compressed.len();
        if index < compressed_len {
            self.compressed.get(index)
        } else {
            self.staging.get(index - compressed_len)
        }
    }

    /// Returns the symbol at `index`, or [`Error::OutOfBounds`].
    pub fn try_get(&self, index: usize) -> Result<&T> {
        self.get(index).ok_or(Error::OutOfBounds {
            index,
            len: self.len(),
        })
    }

    /// Returns the number of symbols in the sequence.
    pub fn len(&self) -> usize {
        self.compressed.len() + self.staging.len()
    }

    /// Returns true if no symbols have been added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of symbols covered by the compressed region.
    pub fn compressed_len(&self) -> usize {
        self.compressed.len()
    }

    /// Number of symbols waiting in the staging buffer.
    pub fn buffered_len(&self) -> usize {
        self.staging.len()
    }

    /// Returns the number of maximal runs in the sequence.
    pub fn run_count(&self) -> usize {
        self.compressed.run_count() + self.staging.run_count() - usize::from(self.continues_across())
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True if the first buffered run continues the last committed run.
    fn continues_across(&self) -> bool {
        matches!(
            (self.compressed.last_head(), self.staging.first_head()),
            (Some(last), Some(first)) if last == first
        )
    }

    /// Returns space and run statistics over both tiers.
    pub fn stats(&self) -> CompressionStats {
        let len = self.len();
        CompressionStats {
            len,
            run_count: self.run_count(),
            committed_runs: self.compressed.run_count(),
            buffered_runs: self.staging.run_count(),
            space_bytes: self.compressed.heap_size() + self.staging.heap_size(),
            naive_space_bytes: len * std::mem::size_of::<T>(),
        }
    }

    /// Counts how many maximal runs carry each head.
    pub fn run_head_histogram(&self) -> HashMap<T, usize> {
        let mut histogram = HashMap::default();
        for run in self.runs() {
            *histogram.entry(run.head.clone()).or_insert(0) += 1;
        }
        histogram
    }

    /// Returns the number of distinct run heads.
    pub fn distinct_heads(&self) -> usize {
        self.run_head_histogram().len()
    }
}

impl<T: Hash + Eq + Clone, I: PredecessorIndex> Index<usize> for RunLengthCompression<T, I> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            ),
        }
    }
}

impl<T: Hash + Eq + Clone, I: PredecessorIndex> Default for RunLengthCompression<T, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq + Clone, I: PredecessorIndex> Extend<T> for RunLengthCompression<T, I> {
    fn extend<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        RunLengthCompression::extend(self, iter);
    }
}

impl<T: Hash + Eq + Clone, I: PredecessorIndex> FromIterator<T> for RunLengthCompression<T, I> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        let mut rlc = Self::new();
        rlc.extend(iter);
        rlc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank_bitvector::RankBitVector;

    fn streaming(capacity: usize) -> RunLengthCompression<u32> {
        RunLengthCompression::with_config(EngineConfig::new().with_staging_capacity(capacity))
            .expect("valid config")
    }

    fn read_all<I: PredecessorIndex>(rlc: &RunLengthCompression<u32, I>) -> Vec<u32> {
        (0..rlc.len()).map(|i| rlc[i]).collect()
    }

    #[test]
    fn test_new() {
        let rlc = RunLengthCompression::<u32>::new();
        assert_eq!(rlc.len(), 0);
        assert!(rlc.is_empty());
        assert_eq!(rlc.run_count(), 0);
        assert_eq!(rlc.config(), &EngineConfig::default());
    }

    #[test]
    fn test_batch_scenario() {
        let rlc = RunLengthCompression::<u32>::from_slice(&[5, 5, 5, 2, 2, 7]);
        assert_eq!(rlc.len(), 6);
        assert_eq!(rlc.run_count(), 3);
        assert_eq!(rlc.compressed_len(), 6);
        assert_eq!(rlc.buffered_len(), 0);
        assert_eq!(read_all(&rlc), vec![5, 5, 5, 2, 2, 7]);
    }

    #[test]
    fn test_streaming_scenario_capacity_two() {
        let mut rlc = streaming(2);
        rlc.extend([5, 5, 5, 2, 2]);
        assert_eq!(rlc.compressed_len(), 0);
        assert_eq!(rlc.buffered_len(), 5);

        // The third distinct run triggers consolidation of (5@0), (2@3).
        rlc.push(7);
        assert_eq!(rlc.compressed_len(), 5);
        assert_eq!(rlc.buffered_len(), 1);
        assert_eq!(rlc.compressed.starts().iter().collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(rlc[5], 7);
        assert_eq!(rlc[3], 2);
        assert_eq!(read_all(&rlc), vec![5, 5, 5, 2, 2, 7]);
    }

    #[test]
    fn test_all_identical() {
        let rlc = RunLengthCompression::<u32>::from_slice(&[9, 9, 9, 9]);
        assert_eq!(rlc.run_count(), 1);
        assert_eq!(read_all(&rlc), vec![9; 4]);
        assert_eq!(rlc.stats().average_run_length(), 4.0);
    }

    #[test]
    fn test_empty_access_fails() {
        let rlc = RunLengthCompression::<u32>::from_slice(&[]);
        assert_eq!(rlc.len(), 0);
        assert_eq!(rlc.get(0), None);
        assert!(matches!(
            rlc.try_get(0),
            Err(Error::OutOfBounds { index: 0, len: 0 })
        ));
    }

    #[test]
    #[should_panic(expected = "index out of bounds: the len is 0 but the index is 0")]
    fn test_empty_index_panics() {
        let rlc = RunLengthCompression::<u32>::from_slice(&[]);
        let _ = rlc[0];
    }

    #[test]
    fn test_alternating_not_merged() {
        let rlc = RunLengthCompression::<u32, RankBitVector>::from_slice(&[1, 2, 1, 2]);
        assert_eq!(rlc.run_count(), 4);
        assert_eq!(read_all(&rlc), vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_out_of_bounds_past_buffer() {
        let mut rlc = streaming(2);
        rlc.extend([1, 1, 2]);
        assert_eq!(rlc.try_get(2).ok(), Some(&2));
        assert!(matches!(
            rlc.try_get(3),
            Err(Error::OutOfBounds { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result =
            RunLengthCompression::<u32>::with_config(EngineConfig::new().with_staging_capacity(0));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = RunLengthCompression::<u32>::from_slice_with_config(
            &[1, 2],
            EngineConfig::new().with_staging_capacity(0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_huge_capacity_accepted() {
        let config = EngineConfig::new().with_staging_capacity(usize::MAX);
        assert!(config.validate().is_ok());

        let mut rlc = RunLengthCompression::<u32>::with_config(config).unwrap();
        rlc.extend([4, 4, 1, 9, 9, 9]);
        assert_eq!(rlc.buffered_len(), 6);
        assert_eq!(read_all(&rlc), vec![4, 4, 1, 9, 9, 9]);

        let mut rlc = RunLengthCompression::<u32>::from_slice_with_config(&[2, 2, 3], config).unwrap();
        rlc.push(3);
        rlc.push(5);
        assert_eq!(read_all(&rlc), vec![2, 2, 3, 3, 5]);
        assert_eq!(rlc.run_count(), 3);
    }

    #[test]
    fn test_consolidate_empty_is_noop() {
        let mut rlc = RunLengthCompression::<u32>::from_slice(&[3, 3, 4]);
        let before = rlc.stats();
        rlc.consolidate();
        rlc.consolidate();
        assert_eq!(rlc.stats(), before);
        assert_eq!(read_all(&rlc), vec![3, 3, 4]);
    }

    #[test]
    fn test_push_after_batch_merges_run() {
        let mut rlc = RunLengthCompression::<u32>::from_slice_with_config(
            &[1, 4, 4],
            EngineConfig::new().with_staging_capacity(2),
        )
        .unwrap();
        rlc.extend([4, 4]);
        assert_eq!(rlc.run_count(), 2);

        rlc.extend([6, 8]);
        assert_eq!(rlc.compressed_len(), 6);
        assert_eq!(rlc.compressed.run_count(), 3);
        assert_eq!(rlc.run_count(), 4);
        assert_eq!(read_all(&rlc), vec![1, 4, 4, 4, 4, 6, 8]);
    }

    #[test]
    fn test_explicit_consolidate_then_same_symbol() {
        let mut rlc = streaming(4);
        rlc.extend([2, 2]);
        rlc.consolidate();
        rlc.extend([2, 2, 3]);
        assert_eq!(rlc.run_count(), 2);
        rlc.consolidate();
        assert_eq!(rlc.compressed.run_count(), 2);
        assert_eq!(rlc.compressed.starts().iter().collect::<Vec<_>>(), vec![0, 4]);
        assert_eq!(read_all(&rlc), vec![2, 2, 2, 2, 3]);
    }

    #[test]
    fn test_run_longer_than_capacity() {
        let mut rlc = streaming(1);
        rlc.push(0);
        rlc.extend(std::iter::repeat(7).take(10));
        rlc.push(1);
        rlc.extend(std::iter::repeat(7).take(3));
        assert_eq!(rlc.run_count(), 4);
        assert!((1..11).all(|i| rlc[i] == 7));
        assert_eq!(rlc[11], 1);
    }

    #[test]
    fn test_stats_space() {
        let mut rlc = streaming(2);
        rlc.extend([1, 1, 1, 2, 2, 3]);
        let stats = rlc.stats();
        assert_eq!(stats.len, 6);
        assert_eq!(stats.run_count, 3);
        assert_eq!(stats.committed_runs, 2);
        assert_eq!(stats.buffered_runs, 1);
        assert_eq!(stats.naive_space_bytes, 6 * 4);
        // 3 heads, 2 indexed starts, 1 buffered offset
        let word = std::mem::size_of::<usize>();
        assert_eq!(stats.space_bytes, 3 * 4 + 2 * word + word);
    }

    #[test]
    fn test_histogram() {
        let rlc = RunLengthCompression::<u32>::from_slice(&[1, 1, 2, 1, 3, 3, 2]);
        let histogram = rlc.run_head_histogram();
        assert_eq!(histogram[&1], 2);
        assert_eq!(histogram[&2], 2);
        assert_eq!(histogram[&3], 1);
        assert_eq!(rlc.distinct_heads(), 3);
    }

    #[test]
    fn test_from_iterator() {
        let rlc: RunLengthCompression<char> = "aabccc".chars().collect();
        assert_eq!(rlc.len(), 6);
        assert_eq!(rlc.run_count(), 3);
        assert_eq!(rlc[5], 'c');
    }

    #[test]
    fn test_extend_trait_matches_inherent() {
        let mut via_trait = streaming(2);
        Extend::extend(&mut via_trait, [1, 1, 2, 3, 3, 4]);
        let mut via_inherent = streaming(2);
        via_inherent.extend([1, 1, 2, 3, 3, 4]);

        assert_eq!(read_all(&via_trait), read_all(&via_inherent));
        assert_eq!(via_trait.compressed_len(), via_inherent.compressed_len());
        assert_eq!(via_trait.run_count(), 4);
    }
}
