use crate::predecessor::PredecessorIndex;
use crate::staging::StagingBuffer;
use std::mem;

/// Ordered run symbols, index-aligned with the predecessor index's run ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunHeadStore<T> {
    heads: Vec<T>,
}

impl<T> RunHeadStore<T> {
    pub(crate) fn new() -> Self {
        Self { heads: Vec::new() }
    }

    #[inline]
    pub(crate) fn get(&self, run_id: usize) -> Option<&T> {
        self.heads.get(run_id)
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.heads.last()
    }

    pub(crate) fn len(&self) -> usize {
        self.heads.len()
    }

    pub(crate) fn push(&mut self, head: T) {
        self.heads.push(head);
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.heads.iter()
    }

    /// Heap memory used by the heads, in bytes.
    pub(crate) fn heap_size(&self) -> usize {
        self.heads.len() * mem::size_of::<T>()
    }
}

impl<T: Clone> RunHeadStore<T> {
    pub(crate) fn extend_from_slice(&mut self, heads: &[T]) {
        self.heads.extend_from_slice(heads);
    }
}

/// The consolidated, rank-indexed prefix of the logical sequence.
///
/// Invariant: `heads.len() == starts.len()`, and the first start is 0 whenever
/// the region covers at least one symbol.
#[derive(Debug, Clone)]
pub(crate) struct CompressedRegion<T, I> {
    heads: RunHeadStore<T>,
    starts: I,
    /// Number of logical symbols covered.
    len: usize,
}

impl<T: Clone + Eq, I: PredecessorIndex> CompressedRegion<T, I> {
    pub(crate) fn new() -> Self {
        Self {
            heads: RunHeadStore::new(),
            starts: I::default(),
            len: 0,
        }
    }

    /// Builds a region covering all of `input` in a single scan.
    pub(crate) fn from_slice(input: &[T]) -> Self {
        let mut heads = RunHeadStore::new();
        let mut starts = Vec::new();

        for (position, value) in input.iter().enumerate() {
            if heads.last() != Some(value) {
                heads.push(value.clone());
                starts.push(position);
            }
        }

        Self {
            heads,
            starts: I::build(&starts),
            len: input.len(),
        }
    }

    /// Number of logical symbols covered.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn run_count(&self) -> usize {
        self.heads.len()
    }

    pub(crate) fn last_head(&self) -> Option<&T> {
        self.heads.last()
    }

    pub(crate) fn heads(&self) -> &RunHeadStore<T> {
        &self.heads
    }

    pub(crate) fn starts(&self) -> &I {
        &self.starts
    }

    /// Returns the symbol at `index`, or `None` past the covered prefix.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        // Positions of a merged continuation come before the next appended
        // start, so rank counts the run they continue.
        let rank = self.starts.rank(index);
        debug_assert!(rank <= self.heads.len());
        self.heads.get(rank.checked_sub(1)?)
    }

    /// Folds the buffered runs into the region.
    ///
    /// Buffer offsets are shifted by the current length. When the first
    /// buffered run continues the last committed run it is not re-added, so
    /// the committed runs stay maximal. Returns whether that merge happened.
    /// The buffer itself is left untouched.
    pub(crate) fn absorb(&mut self, staging: &StagingBuffer<T>) -> bool {
        let base = self.len;
        let merged = matches!(
            (self.heads.last(), staging.first_head()),
            (Some(last), Some(first)) if last == first
        );
        let skip = usize::from(merged);

        self.starts
            .append(staging.offsets()[skip..].iter().map(|&offset| base + offset));
        self.heads.extend_from_slice(&staging.heads()[skip..]);
        self.len += staging.len();

        merged
    }

    /// Heap memory used by heads and index, in bytes.
    pub(crate) fn heap_size(&self) -> usize {
        self.heads.heap_size() + self.starts.heap_size()
    }
}
