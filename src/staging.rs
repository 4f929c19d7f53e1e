use std::mem;

use crate::config::DEFAULT_STAGING_CAPACITY;

/// Fixed-capacity holding area for runs appended since the last consolidation.
///
/// Stores at most `capacity` runs as (buffer-local offset, head) pairs. A
/// symbol equal to the last buffered head extends that run and takes no slot.
#[derive(Debug, Clone)]
pub(crate) struct StagingBuffer<T> {
    heads: Vec<T>,
    offsets: Vec<usize>,
    /// Symbols absorbed since the last clear, run continuations included.
    len: usize,
    capacity: usize,
}

impl<T: Eq> StagingBuffer<T> {
    /// The runs vectors start at no more than the default capacity and grow
    /// on demand up to `capacity`.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let reserved = capacity.min(DEFAULT_STAGING_CAPACITY);
        Self {
            heads: Vec::with_capacity(reserved),
            offsets: Vec::with_capacity(reserved),
            len: 0,
            capacity,
        }
    }

    /// Absorbs `value`, handing it back when a new run is needed but every
    /// slot is taken.
    #[inline]
    pub(crate) fn try_push(&mut self, value: T) -> Result<(), T> {
        if self.heads.last() == Some(&value) {
            self.len += 1;
            return Ok(());
        }
        if self.heads.len() == self.capacity {
            return Err(value);
        }
        self.offsets.push(self.len);
        self.heads.push(value);
        self.len += 1;
        Ok(())
    }

    /// Returns the symbol at buffer-local position `index`.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        // offsets[0] == 0, so at least one offset is <= index.
        let run = self.offsets.partition_point(|&offset| offset <= index) - 1;
        self.heads.get(run)
    }

    /// Empties the buffer, keeping its allocation.
    pub(crate) fn clear(&mut self) {
        self.heads.clear();
        self.offsets.clear();
        self.len = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn run_count(&self) -> usize {
        self.heads.len()
    }

    pub(crate) fn first_head(&self) -> Option<&T> {
        self.heads.first()
    }

    pub(crate) fn heads(&self) -> &[T] {
        &self.heads
    }

    pub(crate) fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Memory held by the buffered runs, in bytes.
    pub(crate) fn heap_size(&self) -> usize {
        self.heads.len() * mem::size_of::<T>() + self.offsets.len() * mem::size_of::<usize>()
    }
}
