/// Rank structure over a strictly increasing sequence of positions.
///
/// The engine stores the start position of every committed run here and maps
/// a logical position `p` to the 0-based id of its run as `rank(p) - 1`.
/// Positions are only ever appended, never changed.
///
/// Passing a batch that is not strictly increasing, or that does not start
/// after [`last`](PredecessorIndex::last), violates the contract and panics.
pub trait PredecessorIndex: Default {
    /// Builds an index from a complete, strictly increasing batch.
    fn build(positions: &[usize]) -> Self {
        let mut index = Self::default();
        index.append(positions.iter().copied());
        index
    }

    /// Returns how many stored positions are `<= x`.
    fn rank(&self, x: usize) -> usize;

    /// Appends positions, all greater than every stored position.
    fn append<P: IntoIterator<Item = usize>>(&mut self, positions: P);

    /// Number of stored positions.
    fn len(&self) -> usize;

    /// Returns true if no positions are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest stored position.
    fn last(&self) -> Option<usize>;

    /// Stored positions in ascending order.
    fn iter(&self) -> impl Iterator<Item = usize> + '_;

    /// Heap memory used by the index, in bytes.
    fn heap_size(&self) -> usize;
}

/// Sorted array of positions answering `rank` by binary search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedPositions {
    positions: Vec<usize>,
}

impl PredecessorIndex for SortedPositions {
    fn build(positions: &[usize]) -> Self {
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "predecessor positions must be strictly increasing"
        );
        Self {
            positions: positions.to_vec(),
        }
    }

    #[inline]
    fn rank(&self, x: usize) -> usize {
        self.positions.partition_point(|&p| p <= x)
    }

    fn append<P: IntoIterator<Item = usize>>(&mut self, positions: P) {
        for position in positions {
            if let Some(&last) = self.positions.last() {
                assert!(
                    position > last,
                    "predecessor position {position} must be greater than {last}"
                );
            }
            self.positions.push(position);
        }
    }

    fn len(&self) -> usize {
        self.positions.len()
    }

    fn last(&self) -> Option<usize> {
        self.positions.last().copied()
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }

    fn heap_size(&self) -> usize {
        self.positions.len() * std::mem::size_of::<usize>()
    }
}
