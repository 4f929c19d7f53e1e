use crate::engine::RunLengthCompression;
use crate::predecessor::PredecessorIndex;
use std::hash::Hash;
use std::iter::Peekable;

/// A maximal run of equal symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a, T> {
    /// The repeated symbol
    pub head: &'a T,
    /// Logical position of the first symbol
    pub start: usize,
    /// Number of symbols in the run
    pub len: usize,
}

type RunStarts<'a, T> = Box<dyn Iterator<Item = (usize, &'a T)> + 'a>;

/// Iterator over the maximal runs of a [`RunLengthCompression`].
///
/// Walks the committed runs followed by the buffered ones. A buffered run
/// that continues the last committed run is reported as part of it.
pub struct Runs<'a, T> {
    starts: Peekable<RunStarts<'a, T>>,
    end: usize,
}

impl<'a, T: PartialEq> Iterator for Runs<'a, T> {
    type Item = Run<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, head) = self.starts.next()?;
        while self.starts.next_if(|&(_, next)| next == head).is_some() {}

        let end = self.starts.peek().map_or(self.end, |&(next_start, _)| next_start);
        Some(Run {
            head,
            start,
            len: end - start,
        })
    }
}

/// Iterator over the symbols of a [`RunLengthCompression`], in order.
///
/// Expands runs without going through `rank`, so a full scan is linear.
pub struct Iter<'a, T> {
    runs: Runs<'a, T>,
    current: Option<&'a T>,
    remaining: usize,
}

impl<'a, T: PartialEq> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining == 0 {
            let run = self.runs.next()?;
            self.current = Some(run.head);
            self.remaining = run.len;
        }
        self.remaining -= 1;
        self.current
    }
}

impl<T: Hash + Eq + Clone, I: PredecessorIndex> RunLengthCompression<T, I> {
    /// Returns an iterator over the maximal runs.
    pub fn runs(&self) -> Runs<'_, T> {
        let base = self.compressed.len();
        let committed = self
            .compressed
            .starts()
            .iter()
            .zip(self.compressed.heads().iter());
        let buffered = self
            .staging
            .offsets()
            .iter()
            .map(move |&offset| base + offset)
            .zip(self.staging.heads().iter());

        let starts: RunStarts<'_, T> = Box::new(committed.chain(buffered));
        Runs {
            starts: starts.peekable(),
            end: self.len(),
        }
    }

    /// Returns an iterator over the symbols.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            runs: self.runs(),
            current: None,
            remaining: 0,
        }
    }
}

impl<'a, T: Hash + Eq + Clone, I: PredecessorIndex> IntoIterator for &'a RunLengthCompression<T, I> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
