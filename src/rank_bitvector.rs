//! Appendable bit vector with a block rank directory.
//!
//! Bit `p` is set iff `p` is a stored position. Alongside the 64-bit words a
//! directory keeps the number of set bits before every block of
//! [`BLOCK_WORDS`] words, so `rank` is one lookup plus at most
//! `BLOCK_WORDS` popcounts.
//!
//! The directory is extended as words are appended: set bits are only ever
//! added past the current end, so the count before a new block is the total
//! count at the moment its first word is created.

use crate::predecessor::PredecessorIndex;

const WORD_BITS: usize = 64;

/// Words per rank directory block (512 bits).
const BLOCK_WORDS: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankBitVector {
    words: Vec<u64>,
    /// Entry b = set bits in `words[0 .. b * BLOCK_WORDS]`.
    blocks: Vec<u64>,
    /// Number of meaningful bits (last set position + 1).
    len_bits: usize,
    ones: usize,
}

impl RankBitVector {
    /// Number of bits covered, i.e. one past the largest stored position.
    pub fn bit_len(&self) -> usize {
        self.len_bits
    }

    /// Returns the bit at `index`, or `None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len_bits {
            return None;
        }
        Some(self.words[index / WORD_BITS] >> (index % WORD_BITS) & 1 == 1)
    }

    fn push_word(&mut self) {
        if self.words.len() % BLOCK_WORDS == 0 {
            self.blocks.push(self.ones as u64);
        }
        self.words.push(0);
    }

    fn set_next(&mut self, position: usize) {
        if self.ones > 0 {
            assert!(
                position >= self.len_bits,
                "predecessor position {position} must be greater than {}",
                self.len_bits - 1
            );
        }
        while self.words.len() * WORD_BITS <= position {
            self.push_word();
        }
        self.words[position / WORD_BITS] |= 1u64 << (position % WORD_BITS);
        self.len_bits = position + 1;
        self.ones += 1;
    }
}

impl PredecessorIndex for RankBitVector {
    fn build(positions: &[usize]) -> Self {
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "predecessor positions must be strictly increasing"
        );
        let mut bv = Self::default();
        if let Some(&last) = positions.last() {
            let words = last / WORD_BITS + 1;
            bv.words.reserve_exact(words);
            bv.blocks.reserve_exact(words.div_ceil(BLOCK_WORDS));
        }
        bv.append(positions.iter().copied());
        bv
    }

    #[inline]
    fn rank(&self, x: usize) -> usize {
        if x >= self.len_bits {
            return self.ones;
        }
        let word = x / WORD_BITS;
        let block = word / BLOCK_WORDS;

        let mut count = self.blocks[block] as usize;
        for &w in &self.words[block * BLOCK_WORDS..word] {
            count += w.count_ones() as usize;
        }
        let bit = x % WORD_BITS;
        let mask = if bit == WORD_BITS - 1 {
            u64::MAX
        } else {
            (1u64 << (bit + 1)) - 1
        };
        count + (self.words[word] & mask).count_ones() as usize
    }

    fn append<P: IntoIterator<Item = usize>>(&mut self, positions: P) {
        for position in positions {
            self.set_next(position);
        }
    }

    fn len(&self) -> usize {
        self.ones
    }

    fn last(&self) -> Option<usize> {
        if self.ones == 0 {
            None
        } else {
            Some(self.len_bits - 1)
        }
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut buffer = word;
            std::iter::from_fn(move || {
                if buffer == 0 {
                    return None;
                }
                let bit = buffer.trailing_zeros() as usize;
                buffer &= buffer - 1;
                Some(i * WORD_BITS + bit)
            })
        })
    }

    fn heap_size(&self) -> usize {
        (self.words.len() + self.blocks.len()) * std::mem::size_of::<u64>()
    }
}
