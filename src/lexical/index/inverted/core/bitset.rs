//! Dense document id bit sets.
//!
//! [`DocIdBitSet`] is the result type of term filter materialization and
//! [`Bits`] is the random-access capability used for accepted-docs masks.

use std::fmt::Debug;

use bit_vec::BitVec;

use crate::error::{Result, TermsetError};
use crate::lexical::index::inverted::core::posting::{
    MAX_DOCS, NO_MORE_DOCS, NOT_STARTED, PostingIterator,
};

/// Random access to a fixed-length sequence of bits.
pub trait Bits: Debug + Send + Sync {
    /// Whether bit `index` is set. Out-of-range indices read as unset.
    fn get(&self, index: u64) -> bool;

    /// Number of bits.
    fn len(&self) -> u64;

    /// Whether there are no bits at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Bits for BitVec {
    fn get(&self, index: u64) -> bool {
        usize::try_from(index)
            .ok()
            .and_then(|i| BitVec::get(self, i))
            .unwrap_or(false)
    }

    fn len(&self) -> u64 {
        BitVec::len(self) as u64
    }
}

/// A fixed-size set of document ids backed by a dense bit vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocIdBitSet {
    bits: BitVec,
}

impl DocIdBitSet {
    /// Create an empty set able to hold ids in `[0, max_doc)`.
    ///
    /// Fails without allocating when `max_doc` exceeds [`MAX_DOCS`].
    pub fn new(max_doc: u64) -> Result<Self> {
        let len = usize::try_from(max_doc)
            .ok()
            .filter(|_| max_doc <= MAX_DOCS)
            .ok_or_else(|| {
                TermsetError::index(format!(
                    "max_doc {max_doc} exceeds the limit of {MAX_DOCS} documents"
                ))
            })?;
        Ok(DocIdBitSet {
            bits: BitVec::from_elem(len, false),
        })
    }

    /// Add a document id. Adding an id twice has no further effect.
    ///
    /// # Panics
    ///
    /// Panics if `doc_id` is not below [`DocIdBitSet::len`].
    #[inline]
    pub fn set(&mut self, doc_id: u64) {
        match usize::try_from(doc_id) {
            Ok(index) if index < self.bits.len() => self.bits.set(index, true),
            _ => panic!("document id {doc_id} out of range for {} bits", self.bits.len()),
        }
    }

    /// Whether the set contains `doc_id`.
    pub fn contains(&self, doc_id: u64) -> bool {
        Bits::get(&self.bits, doc_id)
    }

    /// Number of ids in the set.
    pub fn cardinality(&self) -> u64 {
        self.bits
            .blocks()
            .map(|block| u64::from(block.count_ones()))
            .sum()
    }

    /// Capacity of the set, the segment's `max_doc`.
    pub fn len(&self) -> u64 {
        self.bits.len() as u64
    }

    /// Whether the set has zero capacity.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Ids in the set, ascending.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(doc_id, set)| set.then_some(doc_id as u64))
    }

    /// A posting iterator over the ids in the set.
    pub fn iterator(&self) -> BitSetIterator<'_> {
        BitSetIterator::new(&self.bits)
    }
}

impl Bits for DocIdBitSet {
    fn get(&self, index: u64) -> bool {
        self.contains(index)
    }

    fn len(&self) -> u64 {
        DocIdBitSet::len(self)
    }
}

/// Posting iterator over the set bits of a bit vector.
#[derive(Debug)]
pub struct BitSetIterator<'a> {
    bits: &'a BitVec,
    doc: u64,
}

impl<'a> BitSetIterator<'a> {
    /// Create an iterator positioned before the first set bit.
    pub fn new(bits: &'a BitVec) -> Self {
        BitSetIterator {
            bits,
            doc: NOT_STARTED,
        }
    }

    /// First set bit at or after `from`, or [`NO_MORE_DOCS`].
    fn next_set_bit(&self, from: u64) -> u64 {
        const BLOCK_BITS: u64 = u32::BITS as u64;

        if from >= self.bits.len() as u64 {
            return NO_MORE_DOCS;
        }

        // Bits past len() in the last block are always zero.
        let storage = self.bits.storage();
        let mut block = (from / BLOCK_BITS) as usize;
        let word = storage[block] >> (from % BLOCK_BITS);
        if word != 0 {
            return from + u64::from(word.trailing_zeros());
        }

        block += 1;
        while block < storage.len() {
            let word = storage[block];
            if word != 0 {
                return block as u64 * BLOCK_BITS + u64::from(word.trailing_zeros());
            }
            block += 1;
        }
        NO_MORE_DOCS
    }
}

impl PostingIterator for BitSetIterator<'_> {
    fn doc_id(&self) -> u64 {
        self.doc
    }

    fn next(&mut self) -> Result<u64> {
        let from = match self.doc {
            NO_MORE_DOCS => return Ok(NO_MORE_DOCS),
            NOT_STARTED => 0,
            doc => doc + 1,
        };
        self.doc = self.next_set_bit(from);
        Ok(self.doc)
    }

    fn advance(&mut self, target: u64) -> Result<u64> {
        let from = match self.doc {
            NO_MORE_DOCS => return Ok(NO_MORE_DOCS),
            NOT_STARTED => target,
            doc => target.max(doc + 1),
        };
        self.doc = self.next_set_bit(from);
        Ok(self.doc)
    }

    fn cost(&self) -> u64 {
        self.bits.len() as u64
    }
}
