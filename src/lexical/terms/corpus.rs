//! The flattened, immutable term corpus.
//!
//! A [`TermCorpus`] stores a sorted, deduplicated set of (field, term) pairs in
//! two parallel arrays: every term's bytes back-to-back in a single buffer, and
//! the offsets at which each term starts. Consecutive runs of terms sharing a
//! field are described by [`FieldRange`]s, so field names are stored once per
//! run instead of once per term.
//!
//! Because the encoding is canonical, two corpora built from the same multiset
//! of terms are structurally equal regardless of input order or duplication,
//! which makes the corpus usable as a cache key.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::util::bytes_ref::BytesRef;

/// A run of terms `[start, end)` that all belong to `field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRange {
    field: String,
    start: usize,
    end: usize,
}

impl FieldRange {
    pub(crate) fn new(field: String, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        FieldRange { field, start, end }
    }

    /// Field shared by the terms in the range.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Index of the first term.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the index of the last term.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of terms in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range holds no terms. Only the range of an empty corpus does.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Immutable flattened encoding of a term multiset.
#[derive(Debug, Clone)]
pub struct TermCorpus {
    /// Unique term bytes, back-to-back, sized exactly.
    terms_bytes: Box<[u8]>,

    /// `offsets[i]..offsets[i + 1]` is term `i`; one longer than the term count.
    offsets: Box<[usize]>,

    /// Contiguous, disjoint runs covering every term.
    field_ranges: Vec<FieldRange>,

    /// Polynomial fold over the sorted unique pairs.
    hash_code: u64,
}

impl TermCorpus {
    pub(crate) fn from_parts(
        terms_bytes: Box<[u8]>,
        offsets: Box<[usize]>,
        field_ranges: Vec<FieldRange>,
        hash_code: u64,
    ) -> Self {
        debug_assert!(!offsets.is_empty() && offsets[0] == 0);
        debug_assert_eq!(offsets[offsets.len() - 1], terms_bytes.len());
        TermCorpus {
            terms_bytes,
            offsets,
            field_ranges,
            hash_code,
        }
    }

    /// Number of unique terms.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether the corpus holds no terms.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The buffer holding all term bytes.
    pub fn terms_bytes(&self) -> &[u8] {
        &self.terms_bytes
    }

    /// Term start offsets plus the final end offset.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Field runs in sorted field order.
    pub fn field_ranges(&self) -> &[FieldRange] {
        &self.field_ranges
    }

    /// Order-independent hash of the term set.
    pub fn hash_code(&self) -> u64 {
        self.hash_code
    }

    /// Bytes of term `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn term(&self, index: usize) -> &[u8] {
        &self.terms_bytes[self.offsets[index]..self.offsets[index + 1]]
    }

    /// All (field, term) pairs in stored order.
    pub fn iter(&self) -> TermCorpusIter<'_> {
        TermCorpusIter {
            corpus: self,
            spare: BytesRef::empty(&self.terms_bytes),
            range: 0,
            index: 0,
        }
    }

    /// Approximate heap bytes held by the corpus.
    pub fn ram_bytes_used(&self) -> usize {
        let ranges: usize = self
            .field_ranges
            .iter()
            .map(|range| size_of::<FieldRange>() + range.field.capacity())
            .sum();
        size_of::<Self>()
            + self.terms_bytes.len()
            + self.offsets.len() * size_of::<usize>()
            + ranges
    }
}

impl PartialEq for TermCorpus {
    fn eq(&self, other: &Self) -> bool {
        if self.hash_code != other.hash_code || self.field_ranges != other.field_ranges {
            return false;
        }
        let len = self.len();
        if len != other.len() || self.offsets[..=len] != other.offsets[..=len] {
            return false;
        }
        let live = self.offsets[len];
        self.terms_bytes[..live] == other.terms_bytes[..live]
    }
}

impl Eq for TermCorpus {}

impl Hash for TermCorpus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code);
    }
}

impl fmt::Display for TermCorpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, term)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{field}:{}", String::from_utf8_lossy(term))?;
        }
        Ok(())
    }
}

/// Iterator over the (field, term) pairs of a [`TermCorpus`].
#[derive(Debug)]
pub struct TermCorpusIter<'a> {
    corpus: &'a TermCorpus,
    spare: BytesRef<'a>,
    range: usize,
    index: usize,
}

impl<'a> Iterator for TermCorpusIter<'a> {
    type Item = (&'a str, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let corpus = self.corpus;
        loop {
            let range = corpus.field_ranges.get(self.range)?;
            if self.index < range.end {
                let (start, end) = (corpus.offsets[self.index], corpus.offsets[self.index + 1]);
                self.spare.reposition(start, end - start);
                self.index += 1;
                return Some((range.field.as_str(), self.spare.as_slice()));
            }
            self.range += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.corpus.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TermCorpusIter<'_> {}
