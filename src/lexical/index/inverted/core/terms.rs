//! Term dictionary access.
//!
//! An index segment hands out one [`TermsEnum`] per field. Term filters only
//! use exact seeks; ceiling and prefix seeks are not part of this contract.

use std::fmt::Debug;

use crate::error::Result;
use crate::lexical::index::inverted::core::bitset::Bits;
use crate::lexical::index::inverted::core::posting::PostingIterator;

/// Cursor over a single field's term dictionary.
pub trait TermsEnum: Debug {
    /// Position the cursor exactly on `term`.
    ///
    /// Returns `false` when the term is not in the dictionary, in which case
    /// the cursor is left unpositioned.
    fn seek_exact(&mut self, term: &[u8]) -> Result<bool>;

    /// The term the cursor is positioned on, if any.
    fn term(&self) -> Option<&[u8]>;

    /// Document-id-only postings of the current term.
    ///
    /// Documents for which `accept_docs` returns `false` are skipped by the
    /// returned iterator. Fails when the cursor is not positioned.
    fn postings<'a>(
        &'a mut self,
        accept_docs: Option<&'a dyn Bits>,
    ) -> Result<Box<dyn PostingIterator + 'a>>;
}

/// Read access to one index segment.
pub trait SegmentReader: Debug + Send + Sync {
    /// Stable identifier of the segment.
    fn segment_id(&self) -> &str;

    /// Identity of this segment's postings, used to key cached results.
    ///
    /// Segment ids are chosen by callers and may repeat, so two readers may
    /// only share a key when they expose exactly the same postings.
    fn cache_key(&self) -> u64;

    /// One past the highest document id in the segment.
    fn max_doc(&self) -> u64;

    /// Term dictionary cursor for `field`, or `None` when the segment has no
    /// such field.
    fn terms<'a>(&'a self, field: &str) -> Result<Option<Box<dyn TermsEnum + 'a>>>;
}
