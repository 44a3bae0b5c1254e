//! Posting iteration protocol.
//!
//! A [`PostingIterator`] walks the document ids of one posting list. The
//! materializer only ever drains iterators with [`PostingIterator::next`], but
//! every implementation must also support [`PostingIterator::advance`], and the
//! two must agree: advancing to a target produces exactly the id that calling
//! `next` until reaching or passing the target would have produced, and the
//! ids that follow are the same either way.

use std::fmt::Debug;

use crate::error::Result;

/// Returned once a posting iterator has no more documents.
pub const NO_MORE_DOCS: u64 = u64::MAX;

/// The current document of an iterator that has not been stepped yet.
///
/// Valid document ids are strictly below this value.
pub const NOT_STARTED: u64 = u64::MAX - 1;

/// Largest `max_doc` a segment may report.
///
/// Results are dense bit sets sized to `max_doc`, so ids must stay
/// addressable as a bit index on every target.
pub const MAX_DOCS: u64 = i32::MAX as u64;

/// Iterator over the document ids of a posting list.
///
/// Ids come out in strictly increasing order. The sequence is finite and not
/// restartable: once [`NO_MORE_DOCS`] is returned, every further call to
/// `next` or `advance` returns it again.
pub trait PostingIterator: Send + Debug {
    /// Current document id.
    ///
    /// [`NOT_STARTED`] before the first call to `next` or `advance`,
    /// [`NO_MORE_DOCS`] after exhaustion.
    fn doc_id(&self) -> u64;

    /// Move to the next document and return its id, or [`NO_MORE_DOCS`].
    fn next(&mut self) -> Result<u64>;

    /// Move to the first document at or beyond `target` and return its id,
    /// or [`NO_MORE_DOCS`].
    ///
    /// Always moves past the current document, so a target at or below the
    /// current id behaves like `next`.
    fn advance(&mut self, target: u64) -> Result<u64>;

    /// Estimated number of documents this iterator produces.
    fn cost(&self) -> u64;

    /// Whether the iterator has been exhausted.
    fn is_exhausted(&self) -> bool {
        self.doc_id() == NO_MORE_DOCS
    }
}

/// Reference `advance` built from `next` alone.
///
/// Implementations with a faster skip must behave exactly like this.
pub fn slow_advance<P: PostingIterator + ?Sized>(postings: &mut P, target: u64) -> Result<u64> {
    loop {
        let doc = postings.next()?;
        if doc >= target {
            return Ok(doc);
        }
    }
}

/// Drain the remaining ids of an iterator into a vector.
pub fn collect_doc_ids<P: PostingIterator + ?Sized>(postings: &mut P) -> Result<Vec<u64>> {
    let mut doc_ids = Vec::with_capacity(postings.cost() as usize);
    loop {
        let doc = postings.next()?;
        if doc == NO_MORE_DOCS {
            return Ok(doc_ids);
        }
        doc_ids.push(doc);
    }
}
