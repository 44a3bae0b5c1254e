//! In-memory inverted index segment.
//!
//! [`MemorySegment`] is a complete, if simple, implementation of the term
//! dictionary and posting iteration protocol: each field keeps its terms in
//! sorted order next to their sorted posting lists. It backs small in-memory
//! indexes, tests, and benchmarks.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;

use crate::error::{Result, TermsetError};
use crate::lexical::index::inverted::core::bitset::Bits;
use crate::lexical::index::inverted::core::posting::{
    MAX_DOCS, NO_MORE_DOCS, NOT_STARTED, PostingIterator,
};
use crate::lexical::index::inverted::core::terms::{SegmentReader, TermsEnum};
use crate::lexical::index::inverted::segment::SegmentInfo;

/// Source of [`MemorySegment`] cache keys; every build takes a fresh one.
static NEXT_CACHE_KEY: AtomicU64 = AtomicU64::new(0);

/// Accumulates postings and freezes them into a [`MemorySegment`].
#[derive(Debug, Default)]
pub struct MemorySegmentBuilder {
    /// Segment identifier.
    segment_id: String,

    /// Explicit lower bound for `max_doc`.
    max_doc: u64,

    /// field -> term -> doc ids, in insertion order.
    postings: AHashMap<String, AHashMap<Vec<u8>, Vec<u64>>>,
}

impl MemorySegmentBuilder {
    /// Create a builder for the segment `segment_id`.
    pub fn new<S: Into<String>>(segment_id: S) -> Self {
        MemorySegmentBuilder {
            segment_id: segment_id.into(),
            max_doc: 0,
            postings: AHashMap::new(),
        }
    }

    /// Reserve a document id space of at least `max_doc` ids, even if the
    /// highest ids carry no postings.
    pub fn with_max_doc(mut self, max_doc: u64) -> Self {
        self.max_doc = max_doc;
        self
    }

    /// Record that `term` of `field` occurs in `doc_id`.
    ///
    /// Doc ids must be below [`MAX_DOCS`].
    pub fn add_posting<B: AsRef<[u8]>>(&mut self, field: &str, term: B, doc_id: u64) -> Result<()> {
        if doc_id >= MAX_DOCS {
            return Err(TermsetError::invalid_argument(format!(
                "document id {doc_id} exceeds the limit of {MAX_DOCS} documents"
            )));
        }

        self.postings
            .entry(field.to_string())
            .or_default()
            .entry(term.as_ref().to_vec())
            .or_default()
            .push(doc_id);
        Ok(())
    }

    /// Record every (field, term) pair of a document.
    pub fn add_document<I, F, B>(&mut self, doc_id: u64, terms: I) -> Result<()>
    where
        I: IntoIterator<Item = (F, B)>,
        F: AsRef<str>,
        B: AsRef<[u8]>,
    {
        for (field, term) in terms {
            self.add_posting(field.as_ref(), term, doc_id)?;
        }
        Ok(())
    }

    /// Sort dictionaries and posting lists and freeze the segment.
    pub fn build(self) -> MemorySegment {
        let mut max_doc = self.max_doc;
        let mut term_count = 0;
        let mut posting_count = 0;

        let mut fields = AHashMap::with_capacity(self.postings.len());
        for (field, terms) in self.postings {
            let mut entries: Vec<(Vec<u8>, Vec<u64>)> = terms.into_iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));

            let mut field_terms = Vec::with_capacity(entries.len());
            let mut field_postings = Vec::with_capacity(entries.len());
            for (term, mut doc_ids) in entries {
                doc_ids.sort_unstable();
                doc_ids.dedup();
                if let Some(&last) = doc_ids.last() {
                    max_doc = max_doc.max(last + 1);
                }
                posting_count += doc_ids.len() as u64;
                field_terms.push(term);
                field_postings.push(doc_ids);
            }

            term_count += field_terms.len();
            fields.insert(
                field,
                MemoryField {
                    terms: field_terms,
                    postings: field_postings,
                },
            );
        }

        let info = SegmentInfo {
            segment_id: self.segment_id,
            max_doc,
            field_count: fields.len(),
            term_count,
            posting_count,
        };

        log::debug!(
            "built memory segment {}: {} fields, {} terms, {} postings, max_doc {}",
            info.segment_id,
            info.field_count,
            info.term_count,
            info.posting_count,
            info.max_doc
        );

        MemorySegment {
            info,
            cache_key: NEXT_CACHE_KEY.fetch_add(1, Ordering::Relaxed),
            fields,
        }
    }
}

/// Term dictionary and postings of a single field.
#[derive(Debug, Clone)]
pub struct MemoryField {
    /// Sorted, unique terms.
    terms: Vec<Vec<u8>>,

    /// Sorted, unique doc ids, parallel to `terms`.
    postings: Vec<Vec<u64>>,
}

impl MemoryField {
    /// Number of terms in the field.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}

/// An immutable in-memory segment.
#[derive(Debug, Clone)]
pub struct MemorySegment {
    info: SegmentInfo,
    cache_key: u64,
    fields: AHashMap<String, MemoryField>,
}

impl MemorySegment {
    /// Segment metadata.
    pub fn info(&self) -> &SegmentInfo {
        &self.info
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&MemoryField> {
        self.fields.get(name)
    }
}

impl SegmentReader for MemorySegment {
    fn segment_id(&self) -> &str {
        &self.info.segment_id
    }

    fn cache_key(&self) -> u64 {
        self.cache_key
    }

    fn max_doc(&self) -> u64 {
        self.info.max_doc
    }

    fn terms<'a>(&'a self, field: &str) -> Result<Option<Box<dyn TermsEnum + 'a>>> {
        Ok(self.fields.get(field).map(|field| {
            Box::new(MemoryTermsEnum {
                field,
                current: None,
            }) as Box<dyn TermsEnum + 'a>
        }))
    }
}

/// Exact-seek cursor over a [`MemoryField`].
#[derive(Debug)]
pub struct MemoryTermsEnum<'a> {
    field: &'a MemoryField,
    current: Option<usize>,
}

impl TermsEnum for MemoryTermsEnum<'_> {
    fn seek_exact(&mut self, term: &[u8]) -> Result<bool> {
        self.current = self
            .field
            .terms
            .binary_search_by(|candidate| candidate.as_slice().cmp(term))
            .ok();
        Ok(self.current.is_some())
    }

    fn term(&self) -> Option<&[u8]> {
        self.current.map(|ord| self.field.terms[ord].as_slice())
    }

    fn postings<'a>(
        &'a mut self,
        accept_docs: Option<&'a dyn Bits>,
    ) -> Result<Box<dyn PostingIterator + 'a>> {
        let ord = self
            .current
            .ok_or_else(|| TermsetError::index("postings requested on an unpositioned terms enum"))?;
        Ok(Box::new(SlicePostingIterator::new(
            &self.field.postings[ord],
            accept_docs,
        )))
    }
}

/// Posting iterator over a sorted slice of doc ids.
#[derive(Debug)]
pub struct SlicePostingIterator<'a> {
    /// Sorted, unique doc ids.
    doc_ids: &'a [u64],

    /// Documents not accepted here are skipped.
    accept_docs: Option<&'a dyn Bits>,

    /// Index of the next candidate in `doc_ids`.
    position: usize,

    /// Current document.
    doc: u64,
}

impl<'a> SlicePostingIterator<'a> {
    /// Create an iterator over `doc_ids`, which must be sorted and unique.
    pub fn new(doc_ids: &'a [u64], accept_docs: Option<&'a dyn Bits>) -> Self {
        debug_assert!(doc_ids.windows(2).all(|w| w[0] < w[1]));
        SlicePostingIterator {
            doc_ids,
            accept_docs,
            position: 0,
            doc: NOT_STARTED,
        }
    }

    /// Step to the first accepted doc id at or after `position`.
    fn next_accepted(&mut self) -> u64 {
        while let Some(&doc) = self.doc_ids.get(self.position) {
            self.position += 1;
            if self.accept_docs.is_none_or(|bits| bits.get(doc)) {
                self.doc = doc;
                return doc;
            }
        }
        self.doc = NO_MORE_DOCS;
        NO_MORE_DOCS
    }
}

impl PostingIterator for SlicePostingIterator<'_> {
    fn doc_id(&self) -> u64 {
        self.doc
    }

    fn next(&mut self) -> Result<u64> {
        if self.doc == NO_MORE_DOCS {
            return Ok(NO_MORE_DOCS);
        }
        Ok(self.next_accepted())
    }

    fn advance(&mut self, target: u64) -> Result<u64> {
        if self.doc == NO_MORE_DOCS {
            return Ok(NO_MORE_DOCS);
        }
        let remaining = &self.doc_ids[self.position..];
        self.position += remaining.partition_point(|&doc| doc < target);
        Ok(self.next_accepted())
    }

    fn cost(&self) -> u64 {
        self.doc_ids.len() as u64
    }
}
