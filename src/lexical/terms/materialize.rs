//! Turning a term corpus into a document id set for one segment.

use crate::error::{Result, TermsetError};
use crate::lexical::index::inverted::core::bitset::{Bits, DocIdBitSet};
use crate::lexical::index::inverted::core::posting::NO_MORE_DOCS;
use crate::lexical::index::inverted::core::terms::SegmentReader;
use crate::lexical::terms::corpus::TermCorpus;
use crate::util::bytes_ref::BytesRef;

/// Compute the documents of `segment` containing any term of `corpus`.
///
/// Fields the segment does not have and terms missing from a field's
/// dictionary contribute nothing. Documents rejected by `accept_docs` are
/// filtered out by the segment's posting iterators. Returns `None` when no
/// document matches; the bit set is only allocated once a first document is
/// found. Errors from the segment are returned unchanged.
pub fn materialize(
    corpus: &TermCorpus,
    segment: &dyn SegmentReader,
    accept_docs: Option<&dyn Bits>,
) -> Result<Option<DocIdBitSet>> {
    let max_doc = segment.max_doc();
    let offsets = corpus.offsets();
    let mut spare = BytesRef::empty(corpus.terms_bytes());
    let mut result: Option<DocIdBitSet> = None;
    let mut terms_found = 0usize;

    for range in corpus.field_ranges() {
        if range.is_empty() {
            continue;
        }
        let Some(mut terms) = segment.terms(range.field())? else {
            log::trace!(
                "segment {} has no field {}, skipping {} terms",
                segment.segment_id(),
                range.field(),
                range.len()
            );
            continue;
        };

        for index in range.start()..range.end() {
            spare.reposition(offsets[index], offsets[index + 1] - offsets[index]);
            if !terms.seek_exact(spare.as_slice())? {
                continue;
            }
            terms_found += 1;

            let mut postings = terms.postings(accept_docs)?;
            loop {
                let doc = postings.next()?;
                if doc == NO_MORE_DOCS {
                    break;
                }
                if doc >= max_doc {
                    return Err(TermsetError::index(format!(
                        "document id {doc} out of range for segment {} with max_doc {max_doc}",
                        segment.segment_id()
                    )));
                }
                match result.as_mut() {
                    Some(bits) => bits.set(doc),
                    None => {
                        let mut bits = DocIdBitSet::new(max_doc)?;
                        bits.set(doc);
                        result = Some(bits);
                    }
                }
            }
        }
    }

    log::debug!(
        "materialized {} terms against segment {}: {} found, {}",
        corpus.len(),
        segment.segment_id(),
        terms_found,
        match &result {
            Some(bits) => format!("{} documents", bits.cardinality()),
            None => "no match".to_string(),
        }
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bit_vec::BitVec;

    use super::*;
    use crate::lexical::core::term::Term;
    use crate::lexical::index::inverted::core::posting::PostingIterator;
    use crate::lexical::index::inverted::core::terms::TermsEnum;
    use crate::lexical::index::inverted::memory::{MemorySegment, MemorySegmentBuilder};
    use crate::lexical::terms::builder::{build_from_field, build_from_terms};

    fn segment() -> MemorySegment {
        let mut builder = MemorySegmentBuilder::new("seg").with_max_doc(8);
        for doc in [1, 3, 5] {
            builder.add_posting("field", "a", doc).unwrap();
        }
        for doc in [2, 4] {
            builder.add_posting("field", "b", doc).unwrap();
        }
        builder.add_posting("title", "a", 7).unwrap();
        builder.build()
    }

    fn doc_ids(result: Option<DocIdBitSet>) -> Vec<u64> {
        result.map(|bits| bits.iter().collect()).unwrap_or_default()
    }

    #[test]
    fn test_union_of_postings() {
        let corpus = build_from_field("field", &["a", "b", "a"], 0);
        let result = materialize(&corpus, &segment(), None).unwrap();
        let bits = result.unwrap();
        assert_eq!(bits.len(), 8);
        assert_eq!(bits.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_fields_do_not_mix() {
        let corpus = build_from_terms(&[Term::new("title", "a"), Term::new("title", "b")], 0).unwrap();
        assert_eq!(doc_ids(materialize(&corpus, &segment(), None).unwrap()), vec![7]);
    }

    #[test]
    fn test_accept_docs_applied() {
        let corpus = build_from_field("field", &["a", "b"], 0);
        let mut accepted = BitVec::from_elem(8, true);
        accepted.set(3, false);
        accepted.set(4, false);
        let result = materialize(&corpus, &segment(), Some(&accepted)).unwrap();
        assert_eq!(doc_ids(result), vec![1, 2, 5]);
    }

    #[test]
    fn test_no_match_is_none() {
        let corpus = build_from_field("field", &["zzz"], 0);
        assert!(materialize(&corpus, &segment(), None).unwrap().is_none());

        let corpus = build_from_field("missing", &["a"], 0);
        assert!(materialize(&corpus, &segment(), None).unwrap().is_none());

        let corpus = build_from_field::<&str>("field", &[], 0);
        assert!(materialize(&corpus, &segment(), None).unwrap().is_none());
    }

    #[test]
    fn test_all_rejected_is_none() {
        let corpus = build_from_field("field", &["a"], 0);
        let rejected = BitVec::from_elem(8, false);
        assert!(
            materialize(&corpus, &segment(), Some(&rejected))
                .unwrap()
                .is_none()
        );
    }

    #[derive(Debug)]
    struct FailingSegment;

    #[derive(Debug)]
    struct FailingTerms;

    impl TermsEnum for FailingTerms {
        fn seek_exact(&mut self, _term: &[u8]) -> Result<bool> {
            Err(TermsetError::Io(std::io::Error::other("disk gone")))
        }

        fn term(&self) -> Option<&[u8]> {
            None
        }

        fn postings<'a>(
            &'a mut self,
            _accept_docs: Option<&'a dyn Bits>,
        ) -> Result<Box<dyn PostingIterator + 'a>> {
            Err(TermsetError::index("unreachable"))
        }
    }

    impl SegmentReader for FailingSegment {
        fn segment_id(&self) -> &str {
            "failing"
        }

        fn cache_key(&self) -> u64 {
            u64::MAX
        }

        fn max_doc(&self) -> u64 {
            10
        }

        fn terms<'a>(&'a self, _field: &str) -> Result<Option<Box<dyn TermsEnum + 'a>>> {
            Ok(Some(Box::new(FailingTerms)))
        }
    }

    #[test]
    fn test_index_errors_propagate() {
        let corpus = build_from_field("field", &["a"], 0);
        match materialize(&corpus, &FailingSegment, None) {
            Err(TermsetError::Io(e)) => assert_eq!(e.to_string(), "disk gone"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_corpus_never_touches_segment() {
        let corpus = build_from_field::<&str>("field", &[], 0);
        assert!(materialize(&corpus, &FailingSegment, None).unwrap().is_none());
    }

    #[test]
    fn test_unaddressable_max_doc_is_an_error() {
        let mut builder = MemorySegmentBuilder::new("huge").with_max_doc(1 << 62);
        builder.add_posting("field", "a", 3).unwrap();
        let segment = builder.build();

        let corpus = build_from_field("field", &["a"], 0);
        assert!(matches!(
            materialize(&corpus, &segment, None),
            Err(TermsetError::Index(_))
        ));

        // Nothing is allocated when nothing matches.
        let corpus = build_from_field("field", &["zzz"], 0);
        assert!(materialize(&corpus, &segment, None).unwrap().is_none());
    }

    #[derive(Debug, Default)]
    struct Counters {
        seeks: AtomicUsize,
        nexts: AtomicUsize,
    }

    #[derive(Debug)]
    struct CountingSegment {
        inner: MemorySegment,
        counters: Counters,
    }

    #[derive(Debug)]
    struct CountingTerms<'a> {
        inner: Box<dyn TermsEnum + 'a>,
        counters: &'a Counters,
    }

    #[derive(Debug)]
    struct CountingPostings<'a> {
        inner: Box<dyn PostingIterator + 'a>,
        counters: &'a Counters,
    }

    impl SegmentReader for CountingSegment {
        fn segment_id(&self) -> &str {
            self.inner.segment_id()
        }

        fn cache_key(&self) -> u64 {
            self.inner.cache_key()
        }

        fn max_doc(&self) -> u64 {
            self.inner.max_doc()
        }

        fn terms<'a>(&'a self, field: &str) -> Result<Option<Box<dyn TermsEnum + 'a>>> {
            Ok(self.inner.terms(field)?.map(|inner| {
                Box::new(CountingTerms {
                    inner,
                    counters: &self.counters,
                }) as Box<dyn TermsEnum + 'a>
            }))
        }
    }

    impl TermsEnum for CountingTerms<'_> {
        fn seek_exact(&mut self, term: &[u8]) -> Result<bool> {
            self.counters.seeks.fetch_add(1, Ordering::Relaxed);
            self.inner.seek_exact(term)
        }

        fn term(&self) -> Option<&[u8]> {
            self.inner.term()
        }

        fn postings<'b>(
            &'b mut self,
            accept_docs: Option<&'b dyn Bits>,
        ) -> Result<Box<dyn PostingIterator + 'b>> {
            let counters = self.counters;
            let inner = self.inner.postings(accept_docs)?;
            Ok(Box::new(CountingPostings { inner, counters }))
        }
    }

    impl PostingIterator for CountingPostings<'_> {
        fn doc_id(&self) -> u64 {
            self.inner.doc_id()
        }

        fn next(&mut self) -> Result<u64> {
            self.counters.nexts.fetch_add(1, Ordering::Relaxed);
            self.inner.next()
        }

        fn advance(&mut self, target: u64) -> Result<u64> {
            self.inner.advance(target)
        }

        fn cost(&self) -> u64 {
            self.inner.cost()
        }
    }

    #[test]
    fn test_each_term_sought_and_drained_once() {
        let mut terms = Vec::new();
        for _ in 0..5 {
            terms.push(Term::new("field", "a"));
            terms.push(Term::new("missing", "a"));
        }
        for _ in 0..3 {
            terms.push(Term::new("field", "b"));
            terms.push(Term::new("field", "zzz"));
            terms.push(Term::new("title", "a"));
        }
        let corpus = build_from_terms(&terms, 0).unwrap();
        assert_eq!(corpus.len(), 5);

        let segment = CountingSegment {
            inner: segment(),
            counters: Counters::default(),
        };
        let result = materialize(&corpus, &segment, None).unwrap();
        assert_eq!(doc_ids(result), vec![1, 2, 3, 4, 5, 7]);

        // field:a, field:b, field:zzz and title:a; the absent field is never sought.
        assert_eq!(segment.counters.seeks.load(Ordering::Relaxed), 4);
        // Each found term is drained once: its postings plus the final NO_MORE_DOCS.
        assert_eq!(
            segment.counters.nexts.load(Ordering::Relaxed),
            (3 + 1) + (2 + 1) + (1 + 1)
        );
    }
}
