//! Term corpus construction.
//!
//! Building is split in two: a [`SortedTermSource`] produces (field, term)
//! pairs in sorted order, and [`TermCorpusBuilder`] consumes them in a single
//! pass, dropping duplicates, opening a new [`FieldRange`] at every field
//! boundary and appending each unique term to a flat buffer.

use crate::error::{Result, TermsetError};
use crate::lexical::core::term::FieldTerm;
use crate::lexical::terms::corpus::{FieldRange, TermCorpus};
use crate::util::hash::{fold, hash_bytes, hash_str};

/// A finite, non-restartable producer of (field, term) pairs in sorted order.
///
/// Pairs must come out ordered by field, then by term bytes. Duplicates are
/// allowed; the builder drops them.
pub trait SortedTermSource {
    /// Next pair, or `None` once the source is exhausted.
    fn next_term(&mut self) -> Option<(&str, &[u8])>;

    /// Number of pairs left, counting duplicates.
    fn remaining(&self) -> usize;
}

/// Sorted view over pairs that may each carry a different field.
#[derive(Debug)]
pub struct SortedPairs<'a> {
    pairs: Vec<(&'a str, &'a [u8])>,
    position: usize,
}

impl<'a> SortedPairs<'a> {
    /// Sort `pairs` by field, then bytes.
    pub fn new(mut pairs: Vec<(&'a str, &'a [u8])>) -> Self {
        pairs.sort_unstable();
        SortedPairs { pairs, position: 0 }
    }
}

impl SortedTermSource for SortedPairs<'_> {
    fn next_term(&mut self) -> Option<(&str, &[u8])> {
        let pair = self.pairs.get(self.position).copied()?;
        self.position += 1;
        Some(pair)
    }

    fn remaining(&self) -> usize {
        self.pairs.len() - self.position
    }
}

/// Sorted view over terms that all share one field.
///
/// Sorting compares bytes only and the field is stored once.
#[derive(Debug)]
pub struct SortedFieldTerms<'a> {
    field: &'a str,
    terms: Vec<&'a [u8]>,
    position: usize,
}

impl<'a> SortedFieldTerms<'a> {
    /// Sort `terms` byte-lexicographically.
    pub fn new(field: &'a str, mut terms: Vec<&'a [u8]>) -> Self {
        terms.sort_unstable();
        SortedFieldTerms {
            field,
            terms,
            position: 0,
        }
    }
}

impl SortedTermSource for SortedFieldTerms<'_> {
    fn next_term(&mut self) -> Option<(&str, &[u8])> {
        let term = self.terms.get(self.position).copied()?;
        self.position += 1;
        Some((self.field, term))
    }

    fn remaining(&self) -> usize {
        self.terms.len() - self.position
    }
}

/// Consumes sorted (field, term) pairs into a [`TermCorpus`].
#[derive(Debug)]
pub struct TermCorpusBuilder {
    /// Unique term bytes so far; grows by doubling.
    bytes: Vec<u8>,

    /// Start offset of every unique term, then the running end offset.
    offsets: Vec<usize>,

    /// Closed field runs.
    field_ranges: Vec<FieldRange>,

    /// Field of the open run.
    current_field: Option<String>,

    /// First term index of the open run.
    range_start: usize,

    /// Running corpus hash.
    hash: u64,
}

impl TermCorpusBuilder {
    /// Create a builder whose byte buffer starts with `initial_bytes_capacity`.
    pub fn with_capacity(initial_bytes_capacity: usize) -> Self {
        TermCorpusBuilder {
            bytes: Vec::with_capacity(initial_bytes_capacity),
            offsets: vec![0],
            field_ranges: Vec::new(),
            current_field: None,
            range_start: 0,
            hash: 0,
        }
    }

    /// Number of unique terms added so far.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether no term has been added yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add the next pair in sorted order.
    ///
    /// Returns `false` when the pair repeats the previous one and was dropped.
    pub fn add(&mut self, field: &str, term: &[u8]) -> bool {
        let count = self.len();

        if self.current_field.as_deref() == Some(field) {
            if count > self.range_start {
                let previous = &self.bytes[self.offsets[count - 1]..self.offsets[count]];
                if previous == term {
                    return false;
                }
                debug_assert!(previous < term, "terms must arrive in sorted order");
            }
        } else {
            debug_assert!(
                self.current_field.as_deref().is_none_or(|current| current < field),
                "fields must arrive in sorted order"
            );
            if let Some(previous) = self.current_field.take() {
                self.field_ranges
                    .push(FieldRange::new(previous, self.range_start, count));
            }
            self.current_field = Some(field.to_string());
            self.range_start = count;
        }

        self.grow(term.len());
        self.bytes.extend_from_slice(term);
        self.offsets.push(self.bytes.len());
        self.hash = fold(fold(self.hash, hash_str(field)), hash_bytes(term));
        true
    }

    /// Make room for `additional` bytes, at least doubling the buffer.
    fn grow(&mut self, additional: usize) {
        let needed = self.bytes.len() + additional;
        if needed > self.bytes.capacity() {
            let target = needed.max(self.bytes.capacity() * 2);
            self.bytes.reserve_exact(target - self.bytes.len());
        }
    }

    /// Close the open run and freeze the corpus, releasing unused capacity.
    pub fn finish(mut self) -> TermCorpus {
        let count = self.len();
        let field = self.current_field.take().unwrap_or_default();
        self.field_ranges
            .push(FieldRange::new(field, self.range_start, count));
        self.field_ranges.shrink_to_fit();

        TermCorpus::from_parts(
            self.bytes.into_boxed_slice(),
            self.offsets.into_boxed_slice(),
            self.field_ranges,
            self.hash,
        )
    }

    /// Drain `source` into a new corpus.
    pub fn build<S: SortedTermSource>(mut source: S, initial_bytes_capacity: usize) -> TermCorpus {
        let input = source.remaining();
        let mut builder = TermCorpusBuilder::with_capacity(initial_bytes_capacity);
        builder.offsets.reserve(input);
        while let Some((field, term)) = source.next_term() {
            builder.add(field, term);
        }

        log::trace!(
            "built term corpus: {} unique of {} input terms, {} bytes",
            builder.len(),
            input,
            builder.bytes.len()
        );
        builder.finish()
    }
}

impl Default for TermCorpusBuilder {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

/// Build a corpus from terms that may each carry a different field.
///
/// Fails with an invalid argument error, producing nothing, if any term has
/// no field.
pub fn build_from_terms<T: FieldTerm>(terms: &[T], initial_bytes_capacity: usize) -> Result<TermCorpus> {
    let mut pairs = Vec::with_capacity(terms.len());
    for (position, term) in terms.iter().enumerate() {
        let field = term.field().ok_or_else(|| {
            TermsetError::invalid_argument(format!("term at position {position} has no field"))
        })?;
        pairs.push((field, term.bytes()));
    }
    Ok(TermCorpusBuilder::build(
        SortedPairs::new(pairs),
        initial_bytes_capacity,
    ))
}

/// Build a corpus from terms that all belong to `field`.
pub fn build_from_field<B: AsRef<[u8]>>(
    field: &str,
    terms: &[B],
    initial_bytes_capacity: usize,
) -> TermCorpus {
    let terms: Vec<&[u8]> = terms.iter().map(AsRef::as_ref).collect();
    TermCorpusBuilder::build(SortedFieldTerms::new(field, terms), initial_bytes_capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::core::term::Term;

    fn decoded(corpus: &TermCorpus) -> Vec<(String, Vec<u8>)> {
        corpus
            .iter()
            .map(|(field, term)| (field.to_string(), term.to_vec()))
            .collect()
    }

    #[test]
    fn test_dedup_and_single_range() {
        let terms = vec![
            Term::new("field", "a"),
            Term::new("field", "b"),
            Term::new("field", "a"),
        ];
        let corpus = build_from_terms(&terms, 0).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.field_ranges().len(), 1);
        let range = &corpus.field_ranges()[0];
        assert_eq!((range.field(), range.start(), range.end()), ("field", 0, 2));
        assert_eq!(corpus.terms_bytes(), b"ab");
        assert_eq!(corpus.offsets(), &[0, 1, 2]);
    }

    #[test]
    fn test_multiple_fields_sorted() {
        let terms = vec![
            Term::new("title", "rust"),
            Term::new("body", "zebra"),
            Term::new("title", "go"),
            Term::new("body", "apple"),
            Term::new("tags", "x"),
        ];
        let corpus = build_from_terms(&terms, 4).unwrap();

        let ranges: Vec<(&str, usize, usize)> = corpus
            .field_ranges()
            .iter()
            .map(|r| (r.field(), r.start(), r.end()))
            .collect();
        assert_eq!(ranges, vec![("body", 0, 2), ("tags", 2, 3), ("title", 3, 5)]);
        assert_eq!(
            corpus.to_string(),
            "body:apple body:zebra tags:x title:go title:rust"
        );
    }

    #[test]
    fn test_same_bytes_in_different_fields_kept() {
        let terms = vec![Term::new("a", "x"), Term::new("b", "x"), Term::new("a", "x")];
        let corpus = build_from_terms(&terms, 0).unwrap();
        assert_eq!(
            decoded(&corpus),
            vec![
                ("a".to_string(), b"x".to_vec()),
                ("b".to_string(), b"x".to_vec())
            ]
        );
    }

    #[test]
    fn test_missing_field_rejected() {
        let terms: Vec<(Option<&str>, &[u8])> =
            vec![(Some("title"), &b"a"[..]), (None, &b"b"[..])];
        let err = build_from_terms(&terms, 0).unwrap_err();
        assert!(matches!(err, TermsetError::InvalidArgument(_)));
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn test_empty_input() {
        let terms: Vec<Term> = Vec::new();
        let corpus = build_from_terms(&terms, 16).unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.offsets(), &[0]);
        assert_eq!(corpus.field_ranges().len(), 1);
        assert!(corpus.field_ranges()[0].is_empty());
        assert_eq!(corpus.field_ranges()[0].field(), "");
        assert_eq!(corpus.terms_bytes().len(), 0);
    }

    #[test]
    fn test_single_field_matches_multi_field() {
        let single = build_from_field("f", &["c", "a", "b", "a"], 0);
        let multi = build_from_terms(
            &[
                Term::new("f", "a"),
                Term::new("f", "b"),
                Term::new("f", "c"),
            ],
            0,
        )
        .unwrap();
        assert_eq!(single, multi);
        assert_eq!(single.hash_code(), multi.hash_code());
    }

    #[test]
    fn test_buffer_is_exact() {
        let terms: Vec<Vec<u8>> = (0..100u32).map(|i| format!("term{i:03}").into_bytes()).collect();
        let corpus = build_from_field("f", &terms, 1);
        assert_eq!(corpus.terms_bytes().len(), 700);
        assert_eq!(*corpus.offsets().last().unwrap(), 700);
        assert_eq!(corpus.term(42), b"term042");
    }

    #[test]
    fn test_empty_term_bytes() {
        let corpus = build_from_field("f", &["", "a", ""], 0);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.term(0), b"");
        assert_eq!(corpus.term(1), b"a");
    }

    #[test]
    fn test_builder_add_reports_duplicates() {
        let mut builder = TermCorpusBuilder::default();
        assert!(builder.add("f", b"a"));
        assert!(!builder.add("f", b"a"));
        assert!(builder.add("f", b"b"));
        assert!(builder.add("g", b"b"));
        assert_eq!(builder.len(), 3);
        let corpus = builder.finish();
        assert_eq!(corpus.field_ranges().len(), 2);
    }

    #[test]
    fn test_source_remaining() {
        let mut source = SortedFieldTerms::new("f", vec![b"b".as_slice(), b"a".as_slice()]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_term(), Some(("f", &b"a"[..])));
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.next_term(), Some(("f", &b"b"[..])));
        assert_eq!(source.next_term(), None);
        assert_eq!(source.next_term(), None);
    }
}
