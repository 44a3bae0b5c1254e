//! Term set filter.
//!
//! A [`TermsFilter`] matches every document that contains at least one of a
//! set of exact terms, possibly spread over several fields. It behaves like a
//! disjunction of term queries, but is evaluated by walking each field's term
//! dictionary and posting lists directly into a bit set, without scoring and
//! without building a query tree.
//!
//! The terms are held in a [`TermCorpus`], a canonical flattened encoding, so
//! two filters over the same set of terms compare equal and hash alike no
//! matter how the input was ordered or how many duplicates it contained.
//!
//! # Example
//!
//! ```
//! use termset::lexical::{MemorySegmentBuilder, Term, TermsFilter};
//!
//! let mut builder = MemorySegmentBuilder::new("seg-0");
//! builder.add_document(0, [("tag", "rust")])?;
//! builder.add_document(1, [("tag", "go")])?;
//! builder.add_document(2, [("tag", "zig")])?;
//! let segment = builder.build();
//!
//! let filter = TermsFilter::with_field("tag", ["zig", "rust", "rust"]);
//! let docs = filter.doc_id_set(&segment, None)?.expect("some documents match");
//! assert_eq!(docs.iter().collect::<Vec<_>>(), vec![0, 2]);
//!
//! let same = TermsFilter::new(&[Term::new("tag", "rust"), Term::new("tag", "zig")])?;
//! assert_eq!(filter, same);
//! assert_eq!(filter.to_string(), "tag:rust tag:zig");
//! # Ok::<(), termset::TermsetError>(())
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::Result;
use crate::lexical::core::term::FieldTerm;
use crate::lexical::index::inverted::core::bitset::{Bits, DocIdBitSet};
use crate::lexical::index::inverted::core::terms::SegmentReader;
use crate::lexical::query::config::TermsFilterConfig;
use crate::lexical::terms::builder::{build_from_field, build_from_terms};
use crate::lexical::terms::corpus::TermCorpus;
use crate::lexical::terms::materialize::materialize;

/// A filter matching documents that contain any of a set of terms.
#[derive(Debug, Clone)]
pub struct TermsFilter {
    /// Shared, immutable term set.
    corpus: Arc<TermCorpus>,
}

impl TermsFilter {
    /// Create a filter from terms that may belong to different fields.
    ///
    /// Fails with an invalid argument error if any term has no field.
    pub fn new<T: FieldTerm>(terms: &[T]) -> Result<Self> {
        Self::new_with_config(terms, &TermsFilterConfig::default())
    }

    /// Like [`TermsFilter::new`], with explicit configuration.
    pub fn new_with_config<T: FieldTerm>(terms: &[T], config: &TermsFilterConfig) -> Result<Self> {
        let corpus = build_from_terms(terms, config.initial_bytes_capacity)?;
        Ok(Self::from_corpus(corpus))
    }

    /// Create a filter from terms that all belong to `field`.
    pub fn with_field<I, B>(field: &str, terms: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        Self::with_field_and_config(field, terms, &TermsFilterConfig::default())
    }

    /// Like [`TermsFilter::with_field`], with explicit configuration.
    pub fn with_field_and_config<I, B>(field: &str, terms: I, config: &TermsFilterConfig) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let terms: Vec<B> = terms.into_iter().collect();
        Self::from_corpus(build_from_field(
            field,
            &terms,
            config.initial_bytes_capacity,
        ))
    }

    /// Wrap an already built corpus.
    pub fn from_corpus(corpus: TermCorpus) -> Self {
        TermsFilter {
            corpus: Arc::new(corpus),
        }
    }

    /// The filter's term set.
    pub fn corpus(&self) -> &Arc<TermCorpus> {
        &self.corpus
    }

    /// Number of unique terms.
    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    /// Whether the filter holds no terms and therefore matches nothing.
    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    /// Documents of `segment` matching the filter, restricted to
    /// `accept_docs` when given.
    ///
    /// Returns `None` when nothing matches.
    pub fn doc_id_set(
        &self,
        segment: &dyn SegmentReader,
        accept_docs: Option<&dyn Bits>,
    ) -> Result<Option<DocIdBitSet>> {
        materialize(&self.corpus, segment, accept_docs)
    }
}

impl PartialEq for TermsFilter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.corpus, &other.corpus) || self.corpus == other.corpus
    }
}

impl Eq for TermsFilter {}

impl Hash for TermsFilter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.corpus.hash(state);
    }
}

impl fmt::Display for TermsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.corpus, f)
    }
}
