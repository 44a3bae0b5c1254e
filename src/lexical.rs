//! Lexical filtering over inverted indexes.
//!
//! This module provides term set filters: sets of exact (field, term) pairs
//! evaluated directly against an inverted index segment's term dictionaries
//! and posting lists to produce a document id bit set.
//!
//! # Module Structure
//!
//! - `core`: Core data structures (terms)
//! - `index`: Index access protocol (term dictionaries, postings, bit sets) and an in-memory segment
//! - `terms`: The flattened term corpus, its builder and the materializer
//! - `query`: The public filter, its configuration and result cache

pub mod core;
pub mod index;
pub mod query;
pub mod terms;

// Re-exports
pub use self::core::term::{FieldTerm, Term};
pub use index::inverted::core::bitset::{BitSetIterator, Bits, DocIdBitSet};
pub use index::inverted::core::posting::{MAX_DOCS, NO_MORE_DOCS, NOT_STARTED, PostingIterator};
pub use index::inverted::core::terms::{SegmentReader, TermsEnum};
pub use index::inverted::memory::{MemorySegment, MemorySegmentBuilder};
pub use index::inverted::segment::SegmentInfo;
pub use query::cache::DocIdSetCache;
pub use query::config::TermsFilterConfig;
pub use query::terms_filter::TermsFilter;
pub use terms::corpus::{FieldRange, TermCorpus};
