//! # Termset
//!
//! Term set filters for full-text search.
//!
//! A term set filter matches every document of an index segment that
//! contains any of a (possibly large) set of exact terms. Instead of
//! expanding into a disjunctive query, the filter seeks each term in the
//! segment's term dictionary and drains its posting list straight into a bit
//! set.
//!
//! ## Features
//!
//! - Canonical, flattened term storage usable as a cache key
//! - Order- and duplicate-independent equality and hashing
//! - Multi-field and single-field construction
//! - Pluggable index access through the `SegmentReader`, `TermsEnum` and
//!   `PostingIterator` traits
//! - An in-memory segment implementation
//! - A bounded result cache

pub mod error;
pub mod lexical;
pub mod util;

// Re-exports for the public API
pub use error::{Result, TermsetError};
pub use lexical::{
    DocIdBitSet, DocIdSetCache, MemorySegment, MemorySegmentBuilder, Term, TermCorpus,
    TermsFilter, TermsFilterConfig,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
