//! Flattened term sets.
//!
//! - `corpus`: the immutable [`TermCorpus`](corpus::TermCorpus)
//! - `builder`: sorting, deduplication and flattening of input terms
//! - `materialize`: evaluation of a corpus against a segment

pub mod builder;
pub mod corpus;
pub mod materialize;
