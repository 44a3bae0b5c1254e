//! Protocol types shared by every inverted index implementation.

pub mod bitset;
pub mod posting;
pub mod terms;
