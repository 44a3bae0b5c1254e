//! Index access for lexical filters.

pub mod inverted;
