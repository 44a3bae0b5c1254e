//! Core lexical data structures.

pub mod term;
