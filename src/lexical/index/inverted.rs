//! Inverted index access.
//!
//! - `core`: the term dictionary and posting iteration protocol, plus bit sets
//! - `memory`: an in-memory segment implementing the protocol
//! - `segment`: segment metadata

pub mod core;
pub mod memory;
pub mod segment;
