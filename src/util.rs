//! Shared utility modules used across termset components.

pub mod bytes_ref;
pub mod hash;
