//! Term set filters.

pub mod cache;
pub mod config;
pub mod terms_filter;
