//! Segment metadata.

use serde::{Deserialize, Serialize};

/// Information about a segment in the inverted index.
///
/// This structure describes an individual segment: its identity, the size of
/// its document id space and how much it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentInfo {
    /// Segment identifier.
    pub segment_id: String,

    /// One past the highest document id in this segment.
    pub max_doc: u64,

    /// Number of indexed fields.
    pub field_count: usize,

    /// Number of distinct terms across all fields.
    pub term_count: usize,

    /// Total number of postings across all terms.
    pub posting_count: u64,
}
