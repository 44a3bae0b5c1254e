//! Memoization of materialized term filter results.
//!
//! Term filters over the same terms compare equal, so the result of
//! materializing one filter against a segment can be reused by every other
//! filter over that term set. [`DocIdSetCache`] keeps those results per
//! (segment cache key, term set).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::Result;
use crate::lexical::index::inverted::core::bitset::{Bits, DocIdBitSet};
use crate::lexical::index::inverted::core::terms::SegmentReader;
use crate::lexical::query::config::TermsFilterConfig;
use crate::lexical::query::terms_filter::TermsFilter;
use crate::lexical::terms::corpus::TermCorpus;

type CacheKey = (u64, Arc<TermCorpus>);

/// A cached result and the id of the segment it came from.
#[derive(Debug, Clone)]
struct CacheEntry {
    segment_id: String,
    doc_ids: Option<Arc<DocIdBitSet>>,
}

/// A bounded cache of materialized filter results.
///
/// Only evaluations without an accepted-docs mask are cached, since a mask
/// changes the result. When the cache is full it is cleared before the next
/// insertion.
#[derive(Debug)]
pub struct DocIdSetCache {
    /// Cached results; `None` records that nothing matched.
    entries: RwLock<AHashMap<CacheKey, CacheEntry>>,

    /// Maximum number of entries.
    max_entries: usize,

    /// Lookups answered from the cache.
    hits: AtomicU64,

    /// Lookups that had to materialize.
    misses: AtomicU64,
}

impl DocIdSetCache {
    /// Create an empty cache sized by `config`.
    pub fn new(config: &TermsFilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(DocIdSetCache {
            entries: RwLock::new(AHashMap::new()),
            max_entries: config.max_cached_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Return the cached result for `filter` on `segment`, materializing and
    /// caching it on a miss.
    pub fn get_or_materialize(
        &self,
        filter: &TermsFilter,
        segment: &dyn SegmentReader,
        accept_docs: Option<&dyn Bits>,
    ) -> Result<Option<Arc<DocIdBitSet>>> {
        if accept_docs.is_some() {
            return Ok(filter.doc_id_set(segment, accept_docs)?.map(Arc::new));
        }

        let key: CacheKey = (segment.cache_key(), Arc::clone(filter.corpus()));
        if let Some(cached) = self.entries.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(cached.doc_ids.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = filter.doc_id_set(segment, None)?.map(Arc::new);

        let mut entries = self.entries.write();
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            log::debug!(
                "doc id set cache full ({} entries), clearing",
                entries.len()
            );
            entries.clear();
        }
        entries.insert(
            key,
            CacheEntry {
                segment_id: segment.segment_id().to_string(),
                doc_ids: result.clone(),
            },
        );
        Ok(result)
    }

    /// Drop every entry of `segment_id`, e.g. after the segment was merged away.
    pub fn evict_segment(&self, segment_id: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.segment_id != segment_id);
        before - entries.len()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that materialized.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
