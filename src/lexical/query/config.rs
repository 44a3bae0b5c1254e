//! Configuration for term filters and their result cache.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TermsetError};

/// Configuration for building term filters and caching their results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsFilterConfig {
    /// Starting capacity, in bytes, of the buffer terms are flattened into.
    pub initial_bytes_capacity: usize,

    /// Maximum number of materialized results kept by a `DocIdSetCache`.
    pub max_cached_entries: usize,
}

impl Default for TermsFilterConfig {
    fn default() -> Self {
        TermsFilterConfig {
            initial_bytes_capacity: 64,
            max_cached_entries: 1024,
        }
    }
}

impl TermsFilterConfig {
    /// Parse a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TermsFilterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_cached_entries == 0 {
            return Err(TermsetError::invalid_config(
                "max_cached_entries must be greater than 0",
            ));
        }
        Ok(())
    }
}
