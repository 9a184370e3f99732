//! Search configuration.
//!
//! Type-raising applies to any category and never shrinks it, so the
//! rewrite-queue search has no natural end. The bounds below cut the
//! search space; a stream that ends after any of them fired reports it via
//! [`Parse::is_truncated`](crate::search::Parse::is_truncated).

use crate::error::CcgError;
use serde::{Deserialize, Serialize};

/// Default bound on rule applications per derivation.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Default bound on pending candidates.
pub const DEFAULT_MAX_QUEUE_LEN: usize = 1 << 20;

/// Why a successor was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Truncation {
    /// Derivation already used `max_depth` rule applications.
    Depth,
    /// A category grew past `max_category_size`.
    CategorySize,
    /// The queue already held `max_queue_len` candidates.
    QueueFull,
    /// Every variable token has been issued.
    Variables,
}

/// Bounds for the rewrite-queue search.
///
/// `None` disables a bound. [`SearchConfig::unbounded`] disables all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of rule applications in a derivation
    pub max_depth: Option<usize>,
    /// Maximum number of candidates waiting in the queue
    pub max_queue_len: Option<usize>,
    /// Maximum `count` of any category in a candidate
    pub max_category_size: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            max_queue_len: Some(DEFAULT_MAX_QUEUE_LEN),
            max_category_size: None,
        }
    }
}

impl SearchConfig {
    /// Exhaustive search with no bounds at all.
    pub fn unbounded() -> Self {
        Self {
            max_depth: None,
            max_queue_len: None,
            max_category_size: None,
        }
    }

    /// Set maximum derivation depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set maximum queue length.
    pub fn with_max_queue_len(mut self, len: usize) -> Self {
        self.max_queue_len = Some(len);
        self
    }

    /// Set maximum category size.
    pub fn with_max_category_size(mut self, size: usize) -> Self {
        self.max_category_size = Some(size);
        self
    }

    /// Check whether the search space is finite under this configuration.
    ///
    /// Only a depth bound guarantees that the stream ends.
    pub fn terminates(&self) -> bool {
        self.max_depth.is_some()
    }

    /// Read a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CcgError> {
        serde_json::from_str(json).map_err(|e| CcgError::Config {
            message: e.to_string(),
        })
    }

    /// Render the configuration as JSON.
    pub fn to_json(&self) -> Result<String, CcgError> {
        serde_json::to_string(self).map_err(|e| CcgError::Config {
            message: e.to_string(),
        })
    }
}
