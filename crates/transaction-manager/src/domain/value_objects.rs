//! # Value Objects
//!
//! Pagination and manager configuration.

use serde::{Deserialize, Serialize};
use std::env;

use crate::domain::errors::TransactionManagerError;

/// Page request for multi-channel reads. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Pagination {
    /// Reject zero page or page size.
    pub fn new(page: usize, page_size: usize) -> Result<Self, TransactionManagerError> {
        let pagination = Self { page, page_size };
        pagination.validate()?;
        Ok(pagination)
    }

    pub fn validate(&self) -> Result<(), TransactionManagerError> {
        if self.page == 0 || self.page_size == 0 {
            return Err(TransactionManagerError::InvalidPagination);
        }
        Ok(())
    }

    /// Slice bounds of this page over `total` items.
    pub fn bounds(&self, total: usize) -> (usize, usize) {
        let start = self
            .page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(total);
        let end = start.saturating_add(self.page_size).min(total);
        (start, end)
    }

    /// Metadata describing this page over `total` items.
    pub fn meta(&self, total: usize) -> PaginationMeta {
        let (_, end) = self.bounds(total);
        PaginationMeta {
            total,
            page: self.page,
            page_size: self.page_size,
            has_more: end < total,
        }
    }
}

/// Pagination metadata returned with a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Channels eligible for pagination.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}

/// Transaction manager configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionManagerConfig {
    /// Clean the channels of a multi-channel read concurrently (default: false).
    ///
    /// Records inside a channel are always processed in order.
    pub parallel_channel_parsing: bool,

    /// Add the content hash of each persisted record to its topics (default: true).
    pub index_hash_topic: bool,
}

impl Default for TransactionManagerConfig {
    fn default() -> Self {
        Self {
            parallel_channel_parsing: false,
            index_hash_topic: true,
        }
    }
}

impl TransactionManagerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CL_PARALLEL_CHANNEL_PARSING`: Clean channels concurrently (default: false)
    /// - `CL_INDEX_HASH_TOPIC`: Index records under their hash (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            parallel_channel_parsing: env_flag(
                "CL_PARALLEL_CHANNEL_PARSING",
                defaults.parallel_channel_parsing,
            ),
            index_hash_topic: env_flag("CL_INDEX_HASH_TOPIC", defaults.index_hash_topic),
        }
    }

    /// Enable or disable concurrent channel cleaning.
    pub fn with_parallel_channel_parsing(mut self, parallel: bool) -> Self {
        self.parallel_channel_parsing = parallel;
        self
    }

    /// Enable or disable hash topic indexing.
    pub fn with_index_hash_topic(mut self, index: bool) -> Self {
        self.index_hash_topic = index;
        self
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| parse_flag(&v).unwrap_or(default))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
