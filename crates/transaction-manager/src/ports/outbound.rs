//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the transaction manager requires from its host.
//!
//! - [`DataAccess`]: durable storage and topic index of persisted records.
//! - [`DecryptionProvider`]: unwraps per-recipient channel keys (re-exported
//!   from `shared-types`).
//! - [`TimeSource`]: clock used by storage adapters to stamp records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{ChannelId, PersistedTransaction, TimestampBoundaries, TimestampedTransaction};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

pub use shared_types::{DecryptionProvider, DecryptionProviderError};

/// Storage collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataAccessError {
    /// Backend unreachable or failing.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Request rejected by the backend.
    #[error("invalid storage request: {0}")]
    InvalidRequest(String),
}

/// Storage metadata of a persisted record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistMeta {
    /// Where the record was stored.
    pub storage_location: String,
    /// Topics the record was indexed under.
    pub topics: Vec<String>,
    /// Storage timestamp.
    pub timestamp: u64,
}

/// Result of [`DataAccess::persist_transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistResult {
    pub meta: PersistMeta,
}

/// Storage metadata of one channel read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMeta {
    /// Storage location of each returned record, index-aligned.
    pub transactions_storage_location: Vec<String>,
}

/// Records of one channel, in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTransactions {
    pub transactions: Vec<TimestampedTransaction>,
    pub meta: ChannelMeta,
}

/// Storage metadata of a multi-channel read, by channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsMeta {
    pub transactions_storage_location: BTreeMap<ChannelId, Vec<String>>,
}

impl ChannelsMeta {
    /// Keep only the given channels.
    pub fn retain_channels(&mut self, channel_ids: &[ChannelId]) {
        self.transactions_storage_location
            .retain(|id, _| channel_ids.contains(id));
    }

    /// Storage locations of one channel.
    pub fn locations(&self, channel_id: &str) -> &[String] {
        self.transactions_storage_location
            .get(channel_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Records of several channels, each in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelsByTopic {
    pub transactions: BTreeMap<ChannelId, Vec<TimestampedTransaction>>,
    pub meta: ChannelsMeta,
}

/// Durable storage of persisted records.
///
/// Implementations return channel records in append order. For topic
/// queries, `updated_between` selects channels that received a record in
/// the window; the selected channels come back with all their records.
#[async_trait]
pub trait DataAccess: Send + Sync {
    /// Append a record to a channel and index it under `topics`.
    async fn persist_transaction(
        &self,
        transaction: &PersistedTransaction,
        channel_id: &str,
        topics: &[String],
    ) -> Result<PersistResult, DataAccessError>;

    /// Records of one channel, optionally restricted to a time window.
    async fn get_transactions_by_channel_id(
        &self,
        channel_id: &str,
        timestamp_boundaries: Option<TimestampBoundaries>,
    ) -> Result<ChannelTransactions, DataAccessError>;

    /// Channels indexed under `topic`.
    async fn get_channels_by_topic(
        &self,
        topic: &str,
        updated_between: Option<TimestampBoundaries>,
    ) -> Result<ChannelsByTopic, DataAccessError>;

    /// Channels indexed under any of `topics`.
    async fn get_channels_by_multiple_topics(
        &self,
        topics: &[String],
        updated_between: Option<TimestampBoundaries>,
    ) -> Result<ChannelsByTopic, DataAccessError>;
}

#[async_trait]
impl<T: DataAccess + ?Sized> DataAccess for Arc<T> {
    async fn persist_transaction(
        &self,
        transaction: &PersistedTransaction,
        channel_id: &str,
        topics: &[String],
    ) -> Result<PersistResult, DataAccessError> {
        (**self)
            .persist_transaction(transaction, channel_id, topics)
            .await
    }

    async fn get_transactions_by_channel_id(
        &self,
        channel_id: &str,
        timestamp_boundaries: Option<TimestampBoundaries>,
    ) -> Result<ChannelTransactions, DataAccessError> {
        (**self)
            .get_transactions_by_channel_id(channel_id, timestamp_boundaries)
            .await
    }

    async fn get_channels_by_topic(
        &self,
        topic: &str,
        updated_between: Option<TimestampBoundaries>,
    ) -> Result<ChannelsByTopic, DataAccessError> {
        (**self).get_channels_by_topic(topic, updated_between).await
    }

    async fn get_channels_by_multiple_topics(
        &self,
        topics: &[String],
        updated_between: Option<TimestampBoundaries>,
    ) -> Result<ChannelsByTopic, DataAccessError> {
        (**self)
            .get_channels_by_multiple_topics(topics, updated_between)
            .await
    }
}

/// Abstract interface for time operations.
pub trait TimeSource: Send + Sync {
    /// Current timestamp (seconds since the Unix epoch).
    fn now(&self) -> u64;
}
