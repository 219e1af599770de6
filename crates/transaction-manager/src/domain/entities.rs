//! # Domain Entities
//!
//! Results produced by the channel parser and returned by the manager.

use serde::{Deserialize, Serialize};
use shared_types::{
    ChannelId, ChannelKey, ChannelType, IgnoredTransaction, PersistedTransaction,
    TimestampedTransaction,
};
use std::collections::BTreeMap;

use crate::domain::value_objects::PaginationMeta;
use crate::ports::outbound::{ChannelMeta, ChannelsMeta, PersistMeta};

/// A channel after cleaning.
///
/// `transactions` and `ignored_transactions` have the length of the input
/// and, at every index, exactly one of them is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedChannel {
    /// Valid records, decrypted to `{data}`, with their original envelope.
    pub transactions: Vec<Option<TimestampedTransaction>>,
    /// Rejected records with the reason.
    pub ignored_transactions: Vec<Option<IgnoredTransaction>>,
    /// Channel encryption method, encrypted channels only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_method: Option<String>,
}

impl CleanedChannel {
    /// Whether the channel's first record survived cleaning.
    pub fn starts_with_valid_transaction(&self) -> bool {
        matches!(self.transactions.first(), Some(Some(_)))
    }

    /// Number of valid records.
    pub fn valid_count(&self) -> usize {
        self.transactions.iter().filter(|tx| tx.is_some()).count()
    }
}

/// Channel metadata inferred from its first valid record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTypeAndKey {
    pub channel_type: ChannelType,
    /// Recovered channel key. `None` for clear channels and for encrypted
    /// channels this reader cannot open.
    pub channel_key: Option<ChannelKey>,
    pub encryption_method: Option<String>,
}

/// Metadata of a persisted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistTransactionMeta {
    /// Storage collaborator's metadata, passed through.
    pub data_access_meta: PersistMeta,
    /// Channel encryption method, encrypted records only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_method: Option<String>,
    /// The record handed to storage.
    pub transaction_data: PersistedTransaction,
    /// Topics the record was indexed under.
    pub topics: Vec<String>,
}

/// Result of a persist call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnPersistTransaction {
    pub meta: PersistTransactionMeta,
}

/// Result of a single-channel read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnGetTransactions {
    pub transactions: Vec<Option<TimestampedTransaction>>,
    pub ignored_transactions: Vec<Option<IgnoredTransaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_method: Option<String>,
    pub data_access_meta: ChannelMeta,
}

/// Result of a multi-channel read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnGetChannels {
    /// Cleaned channels by id.
    pub channels: BTreeMap<ChannelId, CleanedChannel>,
    /// Ids of `channels`, most recently updated first.
    pub channel_ids: Vec<ChannelId>,
    /// Storage metadata restricted to the returned channels.
    pub data_access_meta: ChannelsMeta,
    /// Present when the read was paginated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}
