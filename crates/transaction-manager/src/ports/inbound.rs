//! # Inbound Ports (Driving Ports)
//!
//! The API the transaction manager offers to its callers.

use async_trait::async_trait;
use shared_types::{EncryptionParameters, TimestampBoundaries};

use crate::domain::entities::{ReturnGetChannels, ReturnGetTransactions, ReturnPersistTransaction};
use crate::domain::errors::TransactionManagerError;
use crate::domain::value_objects::Pagination;

/// Transaction manager API.
///
/// Reads never fail because of bad records already in storage; those come
/// back as ignored entries. Errors are reserved for caller misuse and
/// storage failures.
#[async_trait]
pub trait TransactionManagerApi: Send + Sync {
    /// Persist a clear record.
    async fn persist_transaction(
        &self,
        transaction_data: &str,
        channel_id: &str,
        topics: &[String],
    ) -> Result<ReturnPersistTransaction, TransactionManagerError>;

    /// Persist an encrypted record.
    ///
    /// Opens a new channel when `channel_id` is the hash of `transaction_data`
    /// (`recipients` required); otherwise appends to the existing channel
    /// with its recovered key (`recipients` must be empty).
    async fn persist_encrypted_transaction(
        &self,
        transaction_data: &str,
        channel_id: &str,
        recipients: &[EncryptionParameters],
        topics: &[String],
    ) -> Result<ReturnPersistTransaction, TransactionManagerError>;

    /// Cleaned records of one channel.
    async fn get_transactions_by_channel_id(
        &self,
        channel_id: &str,
        timestamp_boundaries: Option<TimestampBoundaries>,
    ) -> Result<ReturnGetTransactions, TransactionManagerError>;

    /// Cleaned channels indexed under `topic`.
    async fn get_channels_by_topic(
        &self,
        topic: &str,
        updated_between: Option<TimestampBoundaries>,
        pagination: Option<Pagination>,
    ) -> Result<ReturnGetChannels, TransactionManagerError>;

    /// Cleaned channels indexed under any of `topics`.
    async fn get_channels_by_multiple_topics(
        &self,
        topics: &[String],
        updated_between: Option<TimestampBoundaries>,
        pagination: Option<Pagination>,
    ) -> Result<ReturnGetChannels, TransactionManagerError>;
}
