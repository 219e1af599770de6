//! # Transaction Manager Service
//!
//! The application service implementing [`TransactionManagerApi`].
//!
//! ## Architecture
//!
//! This service:
//! 1. Builds records through the [`TransactionsFactory`](crate::domain::TransactionsFactory)
//! 2. Hands them to the [`DataAccess`] collaborator with their topics
//! 3. Cleans every channel it reads through the [`ChannelParser`]
//! 4. Never fails a read because of a bad stored record

pub mod channel_parser;
pub mod transactions_parser;

mod persist;
mod read;

use async_trait::async_trait;
use shared_types::{EncryptionParameters, TimestampBoundaries};
use std::sync::Arc;

use crate::domain::entities::{ReturnGetChannels, ReturnGetTransactions, ReturnPersistTransaction};
use crate::domain::errors::TransactionManagerError;
use crate::domain::value_objects::{Pagination, TransactionManagerConfig};
use crate::ports::inbound::TransactionManagerApi;
use crate::ports::outbound::{DataAccess, DecryptionProvider};

pub use channel_parser::ChannelParser;
pub use transactions_parser::{ParsedTransaction, TransactionsParser};

/// The Transaction Manager Service.
pub struct TransactionManager<D: DataAccess> {
    /// Storage and topic index.
    pub(crate) data_access: D,
    /// Channel cleaning, holding the optional decryption provider.
    pub(crate) channel_parser: ChannelParser,
    /// Service configuration.
    pub(crate) config: TransactionManagerConfig,
}

impl<D: DataAccess> TransactionManager<D> {
    /// Create a manager over `data_access`.
    ///
    /// Without a decryption provider the manager can still write encrypted
    /// records to new channels, but cannot read or extend encrypted channels.
    pub fn new(
        data_access: D,
        decryption_provider: Option<Arc<dyn DecryptionProvider>>,
        config: TransactionManagerConfig,
    ) -> Self {
        tracing::info!(
            "[tx-manager] Initialized (decryption provider: {}, parallel parsing: {})",
            decryption_provider.is_some(),
            config.parallel_channel_parsing
        );
        Self {
            data_access,
            channel_parser: ChannelParser::new(decryption_provider),
            config,
        }
    }

    pub fn data_access(&self) -> &D {
        &self.data_access
    }

    pub fn config(&self) -> &TransactionManagerConfig {
        &self.config
    }
}

#[async_trait]
impl<D: DataAccess> TransactionManagerApi for TransactionManager<D> {
    async fn persist_transaction(
        &self,
        transaction_data: &str,
        channel_id: &str,
        topics: &[String],
    ) -> Result<ReturnPersistTransaction, TransactionManagerError> {
        self.persist_clear(transaction_data, channel_id, topics)
            .await
    }

    async fn persist_encrypted_transaction(
        &self,
        transaction_data: &str,
        channel_id: &str,
        recipients: &[EncryptionParameters],
        topics: &[String],
    ) -> Result<ReturnPersistTransaction, TransactionManagerError> {
        self.persist_encrypted(transaction_data, channel_id, recipients, topics)
            .await
    }

    async fn get_transactions_by_channel_id(
        &self,
        channel_id: &str,
        timestamp_boundaries: Option<TimestampBoundaries>,
    ) -> Result<ReturnGetTransactions, TransactionManagerError> {
        self.read_channel(channel_id, timestamp_boundaries).await
    }

    async fn get_channels_by_topic(
        &self,
        topic: &str,
        updated_between: Option<TimestampBoundaries>,
        pagination: Option<Pagination>,
    ) -> Result<ReturnGetChannels, TransactionManagerError> {
        validate_pagination(pagination)?;
        tracing::debug!("[tx-manager] Reading channels of topic {}", topic);
        let channels = self
            .data_access
            .get_channels_by_topic(topic, updated_between)
            .await
            .map_err(|e| {
                tracing::warn!("[tx-manager] Topic read failed for {}: {}", topic, e);
                e
            })?;
        Ok(self
            .clean_channels(channels, updated_between, pagination)
            .await)
    }

    async fn get_channels_by_multiple_topics(
        &self,
        topics: &[String],
        updated_between: Option<TimestampBoundaries>,
        pagination: Option<Pagination>,
    ) -> Result<ReturnGetChannels, TransactionManagerError> {
        validate_pagination(pagination)?;
        tracing::debug!("[tx-manager] Reading channels of topics {:?}", topics);
        let channels = self
            .data_access
            .get_channels_by_multiple_topics(topics, updated_between)
            .await
            .map_err(|e| {
                tracing::warn!("[tx-manager] Topic read failed for {:?}: {}", topics, e);
                e
            })?;
        Ok(self
            .clean_channels(channels, updated_between, pagination)
            .await)
    }
}

fn validate_pagination(pagination: Option<Pagination>) -> Result<(), TransactionManagerError> {
    match pagination {
        Some(pagination) => pagination.validate(),
        None => Ok(()),
    }
}
