//! Write paths.

use shared_crypto::channel_hash;
use shared_types::{ChannelType, EncryptionParameters, PersistedTransaction, CHANNEL_ENCRYPTION_METHOD};

use super::TransactionManager;
use crate::domain::entities::{PersistTransactionMeta, ReturnPersistTransaction};
use crate::domain::errors::{FactoryError, TransactionManagerError};
use crate::domain::factory::TransactionsFactory;
use crate::ports::outbound::DataAccess;

impl<D: DataAccess> TransactionManager<D> {
    pub(crate) async fn persist_clear(
        &self,
        data: &str,
        channel_id: &str,
        topics: &[String],
    ) -> Result<ReturnPersistTransaction, TransactionManagerError> {
        if channel_id.is_empty() {
            return Err(TransactionManagerError::MissingChannelId);
        }
        let transaction = TransactionsFactory::create_clear_transaction(data)?;
        tracing::info!("[tx-manager] Persisting clear transaction in {}", channel_id);
        self.store(transaction, data, channel_id, topics, None).await
    }

    pub(crate) async fn persist_encrypted(
        &self,
        data: &str,
        channel_id: &str,
        recipients: &[EncryptionParameters],
        topics: &[String],
    ) -> Result<ReturnPersistTransaction, TransactionManagerError> {
        if channel_id.is_empty() {
            return Err(TransactionManagerError::MissingChannelId);
        }
        let hash = channel_hash(data).map_err(|_| FactoryError::DataNotParsable)?;

        if hash == channel_id {
            let transaction =
                TransactionsFactory::create_encrypted_transaction_in_new_channel(data, recipients)?;
            tracing::info!(
                "[tx-manager] Opening encrypted channel {} for {} recipient(s)",
                channel_id,
                recipients.len()
            );
            return self
                .store(
                    transaction,
                    data,
                    channel_id,
                    topics,
                    Some(CHANNEL_ENCRYPTION_METHOD.to_string()),
                )
                .await;
        }

        let channel = self
            .data_access
            .get_transactions_by_channel_id(channel_id, None)
            .await
            .map_err(|e| {
                tracing::warn!("[tx-manager] Channel read failed for {}: {}", channel_id, e);
                e
            })?;
        let channel_info = self
            .channel_parser
            .get_channel_type_and_channel_key(channel_id, &channel.transactions)
            .await;

        match channel_info.channel_type {
            ChannelType::Unknown => {
                return Err(TransactionManagerError::ChannelNotFound(channel_id.to_string()))
            }
            ChannelType::Clear => {
                return Err(TransactionManagerError::ChannelIsClear(channel_id.to_string()))
            }
            ChannelType::Encrypted => {}
        }
        let channel_key = channel_info
            .channel_key
            .ok_or_else(|| TransactionManagerError::ChannelKeyUnavailable(channel_id.to_string()))?;
        if !recipients.is_empty() {
            return Err(TransactionManagerError::RecipientsOnExistingChannel(
                channel_id.to_string(),
            ));
        }

        let transaction = TransactionsFactory::create_encrypted_transaction(data, &channel_key)?;
        tracing::info!(
            "[tx-manager] Appending encrypted transaction to {}",
            channel_id
        );
        self.store(
            transaction,
            data,
            channel_id,
            topics,
            channel_info.encryption_method,
        )
        .await
    }

    async fn store(
        &self,
        transaction: PersistedTransaction,
        data: &str,
        channel_id: &str,
        topics: &[String],
        encryption_method: Option<String>,
    ) -> Result<ReturnPersistTransaction, TransactionManagerError> {
        let mut topics = topics.to_vec();
        if self.config.index_hash_topic {
            let hash = channel_hash(data).map_err(|_| FactoryError::DataNotParsable)?;
            if !topics.contains(&hash) {
                topics.push(hash);
            }
        }

        let result = self
            .data_access
            .persist_transaction(&transaction, channel_id, &topics)
            .await
            .map_err(|e| {
                tracing::warn!("[tx-manager] Persist failed for {}: {}", channel_id, e);
                e
            })?;

        Ok(ReturnPersistTransaction {
            meta: PersistTransactionMeta {
                data_access_meta: result.meta,
                encryption_method,
                transaction_data: transaction,
                topics,
            },
        })
    }
}
