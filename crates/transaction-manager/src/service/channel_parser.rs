//! # Channel Parser
//!
//! Cleans the ordered record list of one channel.
//!
//! ## State Machine
//!
//! The channel starts `Unknown` with no key. Records are scanned in order;
//! the first record that parses, validates and hashes to the channel id
//! fixes the channel type (and key, when encrypted) for every later record.
//! A rejected record never changes the state.
//!
//! Records inside a channel are strictly sequential: each one is read with
//! the state left by the previous ones.

use shared_types::{ChannelType, IgnoredTransaction, PersistedTransaction, TimestampedTransaction};
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::{ChannelTypeAndKey, CleanedChannel};
use crate::domain::errors::TransactionError;
use crate::domain::transaction::TransactionValue;
use crate::ports::outbound::DecryptionProvider;
use crate::service::transactions_parser::TransactionsParser;

/// Channel cleaning over a [`TransactionsParser`].
#[derive(Clone, Default)]
pub struct ChannelParser {
    parser: TransactionsParser,
}

impl ChannelParser {
    pub fn new(decryption_provider: Option<Arc<dyn DecryptionProvider>>) -> Self {
        Self {
            parser: TransactionsParser::new(decryption_provider),
        }
    }

    /// Decrypt and clean `records`.
    ///
    /// The output is index-aligned with the input: each position is either a
    /// valid record (decrypted to `{data}`, original timestamp and state) or
    /// an ignored record with its reason.
    pub async fn decrypt_and_clean_channel(
        &self,
        channel_id: &str,
        records: &[TimestampedTransaction],
    ) -> CleanedChannel {
        let mut state = ChannelTypeAndKey::default();
        let mut transactions = Vec::with_capacity(records.len());
        let mut ignored_transactions = Vec::with_capacity(records.len());

        for record in records {
            match self.accept(channel_id, record, &mut state).await {
                Ok(valid) => {
                    transactions.push(Some(valid));
                    ignored_transactions.push(None);
                }
                Err(reason) => {
                    debug!(
                        "[channel-parser] ignoring record of {} at {}: {}",
                        channel_id, record.timestamp, reason
                    );
                    transactions.push(None);
                    ignored_transactions.push(Some(IgnoredTransaction {
                        reason: reason.to_string(),
                        transaction: record.clone(),
                    }));
                }
            }
        }

        CleanedChannel {
            transactions,
            ignored_transactions,
            encryption_method: state.encryption_method,
        }
    }

    /// One step of the scan. Updates `state` only when `record` is the
    /// channel's first valid record.
    async fn accept(
        &self,
        channel_id: &str,
        record: &TimestampedTransaction,
        state: &mut ChannelTypeAndKey,
    ) -> Result<TimestampedTransaction, TransactionError> {
        let parsed = self
            .parser
            .parse_persisted_transaction(
                &record.transaction,
                state.channel_type,
                state.channel_key.as_ref(),
            )
            .await?;

        if let Some(error) = parsed.transaction.get_error() {
            return Err(error);
        }

        if state.channel_type == ChannelType::Unknown {
            if parsed.transaction.get_hash()? != channel_id {
                return Err(TransactionError::HashMismatch);
            }
            state.channel_type = if parsed.channel_key.is_some() {
                ChannelType::Encrypted
            } else {
                ChannelType::Clear
            };
            state.channel_key = parsed.channel_key;
            state.encryption_method = parsed.encryption_method;
        }

        let data = parsed.transaction.get_data()?;
        Ok(record.with_transaction(PersistedTransaction::clear(data)))
    }

    /// Channel type, key and method from the first valid record.
    ///
    /// Stops at the first record that parses, validates and hashes to the
    /// channel id. Earlier bad records are skipped silently. A record that
    /// declares the channel id as its hash but whose key this reader cannot
    /// unwrap marks the channel encrypted without a key.
    pub async fn get_channel_type_and_channel_key(
        &self,
        channel_id: &str,
        records: &[TimestampedTransaction],
    ) -> ChannelTypeAndKey {
        for record in records {
            let parsed = match self
                .parser
                .parse_persisted_transaction(&record.transaction, ChannelType::Unknown, None)
                .await
            {
                Ok(parsed) => parsed,
                Err(error) => {
                    if error.is_key_unavailable()
                        && record.transaction.hash.as_deref() == Some(channel_id)
                    {
                        return ChannelTypeAndKey {
                            channel_type: ChannelType::Encrypted,
                            channel_key: None,
                            encryption_method: record.transaction.encryption_method.clone(),
                        };
                    }
                    continue;
                }
            };

            if parsed.transaction.get_error().is_some() {
                continue;
            }
            if parsed.transaction.get_hash().ok().as_deref() != Some(channel_id) {
                continue;
            }

            let channel_type = if parsed.channel_key.is_some() {
                ChannelType::Encrypted
            } else {
                ChannelType::Clear
            };
            return ChannelTypeAndKey {
                channel_type,
                channel_key: parsed.channel_key,
                encryption_method: parsed.encryption_method,
            };
        }

        ChannelTypeAndKey::default()
    }
}
