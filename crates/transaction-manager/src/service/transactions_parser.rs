//! # Transactions Parser
//!
//! Turns one persisted record into a [`Transaction`], given what is already
//! known about its channel.
//!
//! ## Classification
//!
//! ```text
//! data present          -> clear      (channel must not be encrypted, no encrypted fields)
//! encryptedData present -> encrypted  (channel must not be clear, hash required)
//!     no channel key    -> encryptionMethod + keys required, channel key unwrapped
//!     channel key known -> encryptionMethod + keys forbidden
//! neither               -> rejected
//! ```

use shared_types::multiformat::{deserialize_encrypted_data, deserialize_identity};
use shared_types::{
    ChannelKey, ChannelType, DecryptionProvider, KeysDictionary, PersistedTransaction,
    CHANNEL_ENCRYPTION_METHOD,
};
use std::sync::Arc;

use crate::domain::errors::TransactionError;
use crate::domain::transaction::{ClearTransaction, EncryptedTransaction, Transaction};

/// Outcome of parsing one record.
#[derive(Debug)]
pub struct ParsedTransaction {
    pub transaction: Transaction,
    /// Channel key unwrapped from this record's key material. Only set when
    /// the caller did not already hold one.
    pub channel_key: Option<ChannelKey>,
    /// Channel encryption method declared by this record.
    pub encryption_method: Option<String>,
}

/// Record parser. Holds the optional decryption provider.
#[derive(Clone, Default)]
pub struct TransactionsParser {
    decryption_provider: Option<Arc<dyn DecryptionProvider>>,
}

impl TransactionsParser {
    pub fn new(decryption_provider: Option<Arc<dyn DecryptionProvider>>) -> Self {
        Self {
            decryption_provider,
        }
    }

    /// Parse `record` in a channel of type `channel_type`.
    ///
    /// `channel_key` is the key pinned by the channel's first valid record,
    /// if any.
    pub async fn parse_persisted_transaction(
        &self,
        record: &PersistedTransaction,
        channel_type: ChannelType,
        channel_key: Option<&ChannelKey>,
    ) -> Result<ParsedTransaction, TransactionError> {
        if let Some(data) = non_empty(&record.data) {
            if channel_type == ChannelType::Encrypted {
                return Err(TransactionError::EncryptedOnlyChannel);
            }
            if record.has_encrypted_fields() {
                return Err(TransactionError::MalformedClearTransaction);
            }
            return Ok(ParsedTransaction {
                transaction: Transaction::Clear(ClearTransaction::new(data)),
                channel_key: None,
                encryption_method: None,
            });
        }

        let Some(encrypted_data) = non_empty(&record.encrypted_data) else {
            return Err(TransactionError::MissingPayload);
        };
        if channel_type == ChannelType::Clear {
            return Err(TransactionError::ClearOnlyChannel);
        }
        if non_empty(&record.hash).is_none() {
            return Err(TransactionError::MissingHash);
        }

        match channel_key {
            Some(key) => {
                if record.has_key_material() {
                    return Err(TransactionError::KeyMaterialAlreadyEstablished);
                }
                Ok(ParsedTransaction {
                    transaction: Transaction::Encrypted(EncryptedTransaction::new(
                        encrypted_data,
                        key.clone(),
                    )),
                    channel_key: None,
                    encryption_method: None,
                })
            }
            None => {
                let (Some(method), Some(keys)) =
                    (non_empty(&record.encryption_method), &record.keys)
                else {
                    return Err(TransactionError::MissingKeyMaterial);
                };
                let key = self.decrypt_channel_key(keys, method).await?;
                Ok(ParsedTransaction {
                    transaction: Transaction::Encrypted(EncryptedTransaction::new(
                        encrypted_data,
                        key.clone(),
                    )),
                    channel_key: Some(key),
                    encryption_method: Some(method.to_string()),
                })
            }
        }
    }

    /// Unwrap the channel key from a record's `keys` map.
    ///
    /// Entries are probed in map order; entries whose identity does not
    /// decode, is of an unsupported type, or is not registered are skipped.
    /// The first successful unwrap wins.
    pub async fn decrypt_channel_key(
        &self,
        keys: &KeysDictionary,
        encryption_method: &str,
    ) -> Result<ChannelKey, TransactionError> {
        let provider = self
            .decryption_provider
            .as_ref()
            .ok_or(TransactionError::NoDecryptionProvider)?;

        if encryption_method != CHANNEL_ENCRYPTION_METHOD {
            return Err(TransactionError::UnsupportedMethod(
                encryption_method.to_string(),
            ));
        }

        let mut last_error = String::new();
        for (serialized_identity, wrapped_key) in keys {
            let Ok(identity) = deserialize_identity(serialized_identity) else {
                continue;
            };
            if !provider
                .supported_identity_types()
                .contains(&identity.identity_type)
            {
                continue;
            }
            if !provider.is_identity_registered(&identity).await {
                continue;
            }

            let wrapped = match deserialize_encrypted_data(wrapped_key) {
                Ok(wrapped) => wrapped,
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };
            match provider.decrypt(&wrapped, &identity).await {
                Ok(key) if !key.is_empty() => return Ok(ChannelKey::aes256_gcm(key)),
                Ok(_) => last_error = "empty channel key".to_string(),
                Err(e) => last_error = e.to_string(),
            }
        }

        Err(TransactionError::ChannelKeyUnrecoverable(last_error))
    }
}

// Empty strings count as absent.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionValue;
    use crate::test_utils::*;
    use shared_crypto::generate_32_buffer_key;
    use shared_types::DecryptionParameters;

    fn parser_for(identities: &[usize]) -> TransactionsParser {
        TransactionsParser::new(Some(Arc::new(FakeDecryptionProvider::with_identities(
            identities,
        ))))
    }

    #[tokio::test]
    async fn test_clear_record() {
        let parsed = TransactionsParser::default()
            .parse_persisted_transaction(&clear_record(DATA), ChannelType::Unknown, None)
            .await
            .unwrap();
        assert!(!parsed.transaction.is_encrypted());
        assert!(parsed.channel_key.is_none());
        assert_eq!(parsed.transaction.get_data().unwrap(), DATA);
    }

    #[tokio::test]
    async fn test_clear_record_in_encrypted_channel() {
        let result = TransactionsParser::default()
            .parse_persisted_transaction(&clear_record(DATA), ChannelType::Encrypted, None)
            .await;
        assert_eq!(result.unwrap_err(), TransactionError::EncryptedOnlyChannel);
    }

    #[tokio::test]
    async fn test_clear_record_with_encrypted_fields() {
        let mut record = clear_record(DATA);
        record.hash = Some("01abc".to_string());
        let result = TransactionsParser::default()
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await;
        assert_eq!(
            result.unwrap_err(),
            TransactionError::MalformedClearTransaction
        );
    }

    #[tokio::test]
    async fn test_missing_payload() {
        let result = TransactionsParser::default()
            .parse_persisted_transaction(&PersistedTransaction::default(), ChannelType::Unknown, None)
            .await;
        assert_eq!(result.unwrap_err(), TransactionError::MissingPayload);
        assert_eq!(
            TransactionError::MissingPayload.to_string(),
            "Transaction must have a property \"data\" or \"encryptedData\""
        );
    }

    #[tokio::test]
    async fn test_encrypted_record_in_clear_channel() {
        let record = encrypted_first_record(DATA, &[0]);
        let result = parser_for(&[0])
            .parse_persisted_transaction(&record, ChannelType::Clear, None)
            .await;
        assert_eq!(result.unwrap_err(), TransactionError::ClearOnlyChannel);
    }

    #[tokio::test]
    async fn test_encrypted_record_without_hash() {
        let mut record = encrypted_first_record(DATA, &[0]);
        record.hash = None;
        let result = parser_for(&[0])
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await;
        assert_eq!(result.unwrap_err(), TransactionError::MissingHash);
    }

    #[tokio::test]
    async fn test_first_encrypted_record_unwraps_channel_key() {
        let record = encrypted_first_record(DATA, &[0, 1]);
        let parsed = parser_for(&[1])
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await
            .unwrap();

        assert!(parsed.transaction.is_encrypted());
        assert!(parsed.channel_key.is_some());
        assert_eq!(
            parsed.encryption_method.as_deref(),
            Some(CHANNEL_ENCRYPTION_METHOD)
        );
        assert_eq!(parsed.transaction.get_data().unwrap(), DATA);
    }

    #[tokio::test]
    async fn test_first_encrypted_record_without_key_material() {
        let channel_key = ChannelKey::aes256_gcm(generate_32_buffer_key());
        let record = encrypted_record(DATA, &channel_key);
        let result = parser_for(&[0])
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await;
        assert_eq!(result.unwrap_err(), TransactionError::MissingKeyMaterial);
    }

    #[tokio::test]
    async fn test_later_record_with_key_material() {
        let record = encrypted_first_record(DATA, &[0]);
        let channel_key = ChannelKey::aes256_gcm(generate_32_buffer_key());
        let result = parser_for(&[0])
            .parse_persisted_transaction(&record, ChannelType::Encrypted, Some(&channel_key))
            .await;
        assert_eq!(
            result.unwrap_err(),
            TransactionError::KeyMaterialAlreadyEstablished
        );
    }

    #[tokio::test]
    async fn test_empty_encrypted_fields_on_clear_record() {
        let mut with_method = clear_record(DATA);
        with_method.encryption_method = Some(String::new());
        let mut with_hash = clear_record(DATA);
        with_hash.hash = Some(String::new());
        let mut with_payload = clear_record(DATA);
        with_payload.encrypted_data = Some(String::new());

        for record in [with_method, with_hash, with_payload] {
            let parsed = TransactionsParser::default()
                .parse_persisted_transaction(&record, ChannelType::Unknown, None)
                .await
                .unwrap();
            assert_eq!(parsed.transaction.get_data().unwrap(), DATA);
        }
    }

    #[tokio::test]
    async fn test_first_encrypted_record_with_empty_method() {
        let mut record = encrypted_first_record(DATA, &[0]);
        record.encryption_method = Some(String::new());
        let result = parser_for(&[0])
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await;
        assert_eq!(result.unwrap_err(), TransactionError::MissingKeyMaterial);
    }

    #[tokio::test]
    async fn test_later_record_with_empty_method() {
        let channel_key = ChannelKey::aes256_gcm(generate_32_buffer_key());
        let mut record = encrypted_record(DATA, &channel_key);
        record.encryption_method = Some(String::new());
        let parsed = TransactionsParser::default()
            .parse_persisted_transaction(&record, ChannelType::Encrypted, Some(&channel_key))
            .await
            .unwrap();
        assert_eq!(parsed.transaction.get_data().unwrap(), DATA);
    }

    #[tokio::test]
    async fn test_later_record_uses_pinned_key() {
        let channel_key = ChannelKey::aes256_gcm(generate_32_buffer_key());
        let record = encrypted_record(DATA, &channel_key);
        let parsed = TransactionsParser::default()
            .parse_persisted_transaction(&record, ChannelType::Encrypted, Some(&channel_key))
            .await
            .unwrap();
        assert!(parsed.channel_key.is_none());
        assert_eq!(parsed.transaction.get_data().unwrap(), DATA);
    }

    #[tokio::test]
    async fn test_no_decryption_provider() {
        let record = encrypted_first_record(DATA, &[0]);
        let result = TransactionsParser::default()
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await;
        assert_eq!(result.unwrap_err(), TransactionError::NoDecryptionProvider);
    }

    #[tokio::test]
    async fn test_unsupported_channel_method() {
        let mut record = encrypted_first_record(DATA, &[0]);
        record.encryption_method = Some("ecies-aes256-cbc".to_string());
        let result = parser_for(&[0])
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await;
        assert_eq!(
            result.unwrap_err(),
            TransactionError::UnsupportedMethod("ecies-aes256-cbc".to_string())
        );
    }

    #[tokio::test]
    async fn test_unregistered_reader_cannot_unwrap() {
        let record = encrypted_first_record(DATA, &[0, 1]);
        let result = parser_for(&[2])
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await;
        assert_eq!(
            result.unwrap_err(),
            TransactionError::ChannelKeyUnrecoverable(String::new())
        );
    }

    #[tokio::test]
    async fn test_failing_provider_error_is_reported() {
        let record = encrypted_first_record(DATA, &[0]);
        let parser = TransactionsParser::new(Some(Arc::new(FailingDecryptionProvider)));
        let error = parser
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Impossible to decrypt the channel key from this transaction (provider failure)"
        );
    }

    #[tokio::test]
    async fn test_probe_skips_undecodable_identities() {
        let mut record = encrypted_first_record(DATA, &[0]);
        let keys = record.keys.as_mut().unwrap();
        keys.insert("not an identity".to_string(), "02abcd".to_string());
        keys.insert(
            // Smart contracts are not held by the fake provider.
            "21af083f77f1ffd54218d91491afd06c9296eac3ce".to_string(),
            "02abcd".to_string(),
        );

        let parsed = parser_for(&[0])
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await
            .unwrap();
        assert!(parsed.channel_key.is_some());
    }

    #[tokio::test]
    async fn test_bad_wrapped_key_then_good_one() {
        // Identity 1 sorts before identity 0, so its corrupt entry is probed first.
        let mut record = encrypted_first_record(DATA, &[0, 1]);
        record
            .keys
            .as_mut()
            .unwrap()
            .insert(serialized_identity(1), "not multi-format".to_string());

        let parsed = parser_for(&[0, 1])
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await
            .unwrap();
        assert!(parsed.channel_key.is_some());
        assert_eq!(parsed.transaction.get_data().unwrap(), DATA);
    }

    #[tokio::test]
    async fn test_last_error_is_kept_when_every_entry_fails() {
        let mut record = encrypted_first_record(DATA, &[1]);
        record
            .keys
            .as_mut()
            .unwrap()
            .insert(serialized_identity(1), "not multi-format".to_string());

        let result = parser_for(&[1])
            .parse_persisted_transaction(&record, ChannelType::Unknown, None)
            .await;
        assert!(matches!(
            result.unwrap_err(),
            TransactionError::ChannelKeyUnrecoverable(reason) if !reason.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_ecies_parameters_are_not_a_channel_key() {
        // A pinned key with the wrong method yields a per-record decryption error.
        let good_key = ChannelKey::aes256_gcm(generate_32_buffer_key());
        let record = encrypted_record(DATA, &good_key);
        let wrong = DecryptionParameters::ecies(PRIVATE_KEYS[0]);
        let parsed = TransactionsParser::default()
            .parse_persisted_transaction(&record, ChannelType::Encrypted, Some(&wrong))
            .await
            .unwrap();
        assert!(matches!(
            parsed.transaction.get_error(),
            Some(TransactionError::DecryptionFailed(_))
        ));
    }
}
