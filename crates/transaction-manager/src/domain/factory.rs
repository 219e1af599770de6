//! # Transactions Factory
//!
//! Builds persisted records from plaintext.
//!
//! | Constructor | Output shape |
//! |-------------|--------------|
//! | `create_clear_transaction` | `{data}` |
//! | `create_encrypted_transaction_in_new_channel` | `{encryptedData, hash, encryptionMethod, keys}` |
//! | `create_encrypted_transaction` | `{encryptedData, hash}` |
//!
//! Recipient keys are indexed by multi-formatted identity. When two
//! recipients resolve to the same identity the last one wins.

use serde_json::Value;
use shared_crypto::{
    channel_hash, encrypt, generate_32_buffer_key, identity_from_encryption_params,
};
use shared_types::multiformat::{serialize_encrypted_data, serialize_identity};
use shared_types::{
    ChannelKey, EncryptionMethod, EncryptionParameters, KeysDictionary, PersistedTransaction,
    CHANNEL_ENCRYPTION_METHOD,
};

use crate::domain::errors::FactoryError;

/// Stateless record builder.
pub struct TransactionsFactory;

impl TransactionsFactory {
    /// `{data}` after checking `data` is JSON.
    pub fn create_clear_transaction(data: &str) -> Result<PersistedTransaction, FactoryError> {
        ensure_json(data)?;
        Ok(PersistedTransaction::clear(data))
    }

    /// First record of a new encrypted channel.
    ///
    /// A fresh channel key encrypts `data` and is wrapped for every recipient.
    pub fn create_encrypted_transaction_in_new_channel(
        data: &str,
        recipients: &[EncryptionParameters],
    ) -> Result<PersistedTransaction, FactoryError> {
        ensure_json(data)?;
        if recipients.is_empty() {
            return Err(FactoryError::NoRecipients);
        }
        if recipients
            .iter()
            .any(|recipient| recipient.method != EncryptionMethod::Ecies)
        {
            return Err(FactoryError::UnsupportedEncryptionMethod);
        }

        let channel_key = ChannelKey::aes256_gcm(generate_32_buffer_key());
        let encrypted_data = encrypt_with_channel_key(data, &channel_key)?;
        let hash = channel_hash(data)?;
        let keys = wrap_channel_key(&channel_key, recipients)?;

        Ok(PersistedTransaction::encrypted(
            encrypted_data,
            hash,
            Some(CHANNEL_ENCRYPTION_METHOD.to_string()),
            Some(keys),
        ))
    }

    /// Later record of an existing encrypted channel.
    pub fn create_encrypted_transaction(
        data: &str,
        channel_key: &ChannelKey,
    ) -> Result<PersistedTransaction, FactoryError> {
        if channel_key.method != EncryptionMethod::Aes256Gcm {
            return Err(FactoryError::UnsupportedChannelKeyMethod(channel_key.method));
        }
        ensure_json(data)?;

        let encrypted_data = encrypt_with_channel_key(data, channel_key)?;
        let hash = channel_hash(data)?;
        Ok(PersistedTransaction::encrypted(encrypted_data, hash, None, None))
    }
}

fn ensure_json(data: &str) -> Result<(), FactoryError> {
    serde_json::from_str::<Value>(data)
        .map(|_| ())
        .map_err(|_| FactoryError::DataNotParsable)
}

fn encrypt_with_channel_key(data: &str, channel_key: &ChannelKey) -> Result<String, FactoryError> {
    let params = EncryptionParameters {
        key: channel_key.key.clone(),
        method: channel_key.method,
    };
    Ok(serialize_encrypted_data(&encrypt(data, &params)?))
}

fn wrap_channel_key(
    channel_key: &ChannelKey,
    recipients: &[EncryptionParameters],
) -> Result<KeysDictionary, FactoryError> {
    let mut keys = KeysDictionary::new();
    for recipient in recipients {
        let identity = identity_from_encryption_params(recipient)?;
        let wrapped = encrypt(&channel_key.key, recipient)?;
        keys.insert(
            serialize_identity(&identity),
            serialize_encrypted_data(&wrapped),
        );
    }
    Ok(keys)
}
