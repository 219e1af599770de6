//! # Transaction Values
//!
//! Runtime view of a parsed record. Both variants compute their plaintext,
//! content hash and validation error at most once.
//!
//! The hash is derived here, never compared: binding a record to its channel
//! id is the channel parser's job.

use serde_json::Value;
use shared_crypto::{channel_hash, decrypt};
use shared_types::multiformat::deserialize_encrypted_data;
use shared_types::{ChannelKey, TransactionData};
use std::sync::OnceLock;

use crate::domain::errors::TransactionError;

/// Capabilities shared by clear and encrypted transactions.
pub trait TransactionValue {
    /// Plaintext payload.
    fn get_data(&self) -> Result<TransactionData, TransactionError>;

    /// Multi-formatted keccak256 of the normalised plaintext.
    fn get_hash(&self) -> Result<String, TransactionError>;

    /// Why this transaction is unusable, if it is.
    fn get_error(&self) -> Option<TransactionError>;
}

/// A record whose payload is stored in clear.
#[derive(Debug)]
pub struct ClearTransaction {
    data: TransactionData,
    hash: OnceLock<Result<String, TransactionError>>,
}

impl ClearTransaction {
    pub fn new(data: impl Into<TransactionData>) -> Self {
        Self {
            data: data.into(),
            hash: OnceLock::new(),
        }
    }
}

impl TransactionValue for ClearTransaction {
    fn get_data(&self) -> Result<TransactionData, TransactionError> {
        Ok(self.data.clone())
    }

    fn get_hash(&self) -> Result<String, TransactionError> {
        self.hash
            .get_or_init(|| channel_hash(&self.data).map_err(|_| TransactionError::NotParsable))
            .clone()
    }

    fn get_error(&self) -> Option<TransactionError> {
        if is_json(&self.data) {
            None
        } else {
            Some(TransactionError::NotParsable)
        }
    }
}

/// A record whose payload is encrypted with the channel key.
#[derive(Debug)]
pub struct EncryptedTransaction {
    encrypted_data: String,
    channel_key: ChannelKey,
    data: OnceLock<Result<TransactionData, TransactionError>>,
    hash: OnceLock<Result<String, TransactionError>>,
}

impl EncryptedTransaction {
    /// `encrypted_data` is the multi-formatted ciphertext.
    pub fn new(encrypted_data: impl Into<String>, channel_key: ChannelKey) -> Self {
        Self {
            encrypted_data: encrypted_data.into(),
            channel_key,
            data: OnceLock::new(),
            hash: OnceLock::new(),
        }
    }

    fn decrypt(&self) -> Result<TransactionData, TransactionError> {
        let encrypted = deserialize_encrypted_data(&self.encrypted_data)
            .map_err(|e| TransactionError::DecryptionFailed(e.to_string()))?;
        decrypt(&encrypted, &self.channel_key)
            .map_err(|e| TransactionError::DecryptionFailed(e.to_string()))
    }
}

impl TransactionValue for EncryptedTransaction {
    fn get_data(&self) -> Result<TransactionData, TransactionError> {
        self.data.get_or_init(|| self.decrypt()).clone()
    }

    fn get_hash(&self) -> Result<String, TransactionError> {
        self.hash
            .get_or_init(|| {
                let data = self.get_data()?;
                channel_hash(&data).map_err(|_| TransactionError::DecryptedNotParsable)
            })
            .clone()
    }

    fn get_error(&self) -> Option<TransactionError> {
        match self.get_data() {
            Err(e) => Some(e),
            Ok(data) if !is_json(&data) => Some(TransactionError::DecryptedNotParsable),
            Ok(_) => None,
        }
    }
}

/// A parsed record, clear or encrypted.
#[derive(Debug)]
pub enum Transaction {
    Clear(ClearTransaction),
    Encrypted(EncryptedTransaction),
}

impl Transaction {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Transaction::Encrypted(_))
    }
}

impl TransactionValue for Transaction {
    fn get_data(&self) -> Result<TransactionData, TransactionError> {
        match self {
            Transaction::Clear(tx) => tx.get_data(),
            Transaction::Encrypted(tx) => tx.get_data(),
        }
    }

    fn get_hash(&self) -> Result<String, TransactionError> {
        match self {
            Transaction::Clear(tx) => tx.get_hash(),
            Transaction::Encrypted(tx) => tx.get_hash(),
        }
    }

    fn get_error(&self) -> Option<TransactionError> {
        match self {
            Transaction::Clear(tx) => tx.get_error(),
            Transaction::Encrypted(tx) => tx.get_error(),
        }
    }
}

fn is_json(data: &str) -> bool {
    serde_json::from_str::<Value>(data).is_ok()
}
