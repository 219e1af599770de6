//! # Transaction Wire Types
//!
//! Records as they are persisted by the storage collaborator and handed back
//! to the transaction manager.
//!
//! ## Shapes
//!
//! - **Clear**: `{ "data": "<json string>" }`
//! - **Encrypted (first record of a channel)**:
//!   `{ "encryptedData", "hash", "encryptionMethod", "keys" }`
//! - **Encrypted (later records)**: `{ "encryptedData", "hash" }`
//!
//! Anything else is representable but invalid; the parser reports why.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plaintext payload of a transaction. Must be valid JSON.
pub type TransactionData = String;

/// Wrapped channel keys indexed by multi-formatted identity.
///
/// Both keys and values are multi-format strings: the key is a serialized
/// identity, the value a serialized `EncryptedData`.
pub type KeysDictionary = BTreeMap<String, String>;

/// A record in its persisted (wire) form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTransaction {
    /// Clear payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TransactionData>,
    /// Multi-formatted encrypted payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_data: Option<String>,
    /// Multi-formatted hash of the plaintext (encrypted records only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Channel encryption method, e.g. `ecies-aes256-gcm` (first encrypted record only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_method: Option<String>,
    /// Wrapped channel keys (first encrypted record only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<KeysDictionary>,
}

impl PersistedTransaction {
    /// Build a clear record.
    pub fn clear(data: impl Into<TransactionData>) -> Self {
        Self {
            data: Some(data.into()),
            ..Default::default()
        }
    }

    /// Build an encrypted record.
    ///
    /// `encryption_method` and `keys` are only set on the record that opens
    /// a channel.
    pub fn encrypted(
        encrypted_data: impl Into<String>,
        hash: impl Into<String>,
        encryption_method: Option<String>,
        keys: Option<KeysDictionary>,
    ) -> Self {
        Self {
            encrypted_data: Some(encrypted_data.into()),
            hash: Some(hash.into()),
            encryption_method,
            keys,
            ..Default::default()
        }
    }

    /// True when any field that only an encrypted record may carry is present.
    /// Empty strings count as absent.
    pub fn has_encrypted_fields(&self) -> bool {
        is_present(&self.encrypted_data)
            || is_present(&self.hash)
            || self.has_key_material()
    }

    /// True when the record carries channel key material.
    pub fn has_key_material(&self) -> bool {
        is_present(&self.encryption_method) || self.keys.is_some()
    }
}

fn is_present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.is_empty())
}

/// Confirmation state of a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    /// Accepted by storage, not yet confirmed.
    Pending,
    /// Confirmed by storage.
    Confirmed,
}

/// A persisted record wrapped in the envelope the storage collaborator adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedTransaction {
    /// The record.
    pub transaction: PersistedTransaction,
    /// Storage timestamp (seconds).
    pub timestamp: u64,
    /// Confirmation state, when the storage layer tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TransactionState>,
}

impl TimestampedTransaction {
    /// Wrap a record.
    pub fn new(
        transaction: PersistedTransaction,
        timestamp: u64,
        state: Option<TransactionState>,
    ) -> Self {
        Self {
            transaction,
            timestamp,
            state,
        }
    }

    /// Same envelope, different record.
    pub fn with_transaction(&self, transaction: PersistedTransaction) -> Self {
        Self {
            transaction,
            timestamp: self.timestamp,
            state: self.state,
        }
    }
}

/// A record rejected while cleaning a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredTransaction {
    /// Human-readable rejection reason.
    pub reason: String,
    /// The original record with its envelope.
    pub transaction: TimestampedTransaction,
}

/// Channel type, inferred from the first valid record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    /// No valid record seen yet.
    #[default]
    Unknown,
    /// Clear records only.
    Clear,
    /// Encrypted records only.
    Encrypted,
}

/// Inclusive timestamp window. Missing bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampBoundaries {
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<u64>,
}

impl TimestampBoundaries {
    /// Window with both bounds.
    pub fn between(from: u64, to: u64) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Whether `timestamp` falls inside the window.
    pub fn contains(&self, timestamp: u64) -> bool {
        self.from.map_or(true, |from| timestamp >= from)
            && self.to.map_or(true, |to| timestamp <= to)
    }
}
