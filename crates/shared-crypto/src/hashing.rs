//! # Canonical Hashing
//!
//! Channel ids and transaction hashes are keccak256 digests of a normalised
//! JSON form: keys sorted at every depth, compact output, lowercased.
//!
//! Two payloads that differ only in key order, whitespace or letter case
//! hash identically.

use crate::CryptoError;
use serde_json::Value;
use sha3::{Digest, Keccak256};
use shared_types::multiformat::serialize_hash;
use shared_types::HashValue;

/// keccak256 output (256-bit).
pub type Hash = [u8; 32];

/// One-shot keccak256.
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Normalise a JSON string.
///
/// `serde_json` maps keep their keys sorted, so a parse/print cycle sorts
/// every nested object.
pub fn normalize(json: &str) -> Result<String, CryptoError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| CryptoError::NotJson(e.to_string()))?;
    Ok(normalize_value(&value))
}

/// Normalise an already parsed value.
pub fn normalize_value(value: &Value) -> String {
    value.to_string().to_lowercase()
}

/// keccak256 of the normalised JSON, as a `0x` hash value.
pub fn normalize_keccak256_hash(json: &str) -> Result<HashValue, CryptoError> {
    let normalized = normalize(json)?;
    Ok(HashValue::keccak256(format!(
        "0x{}",
        hex::encode(keccak256(normalized.as_bytes()))
    )))
}

/// Multi-formatted content hash of a JSON payload. This is the channel id of
/// a channel whose first record carries `json`.
pub fn channel_hash(json: &str) -> Result<String, CryptoError> {
    Ok(serialize_hash(&normalize_keccak256_hash(json)?))
}
