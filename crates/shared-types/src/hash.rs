//! Typed hash values.

use serde::{Deserialize, Serialize};

/// Hash algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    Keccak256,
}

/// A hash with its algorithm. `value` is `0x`-prefixed lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashValue {
    #[serde(rename = "type")]
    pub hash_type: HashType,
    pub value: String,
}

impl HashValue {
    pub fn keccak256(value: impl Into<String>) -> Self {
        Self {
            hash_type: HashType::Keccak256,
            value: value.into(),
        }
    }
}
