//! # Identities
//!
//! Recipients of a wrapped channel key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityType {
    /// Externally owned Ethereum account.
    #[serde(rename = "ethereumAddress")]
    EthereumAddress,
    /// Smart contract, optionally on a named network.
    #[serde(rename = "ethereumSmartContract")]
    EthereumSmartContract,
}

impl fmt::Display for IdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityType::EthereumAddress => f.write_str("ethereumAddress"),
            IdentityType::EthereumSmartContract => f.write_str("ethereumSmartContract"),
        }
    }
}

/// A typed identity. `value` is `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "type")]
    pub identity_type: IdentityType,
    pub value: String,
    /// Network name, smart contracts only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

impl Identity {
    pub fn ethereum_address(value: impl Into<String>) -> Self {
        Self {
            identity_type: IdentityType::EthereumAddress,
            value: value.into(),
            network: None,
        }
    }

    pub fn smart_contract(value: impl Into<String>, network: Option<String>) -> Self {
        Self {
            identity_type: IdentityType::EthereumSmartContract,
            value: value.into(),
            network,
        }
    }

    /// Case-insensitive identity comparison.
    pub fn matches(&self, other: &Identity) -> bool {
        self.identity_type == other.identity_type
            && self.value.eq_ignore_ascii_case(&other.value)
            && self.network == other.network
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.identity_type, self.value)
    }
}
