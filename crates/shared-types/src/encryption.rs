//! # Encryption Parameters
//!
//! Method tags and key material exchanged between the factory, the parser
//! and decryption providers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Channel encryption method written on the first record of an encrypted channel.
pub const CHANNEL_ENCRYPTION_METHOD: &str = "ecies-aes256-gcm";

/// Primitive encryption methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncryptionMethod {
    /// Asymmetric, secp256k1 ECIES.
    #[serde(rename = "ecies")]
    Ecies,
    /// Symmetric, AES-256-CBC. Recognized by the codec only.
    #[serde(rename = "aes256-cbc")]
    Aes256Cbc,
    /// Symmetric, AES-256-GCM.
    #[serde(rename = "aes256-gcm")]
    Aes256Gcm,
}

impl EncryptionMethod {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            EncryptionMethod::Ecies => "ecies",
            EncryptionMethod::Aes256Cbc => "aes256-cbc",
            EncryptionMethod::Aes256Gcm => "aes256-gcm",
        }
    }
}

impl fmt::Display for EncryptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ecies" => Ok(EncryptionMethod::Ecies),
            "aes256-cbc" => Ok(EncryptionMethod::Aes256Cbc),
            "aes256-gcm" => Ok(EncryptionMethod::Aes256Gcm),
            other => Err(format!("unknown encryption method: {other}")),
        }
    }
}

/// Key used to encrypt. For ECIES the key is a hex public key, for AES the
/// base64 of 32 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionParameters {
    pub key: String,
    pub method: EncryptionMethod,
}

impl EncryptionParameters {
    pub fn ecies(public_key: impl Into<String>) -> Self {
        Self {
            key: public_key.into(),
            method: EncryptionMethod::Ecies,
        }
    }
}

/// Key used to decrypt. For ECIES the key is a hex private key, for AES the
/// base64 of 32 bytes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionParameters {
    pub key: String,
    pub method: EncryptionMethod,
}

impl DecryptionParameters {
    pub fn ecies(private_key: impl Into<String>) -> Self {
        Self {
            key: private_key.into(),
            method: EncryptionMethod::Ecies,
        }
    }

    pub fn aes256_gcm(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            method: EncryptionMethod::Aes256Gcm,
        }
    }
}

// Key material stays out of logs.
impl fmt::Debug for DecryptionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptionParameters")
            .field("key", &"<redacted>")
            .field("method", &self.method)
            .finish()
    }
}

/// Symmetric key shared by every participant of an encrypted channel.
pub type ChannelKey = DecryptionParameters;

/// Ciphertext tagged with the method that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub method: EncryptionMethod,
    /// Hex for ECIES, base64 for AES.
    pub value: String,
}
