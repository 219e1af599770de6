//! # Multi-Format Codec
//!
//! Hashes, identities and ciphertexts travel as strings prefixed with a
//! two-character type tag.
//!
//! | Prefix | Kind                           | Payload                          |
//! |--------|--------------------------------|----------------------------------|
//! | `01`   | keccak256 hash                 | 64 hex chars                     |
//! | `02`   | ECIES ciphertext               | hex                              |
//! | `03`   | AES-256-CBC ciphertext         | base64                           |
//! | `04`   | AES-256-GCM ciphertext         | base64                           |
//! | `20`   | Ethereum address               | 40 hex chars                     |
//! | `21`   | Ethereum smart contract        | 40 hex chars, `-<network>` opt.  |
//!
//! Hex payloads are always written lowercase.

use crate::encryption::{EncryptedData, EncryptionMethod};
use crate::errors::MultiFormatError;
use crate::hash::{HashType, HashValue};
use crate::identity::{Identity, IdentityType};

pub const KECCAK256_HASH_PREFIX: &str = "01";
pub const ECIES_ENCRYPTED_PREFIX: &str = "02";
pub const AES256_CBC_ENCRYPTED_PREFIX: &str = "03";
pub const AES256_GCM_ENCRYPTED_PREFIX: &str = "04";
pub const ETHEREUM_ADDRESS_PREFIX: &str = "20";
pub const ETHEREUM_SMART_CONTRACT_PREFIX: &str = "21";

const PREFIX_LENGTH: usize = 2;
const HASH_HEX_LENGTH: usize = 64;
const ADDRESS_HEX_LENGTH: usize = 40;

/// Serialize a hash. `0x` is stripped and the hex lowercased.
pub fn serialize_hash(hash: &HashValue) -> String {
    let prefix = match hash.hash_type {
        HashType::Keccak256 => KECCAK256_HASH_PREFIX,
    };
    format!("{prefix}{}", strip_0x(&hash.value).to_ascii_lowercase())
}

/// Parse a serialized hash.
pub fn deserialize_hash(serialized: &str) -> Result<HashValue, MultiFormatError> {
    let (prefix, payload) = split_prefix(serialized)?;
    if prefix != KECCAK256_HASH_PREFIX {
        return Err(unexpected(KECCAK256_HASH_PREFIX, prefix));
    }
    check_hex("keccak256 hash", payload, Some(HASH_HEX_LENGTH))?;
    Ok(HashValue::keccak256(format!(
        "0x{}",
        payload.to_ascii_lowercase()
    )))
}

/// Serialize an identity.
pub fn serialize_identity(identity: &Identity) -> String {
    let address = strip_0x(&identity.value).to_ascii_lowercase();
    match identity.identity_type {
        IdentityType::EthereumAddress => format!("{ETHEREUM_ADDRESS_PREFIX}{address}"),
        IdentityType::EthereumSmartContract => match &identity.network {
            Some(network) => format!("{ETHEREUM_SMART_CONTRACT_PREFIX}{address}-{network}"),
            None => format!("{ETHEREUM_SMART_CONTRACT_PREFIX}{address}"),
        },
    }
}

/// Parse a serialized identity.
pub fn deserialize_identity(serialized: &str) -> Result<Identity, MultiFormatError> {
    let (prefix, payload) = split_prefix(serialized)?;
    match prefix {
        ETHEREUM_ADDRESS_PREFIX => {
            check_hex("ethereum address", payload, Some(ADDRESS_HEX_LENGTH))?;
            Ok(Identity::ethereum_address(format!(
                "0x{}",
                payload.to_ascii_lowercase()
            )))
        }
        ETHEREUM_SMART_CONTRACT_PREFIX => {
            let (address, network) = match payload.split_once('-') {
                Some((address, network)) if !network.is_empty() => {
                    (address, Some(network.to_string()))
                }
                Some(_) => {
                    return Err(MultiFormatError::MalformedPayload {
                        format: "ethereum smart contract",
                        reason: "empty network".to_string(),
                    })
                }
                None => (payload, None),
            };
            check_hex("ethereum smart contract", address, Some(ADDRESS_HEX_LENGTH))?;
            Ok(Identity::smart_contract(
                format!("0x{}", address.to_ascii_lowercase()),
                network,
            ))
        }
        KECCAK256_HASH_PREFIX
        | ECIES_ENCRYPTED_PREFIX
        | AES256_CBC_ENCRYPTED_PREFIX
        | AES256_GCM_ENCRYPTED_PREFIX => Err(unexpected("identity", prefix)),
        other => Err(MultiFormatError::UnknownPrefix(other.to_string())),
    }
}

/// Serialize ciphertext. ECIES hex is lowercased, base64 is kept verbatim.
pub fn serialize_encrypted_data(data: &EncryptedData) -> String {
    match data.method {
        EncryptionMethod::Ecies => format!(
            "{ECIES_ENCRYPTED_PREFIX}{}",
            data.value.to_ascii_lowercase()
        ),
        EncryptionMethod::Aes256Cbc => format!("{AES256_CBC_ENCRYPTED_PREFIX}{}", data.value),
        EncryptionMethod::Aes256Gcm => format!("{AES256_GCM_ENCRYPTED_PREFIX}{}", data.value),
    }
}

/// Parse serialized ciphertext.
pub fn deserialize_encrypted_data(serialized: &str) -> Result<EncryptedData, MultiFormatError> {
    let (prefix, payload) = split_prefix(serialized)?;
    let method = match prefix {
        ECIES_ENCRYPTED_PREFIX => {
            check_hex("ecies", payload, None)?;
            EncryptionMethod::Ecies
        }
        AES256_CBC_ENCRYPTED_PREFIX => EncryptionMethod::Aes256Cbc,
        AES256_GCM_ENCRYPTED_PREFIX => EncryptionMethod::Aes256Gcm,
        KECCAK256_HASH_PREFIX | ETHEREUM_ADDRESS_PREFIX | ETHEREUM_SMART_CONTRACT_PREFIX => {
            return Err(unexpected("encrypted data", prefix))
        }
        other => return Err(MultiFormatError::UnknownPrefix(other.to_string())),
    };
    if payload.is_empty() {
        return Err(MultiFormatError::MalformedPayload {
            format: "encrypted data",
            reason: "empty payload".to_string(),
        });
    }
    Ok(EncryptedData {
        method,
        value: payload.to_string(),
    })
}

// ===== HELPERS =====

fn strip_0x(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

fn split_prefix(serialized: &str) -> Result<(&str, &str), MultiFormatError> {
    if serialized.len() < PREFIX_LENGTH || !serialized.is_char_boundary(PREFIX_LENGTH) {
        return Err(MultiFormatError::TooShort(serialized.to_string()));
    }
    Ok(serialized.split_at(PREFIX_LENGTH))
}

fn check_hex(
    format: &'static str,
    payload: &str,
    expected_len: Option<usize>,
) -> Result<(), MultiFormatError> {
    if let Some(len) = expected_len {
        if payload.len() != len {
            return Err(MultiFormatError::MalformedPayload {
                format,
                reason: format!("expected {len} hex chars, got {}", payload.len()),
            });
        }
    }
    if payload.is_empty() || !payload.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MultiFormatError::MalformedPayload {
            format,
            reason: "not hexadecimal".to_string(),
        });
    }
    Ok(())
}

fn unexpected(expected: &'static str, actual: &str) -> MultiFormatError {
    MultiFormatError::UnexpectedPrefix {
        expected,
        actual: actual.to_string(),
    }
}
