//! # Ethereum Addresses (secp256k1)
//!
//! `address = keccak256(uncompressed_point[1..])[12..]`, rendered as `0x`
//! followed by 40 lowercase hex chars. Identities in a channel's `keys`
//! map are derived this way from recipient public keys.

use crate::ecies::{parse_private_key, parse_public_key};
use crate::hashing::keccak256;
use crate::CryptoError;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;

/// Address length in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Address of a parsed public key.
pub fn address_from_point(public_key: &PublicKey) -> String {
    let uncompressed = public_key.to_encoded_point(false);
    // Skip the 0x04 SEC1 tag.
    let hash = keccak256(&uncompressed.as_bytes()[1..]);
    format!("0x{}", hex::encode(&hash[32 - ADDRESS_LENGTH..]))
}

/// Address of a hex public key (64 raw, 65 uncompressed or 33 compressed bytes).
pub fn address_from_public_key(public_key: &str) -> Result<String, CryptoError> {
    Ok(address_from_point(&parse_public_key(public_key)?))
}

/// Address owning a hex private key.
pub fn address_from_private_key(private_key: &str) -> Result<String, CryptoError> {
    let secret = parse_private_key(private_key)?;
    Ok(address_from_point(&secret.public_key()))
}

/// Uncompressed public key (hex, 64 bytes without the SEC1 tag) of a private key.
pub fn public_key_from_private_key(private_key: &str) -> Result<String, CryptoError> {
    let secret = parse_private_key(private_key)?;
    let point = secret.public_key().to_encoded_point(false);
    Ok(hex::encode(&point.as_bytes()[1..]))
}
