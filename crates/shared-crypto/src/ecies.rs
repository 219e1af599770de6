//! # ECIES (secp256k1)
//!
//! Wraps channel keys for a recipient public key.
//!
//! ## Construction
//!
//! 1. Fresh ephemeral secp256k1 key, ECDH against the recipient key.
//! 2. SHA-512 of the shared x-coordinate; the first 32 bytes key AES-256-GCM.
//! 3. Output `hex(ephemeral_pub_compressed (33) ‖ iv (16) ‖ tag (16) ‖ ciphertext)`.

use crate::symmetric::{open, seal, SecretKey, IV_LENGTH, KEY_LENGTH, TAG_LENGTH};
use crate::CryptoError;
use k256::ecdh::{diffie_hellman, EphemeralSecret};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

const COMPRESSED_POINT_LENGTH: usize = 33;

/// Parse a hex public key: 64 raw bytes, 65 uncompressed or 33 compressed.
pub fn parse_public_key(public_key: &str) -> Result<PublicKey, CryptoError> {
    let bytes = decode_hex(public_key).map_err(|_| CryptoError::InvalidPublicKey)?;
    let sec1 = if bytes.len() == 64 {
        let mut prefixed = Vec::with_capacity(65);
        prefixed.push(0x04);
        prefixed.extend_from_slice(&bytes);
        prefixed
    } else {
        bytes
    };
    PublicKey::from_sec1_bytes(&sec1).map_err(|_| CryptoError::InvalidPublicKey)
}

/// Parse a hex private key (32 bytes, `0x` optional).
pub fn parse_private_key(private_key: &str) -> Result<k256::SecretKey, CryptoError> {
    let mut bytes = decode_hex(private_key).map_err(|_| CryptoError::InvalidPrivateKey)?;
    let key = k256::SecretKey::from_slice(&bytes).map_err(|_| CryptoError::InvalidPrivateKey);
    bytes.zeroize();
    key
}

/// Encrypt `data` for `public_key`. Returns lowercase hex.
pub fn ecies_encrypt(public_key: &str, data: &str) -> Result<String, CryptoError> {
    let recipient = parse_public_key(public_key)?;
    let ephemeral = EphemeralSecret::random(&mut rand::thread_rng());
    let ephemeral_public = ephemeral.public_key().to_encoded_point(true);

    let shared = ephemeral.diffie_hellman(&recipient);
    let key = derive_key(shared.raw_secret_bytes().as_slice());
    let sealed = seal(&key, data.as_bytes())?;

    let mut out = Vec::with_capacity(COMPRESSED_POINT_LENGTH + sealed.len());
    out.extend_from_slice(ephemeral_public.as_bytes());
    out.extend_from_slice(&sealed);
    Ok(hex::encode(out))
}

/// Decrypt hex produced by [`ecies_encrypt`] with the matching private key.
pub fn ecies_decrypt(private_key: &str, encrypted: &str) -> Result<String, CryptoError> {
    let secret = parse_private_key(private_key)?;
    let bytes = hex::decode(encrypted).map_err(|_| CryptoError::MalformedCiphertext)?;
    if bytes.len() < COMPRESSED_POINT_LENGTH + IV_LENGTH + TAG_LENGTH {
        return Err(CryptoError::MalformedCiphertext);
    }
    let (ephemeral, sealed) = bytes.split_at(COMPRESSED_POINT_LENGTH);
    let ephemeral =
        PublicKey::from_sec1_bytes(ephemeral).map_err(|_| CryptoError::MalformedCiphertext)?;

    let shared = diffie_hellman(secret.to_nonzero_scalar(), ephemeral.as_affine());
    let key = derive_key(shared.raw_secret_bytes().as_slice());
    let plaintext = open(&key, sealed)?;
    String::from_utf8(plaintext).map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

fn derive_key(shared_x: &[u8]) -> SecretKey {
    let digest = Sha512::digest(shared_x);
    let mut key = [0u8; KEY_LENGTH];
    key.copy_from_slice(&digest[..KEY_LENGTH]);
    SecretKey::from_bytes(key)
}

fn decode_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &str = "0x04674d2e53e0e14653487d7323cc5f0a7959c83067f5654cafe4094bde90fa8a";
    const PUBLIC_KEY: &str = "299708c07399c9b28e9870c4e643742f65c94683f35d1b3fc05d0478344ee0cc5a6a5e23f78b5ff8c93a04254232b32350c8672d2873677060d5095184dad422";
    const OTHER_PRIVATE_KEY: &str =
        "0x0906ff14227cead2b25811514302d57706e7d5013fcc40eca5985b216baeb998";

    #[test]
    fn test_roundtrip_with_raw_public_key() {
        let encrypted = ecies_encrypt(PUBLIC_KEY, "channel key").unwrap();
        assert_eq!(ecies_decrypt(PRIVATE_KEY, &encrypted).unwrap(), "channel key");
    }

    #[test]
    fn test_accepts_uncompressed_and_compressed_keys() {
        let uncompressed = format!("04{PUBLIC_KEY}");
        let compressed = hex::encode(
            parse_public_key(PUBLIC_KEY)
                .unwrap()
                .to_encoded_point(true)
                .as_bytes(),
        );
        for key in [uncompressed, compressed] {
            let encrypted = ecies_encrypt(&key, "x").unwrap();
            assert_eq!(ecies_decrypt(PRIVATE_KEY, &encrypted).unwrap(), "x");
        }
    }

    #[test]
    fn test_encryption_is_randomized() {
        let a = ecies_encrypt(PUBLIC_KEY, "same").unwrap();
        let b = ecies_encrypt(PUBLIC_KEY, "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_private_key_fails() {
        let encrypted = ecies_encrypt(PUBLIC_KEY, "secret").unwrap();
        assert!(matches!(
            ecies_decrypt(OTHER_PRIVATE_KEY, &encrypted),
            Err(CryptoError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_malformed_ciphertext() {
        let err = ecies_decrypt(PRIVATE_KEY, "abcd").unwrap_err();
        assert_eq!(err.to_string(), "The encrypted data is not well formatted");
        assert_eq!(
            ecies_decrypt(PRIVATE_KEY, "zz"),
            Err(CryptoError::MalformedCiphertext)
        );
    }

    #[test]
    fn test_invalid_keys() {
        assert_eq!(
            ecies_encrypt("1234", "x"),
            Err(CryptoError::InvalidPublicKey)
        );
        assert_eq!(
            ecies_decrypt("0x00", "abcd"),
            Err(CryptoError::InvalidPrivateKey)
        );
    }
}
