//! # Symmetric Encryption
//!
//! AES-256-GCM with a 16-byte IV, the channel-key cipher.
//!
//! Sealed layout: `iv (16) ‖ tag (16) ‖ ciphertext`. The `aes-gcm` crate
//! appends the tag after the ciphertext, so `seal`/`open` reorder it.

use crate::CryptoError;
use aes_gcm::{
    aead::{consts::U16, Aead, KeyInit},
    aes::Aes256,
    AesGcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use zeroize::Zeroize;

type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Key size in bytes.
pub const KEY_LENGTH: usize = 32;
/// IV size in bytes.
pub const IV_LENGTH: usize = 16;
/// Authentication tag size in bytes.
pub const TAG_LENGTH: usize = 16;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_LENGTH]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Decode a base64 channel key.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let mut decoded = STANDARD
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        if decoded.len() != KEY_LENGTH {
            let actual = decoded.len();
            decoded.zeroize();
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_LENGTH,
                actual,
            });
        }
        let mut bytes = [0u8; KEY_LENGTH];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self(bytes))
    }

    /// Base64 form, as carried in `DecryptionParameters::key`.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

/// Fresh random channel key, base64 encoded.
pub fn generate_32_buffer_key() -> String {
    SecretKey::generate().to_base64()
}

/// Encrypt into `iv ‖ tag ‖ ciphertext`.
pub fn seal(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm16::new(key.as_bytes().into());
    let mut iv = [0u8; IV_LENGTH];
    rand::thread_rng().fill_bytes(&mut iv);

    let ct_and_tag = cipher
        .encrypt(Nonce::<U16>::from_slice(&iv), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let (ciphertext, tag) = ct_and_tag.split_at(ct_and_tag.len() - TAG_LENGTH);

    let mut sealed = Vec::with_capacity(IV_LENGTH + ct_and_tag.len());
    sealed.extend_from_slice(&iv);
    sealed.extend_from_slice(tag);
    sealed.extend_from_slice(ciphertext);
    Ok(sealed)
}

/// Decrypt `iv ‖ tag ‖ ciphertext`.
pub fn open(key: &SecretKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < IV_LENGTH + TAG_LENGTH {
        return Err(CryptoError::MalformedCiphertext);
    }
    let (iv, rest) = sealed.split_at(IV_LENGTH);
    let (tag, ciphertext) = rest.split_at(TAG_LENGTH);

    let mut ct_and_tag = Vec::with_capacity(rest.len());
    ct_and_tag.extend_from_slice(ciphertext);
    ct_and_tag.extend_from_slice(tag);

    let cipher = Aes256Gcm16::new(key.as_bytes().into());
    cipher
        .decrypt(Nonce::<U16>::from_slice(iv), ct_and_tag.as_slice())
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// AES-256-GCM encrypt a UTF-8 string under a base64 key. Output is base64.
pub fn aes256_gcm_encrypt(data: &str, key: &str) -> Result<String, CryptoError> {
    let key = SecretKey::from_base64(key)?;
    Ok(STANDARD.encode(seal(&key, data.as_bytes())?))
}

/// Inverse of [`aes256_gcm_encrypt`].
pub fn aes256_gcm_decrypt(encrypted: &str, key: &str) -> Result<String, CryptoError> {
    let key = SecretKey::from_base64(key)?;
    let sealed = STANDARD
        .decode(encrypted)
        .map_err(|_| CryptoError::MalformedCiphertext)?;
    let plaintext = open(&key, &sealed)?;
    String::from_utf8(plaintext).map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = generate_32_buffer_key();
        let encrypted = aes256_gcm_encrypt(r#"{"a":1}"#, &key).unwrap();
        assert_eq!(aes256_gcm_decrypt(&encrypted, &key).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_sealed_layout() {
        let key = SecretKey::generate();
        let sealed = seal(&key, b"hello").unwrap();
        assert_eq!(sealed.len(), IV_LENGTH + TAG_LENGTH + 5);
        assert_eq!(open(&key, &sealed).unwrap(), b"hello");
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = aes256_gcm_encrypt("secret", &generate_32_buffer_key()).unwrap();
        let result = aes256_gcm_decrypt(&encrypted, &generate_32_buffer_key());
        assert!(matches!(result, Err(CryptoError::DecryptionFailed(_))));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = SecretKey::generate();
        let mut sealed = seal(&key, b"Secret message").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;
        assert!(open(&key, &sealed).is_err());
    }

    #[test]
    fn test_truncated_ciphertext_is_malformed() {
        let key = generate_32_buffer_key();
        let short = STANDARD.encode([0u8; 20]);
        assert_eq!(
            aes256_gcm_decrypt(&short, &key),
            Err(CryptoError::MalformedCiphertext)
        );
    }

    #[test]
    fn test_key_must_be_32_bytes() {
        let result = aes256_gcm_encrypt("x", &STANDARD.encode([1u8; 16]));
        assert_eq!(
            result,
            Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 16
            })
        );
        assert!(matches!(
            aes256_gcm_encrypt("x", "not base64!"),
            Err(CryptoError::InvalidKeyEncoding(_))
        ));
    }

    #[test]
    fn test_keys_are_unique() {
        assert_ne!(generate_32_buffer_key(), generate_32_buffer_key());
    }
}
