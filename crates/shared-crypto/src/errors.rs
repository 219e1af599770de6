//! Crypto error types.

use shared_types::EncryptionMethod;
use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Input to a hash is not JSON
    #[error("Data is not JSON: {0}")]
    NotJson(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (authentication or encoding)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Ciphertext layout does not match the method
    #[error("The encrypted data is not well formatted")]
    MalformedCiphertext,

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Key is not valid base64/hex
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Method recognised but not implemented
    #[error("Encryption method not supported: {0}")]
    UnsupportedMethod(EncryptionMethod),

    /// Decryption parameters do not match the ciphertext
    #[error("decryptionParams.method should be {expected}, got {actual}")]
    MethodMismatch {
        /// Method of the ciphertext
        expected: EncryptionMethod,
        /// Method of the supplied key
        actual: EncryptionMethod,
    },
}
