use shared_types::IdentityType;
use thiserror::Error;

/// Key registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EpkDecryptionError {
    /// Decryption parameters of a method other than ECIES.
    #[error("Encryption method not supported {0}")]
    UnsupportedMethod(String),

    /// Identity of a type other than Ethereum address.
    #[error("Identity type not supported {0}")]
    UnsupportedIdentityType(IdentityType),

    /// Key is not a 32-byte secp256k1 scalar.
    #[error("The private key must be a string representing 32 bytes")]
    InvalidPrivateKey,
}
