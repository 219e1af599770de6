//! # Decryption Provider Port
//!
//! Unwraps per-recipient channel keys. The transaction manager only ever
//! talks to this trait; key storage and the asymmetric primitives live
//! behind it.

use async_trait::async_trait;
use thiserror::Error;

use crate::encryption::{EncryptedData, EncryptionMethod};
use crate::identity::{Identity, IdentityType};

/// Errors a decryption provider may report.
///
/// The `Display` text ends up inside ignore reasons, so it is kept short.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptionProviderError {
    /// No key registered for the identity.
    #[error("private key unknown for the identity: {0}")]
    IdentityNotRegistered(String),

    /// The provider cannot handle this ciphertext method.
    #[error("The data must be encrypted with {expected}")]
    UnsupportedMethod { expected: EncryptionMethod },

    /// The provider cannot handle this identity type.
    #[error("Identity type not supported: {0}")]
    UnsupportedIdentityType(IdentityType),

    /// The underlying cipher failed.
    #[error("{0}")]
    Decryption(String),
}

/// Capability to decrypt data wrapped for a registered identity.
#[async_trait]
pub trait DecryptionProvider: Send + Sync {
    /// Ciphertext methods this provider can open.
    fn supported_methods(&self) -> &[EncryptionMethod];

    /// Identity types this provider can hold keys for.
    fn supported_identity_types(&self) -> &[IdentityType];

    /// Whether a key is registered for `identity`.
    async fn is_identity_registered(&self, identity: &Identity) -> bool;

    /// Decrypt `encrypted` with the key registered for `identity`.
    async fn decrypt(
        &self,
        encrypted: &EncryptedData,
        identity: &Identity,
    ) -> Result<String, DecryptionProviderError>;
}
