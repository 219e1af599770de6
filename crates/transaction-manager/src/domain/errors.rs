//! # Domain Errors
//!
//! Three families:
//!
//! - [`TransactionError`]: a single persisted record is unusable. Never
//!   fatal; its `Display` text becomes the `reason` of an ignored record.
//! - [`FactoryError`]: a caller asked the factory for something impossible.
//! - [`TransactionManagerError`]: orchestration failures raised to the caller.

use shared_crypto::CryptoError;
use shared_types::EncryptionMethod;
use thiserror::Error;

use crate::ports::outbound::DataAccessError;

/// Why a persisted record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// Neither `data` nor `encryptedData`.
    #[error("Transaction must have a property \"data\" or \"encryptedData\"")]
    MissingPayload,

    /// Clear record in a channel fixed to encrypted.
    #[error("Clear transactions are not allowed in encrypted channel")]
    EncryptedOnlyChannel,

    /// Encrypted record in a channel fixed to clear.
    #[error("Encrypted transactions are not allowed in clear channel")]
    ClearOnlyChannel,

    /// Clear record that also carries encrypted-only fields.
    #[error("only the property \"data\" is allowed for clear transaction")]
    MalformedClearTransaction,

    /// Encrypted record without `hash`.
    #[error("the property \"hash\" is needed for encrypted transaction")]
    MissingHash,

    /// First encrypted record without `encryptionMethod` and `keys`.
    #[error("the properties \"encryptionMethod\" and \"keys\" are needed to compute the channel key")]
    MissingKeyMaterial,

    /// Later encrypted record that repeats key material.
    #[error("the properties \"encryptionMethod\" and \"keys\" have already been given for this channel")]
    KeyMaterialAlreadyEstablished,

    /// Encrypted channel but no provider configured.
    #[error("No decryption provider given")]
    NoDecryptionProvider,

    /// Channel encryption method other than `ecies-aes256-gcm`.
    #[error("Encryption method not supported: {0}")]
    UnsupportedMethod(String),

    /// No recipient entry could be unwrapped. Carries the last provider error.
    #[error("Impossible to decrypt the channel key from this transaction ({0})")]
    ChannelKeyUnrecoverable(String),

    /// Clear `data` is not JSON.
    #[error("Impossible to JSON parse the transaction")]
    NotParsable,

    /// `encryptedData` could not be opened with the channel key.
    #[error("Impossible to decrypt the transaction ({0})")]
    DecryptionFailed(String),

    /// Decrypted plaintext is not JSON.
    #[error("Impossible to JSON parse the decrypted transaction data")]
    DecryptedNotParsable,

    /// First valid candidate does not hash to the channel id.
    #[error("as first transaction, the hash of the transaction do not match the channelId")]
    HashMismatch,
}

impl TransactionError {
    /// Whether the record failed only because this reader cannot recover the
    /// channel key.
    pub fn is_key_unavailable(&self) -> bool {
        matches!(
            self,
            TransactionError::NoDecryptionProvider | TransactionError::ChannelKeyUnrecoverable(_)
        )
    }
}

/// Caller misuse when building a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// Payload is not JSON.
    #[error("Data not parsable")]
    DataNotParsable,

    /// A recipient uses something other than ECIES.
    #[error("encryptionParams method must be all: ecies")]
    UnsupportedEncryptionMethod,

    /// New encrypted channel without recipients.
    #[error("at least one recipient is needed to create an encrypted channel")]
    NoRecipients,

    /// Channel key is not an AES-256-GCM key.
    #[error("encryption method not supported for the channel key: {0}")]
    UnsupportedChannelKeyMethod(EncryptionMethod),

    /// Underlying cipher failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Errors raised by the transaction manager to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionManagerError {
    /// Empty channel id.
    #[error("channel id is required")]
    MissingChannelId,

    /// Page or page size of zero.
    #[error("page and page size must be greater than zero")]
    InvalidPagination,

    /// Appending to a channel with no valid first record.
    #[error("Impossible to retrieve the channel: {0}")]
    ChannelNotFound(String),

    /// Appending encrypted data to a clear channel.
    #[error("cannot add an encrypted transaction to the clear channel: {0}")]
    ChannelIsClear(String),

    /// Appending to an encrypted channel whose key this reader cannot recover.
    #[error("Impossible to decrypt the channel key of: {0}")]
    ChannelKeyUnavailable(String),

    /// Recipients given for a channel that already distributed its key.
    #[error("recipients can only be set on the first transaction of channel: {0}")]
    RecipientsOnExistingChannel(String),

    /// Factory rejected the input.
    #[error(transparent)]
    Factory(#[from] FactoryError),

    /// Storage collaborator failed.
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}
