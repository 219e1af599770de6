//! # EPK Decryption
//!
//! A [`DecryptionProvider`](shared_types::DecryptionProvider) backed by
//! secp256k1 private keys registered in memory.
//!
//! Only ECIES-wrapped data and Ethereum-address identities are handled. An
//! identity is registered when the address derived from one of the keys
//! matches its value, compared lowercase.
//!
//! ## Usage
//!
//! ```ignore
//! let provider = EthereumPrivateKeyDecryptionProvider::new(Some(
//!     DecryptionParameters::ecies(private_key),
//! ))?;
//! let manager = TransactionManager::new(storage, Some(Arc::new(provider)), config);
//! ```

pub mod errors;
pub mod provider;

pub use errors::EpkDecryptionError;
pub use provider::EthereumPrivateKeyDecryptionProvider;
