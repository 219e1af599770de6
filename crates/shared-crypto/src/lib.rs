//! # Shared Crypto - Channel Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | keccak256 over normalised JSON | Channel ids, transaction hashes |
//! | `symmetric` | AES-256-GCM (16-byte IV) | Channel-key encryption of records |
//! | `ecies` | secp256k1 ECDH + SHA-512 + AES-256-GCM | Per-recipient channel-key wrapping |
//! | `address` | keccak256 of secp256k1 point | Recipient identities |
//! | `encryption` | dispatch on `EncryptionMethod` | Factory and providers |
//!
//! ## Security Properties
//!
//! - **AES-GCM**: fresh random IV per message, authenticated
//! - **ECIES**: fresh ephemeral key per wrap, so wrapping is randomized
//! - Key buffers are zeroized on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod ecies;
pub mod encryption;
pub mod errors;
pub mod hashing;
pub mod symmetric;

// Re-exports
pub use address::{address_from_private_key, address_from_public_key};
pub use encryption::{decrypt, encrypt, identity_from_encryption_params};
pub use errors::CryptoError;
pub use hashing::{channel_hash, keccak256, normalize, normalize_keccak256_hash};
pub use symmetric::{generate_32_buffer_key, SecretKey};
