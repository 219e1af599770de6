//! # Shared Types Crate
//!
//! Types exchanged between the transaction manager, its storage collaborator
//! and its decryption providers.
//!
//! ## Design Principles
//!
//! - **Wire shapes are loose**: `PersistedTransaction` keeps every field
//!   optional so that malformed or adversarial records survive deserialization
//!   and can be rejected with a reason instead of an opaque serde error.
//! - **Strings on the wire**: hashes, identities and encrypted payloads are
//!   carried in their multi-format string form (see [`multiformat`]).
//! - **Providers are ports**: decryption is a pluggable capability
//!   ([`DecryptionProvider`]), never a global.

pub mod encryption;
pub mod errors;
pub mod hash;
pub mod identity;
pub mod multiformat;
pub mod providers;
pub mod transaction;

pub use encryption::*;
pub use errors::*;
pub use hash::*;
pub use identity::*;
pub use providers::*;
pub use transaction::*;

/// A multi-formatted channel identifier (serialized content hash).
pub type ChannelId = String;
