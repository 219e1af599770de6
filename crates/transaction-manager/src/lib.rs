//! # Transaction Manager
//!
//! Persists JSON records into append-only channels and reads them back
//! cleaned: every record is either returned decrypted or ignored with a
//! reason.
//!
//! ## Channels
//!
//! ```text
//! channel id = 01 + keccak256(normalised JSON of the first record)
//!
//! clear channel:      {data} {data} {data} ...
//! encrypted channel:  {encryptedData, hash, encryptionMethod, keys} {encryptedData, hash} ...
//!                      └─ channel key wrapped per recipient (ECIES)
//! ```
//!
//! The first record that parses, validates and hashes to the channel id fixes
//! the channel type and, for encrypted channels, the AES-256-GCM channel key.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Transaction values, record factory, results, configuration
//! - `ports/` - Inbound API and outbound SPI (storage, decryption, time)
//! - `service/` - Record parser, channel parser and the manager service
//! - `adapters/` - In-memory storage and clocks
//!
//! ## Usage
//!
//! ```ignore
//! use transaction_manager::{InMemoryDataAccess, TransactionManager, TransactionManagerApi};
//!
//! let manager = TransactionManager::new(
//!     InMemoryDataAccess::new(),
//!     Some(Arc::new(provider)),
//!     TransactionManagerConfig::from_env(),
//! );
//! manager.persist_transaction(data, &channel_id, &topics).await?;
//! let channel = manager.get_transactions_by_channel_id(&channel_id, None).await?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main types
pub use adapters::{InMemoryDataAccess, ManualTimeSource, SystemTimeSource};
pub use domain::entities::{
    ChannelTypeAndKey, CleanedChannel, PersistTransactionMeta, ReturnGetChannels,
    ReturnGetTransactions, ReturnPersistTransaction,
};
pub use domain::errors::{FactoryError, TransactionError, TransactionManagerError};
pub use domain::factory::TransactionsFactory;
pub use domain::transaction::{ClearTransaction, EncryptedTransaction, Transaction, TransactionValue};
pub use domain::value_objects::{Pagination, PaginationMeta, TransactionManagerConfig};
pub use ports::inbound::TransactionManagerApi;
pub use ports::outbound::{
    ChannelMeta, ChannelTransactions, ChannelsByTopic, ChannelsMeta, DataAccess, DataAccessError,
    DecryptionProvider, DecryptionProviderError, PersistMeta, PersistResult, TimeSource,
};
pub use service::{ChannelParser, ParsedTransaction, TransactionManager, TransactionsParser};
