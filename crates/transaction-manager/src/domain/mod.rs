//! # Domain Layer
//!
//! Transaction values, the record factory, results and configuration.
//! No I/O.

pub mod entities;
pub mod errors;
pub mod factory;
pub mod transaction;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use factory::TransactionsFactory;
pub use transaction::*;
pub use value_objects::*;
