//! # Adapters Module
//!
//! Implementations of the outbound ports.
//!
//! - `memory`: in-process [`DataAccess`](crate::ports::outbound::DataAccess)
//! - `time`: system and manual clocks

mod memory;
mod time;

pub use memory::InMemoryDataAccess;
pub use time::{ManualTimeSource, SystemTimeSource};
