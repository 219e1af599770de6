//! # Ports Layer
//!
//! Hexagonal architecture ports: inbound (API) and outbound (SPI).

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
