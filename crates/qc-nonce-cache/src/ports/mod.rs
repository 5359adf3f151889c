//! Ports layer for the nonce cache.
//!
//! - Inbound (Driving) ports: API exposed to the mempool
//! - Outbound (Driven) ports: state store and diagnostics sink

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
