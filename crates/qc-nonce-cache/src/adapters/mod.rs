//! Adapters for the nonce cache ports.
//!
//! - `InMemoryStateStore`: versioned in-memory `StateStore`
//! - `TracingObserver`: `NonceObserver` backed by `tracing`

pub mod memory_store;
pub mod tracing_observer;

pub use memory_store::*;
pub use tracing_observer::*;
