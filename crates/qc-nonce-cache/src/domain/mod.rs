//! # Domain Layer - Nonce Cache
//!
//! - `entities`: CacheEntry, AccountState, build and staleness rules
//! - `value_objects`: diagnostic events, CacheStats
//! - `config`: NonceCacheConfig
//! - `errors`: NonceCacheError

pub mod config;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use value_objects::*;
