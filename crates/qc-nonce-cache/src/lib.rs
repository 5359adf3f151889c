//! # QC Nonce Cache
//!
//! Epoch-aware account nonce cache in front of the authoritative state store.
//!
//! **Consumers:** Mempool admission, transaction validation
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Purpose
//!
//! Answers "what is the next valid nonce for account A in epoch E" without a
//! state lookup per transaction. Callers may advance nonces optimistically
//! ahead of the store committing them; the cache never reports a nonce lower
//! than the store would for the same epoch.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Monotonic tracked nonce | `domain/entities.rs` - `CacheEntry::bump()` |
//! | Never behind the store | `service/entry_store.rs` - `EntryStore::resolve()` |
//! | Epoch rollover resets to zero | `domain/entities.rs` - `CacheEntry::build()` |
//! | One entry per (address, epoch) | `service/entry_store.rs` - nested `HashMap` |
//!
//! ## Resolve Flow
//!
//! ```text
//! get_nonce / set_nonce
//!        │
//!        ↓
//!   [NonceCache lock] ──→ EntryStore::resolve(addr, epoch)
//!                               │
//!                ┌──────────────┼──────────────┐
//!                ↓              ↓              ↓
//!           NewAddress      NewEpoch     Kept / Rebuilt
//!                └──────→ SnapshotProvider ←───┘
//!                               │
//!                          StateStore (port)
//! ```
//!
//! ## Batching
//!
//! ```rust,ignore
//! let mut guard = cache.lock();
//! let nonce = guard.get_nonce(sender, epoch);
//! if nonce + 1 == tx.nonce {
//!     guard.set_nonce(sender, epoch, tx.nonce);
//! }
//! NonceCache::unlock(guard);
//! ```
//!
//! Never call `cache.get_nonce()` / `cache.set_nonce()` while holding a guard
//! on the same thread: the lock is not reentrant.
//!
//! ## Module Structure
//!
//! ```text
//! qc-nonce-cache/
//! ├── domain/     # CacheEntry, AccountState, config, errors, events
//! ├── ports/      # NonceCacheApi, StateStore, StateSnapshot, NonceObserver
//! ├── service/    # NonceCache, NonceCacheGuard, EntryStore, SnapshotProvider
//! └── adapters/   # InMemoryStateStore, TracingObserver
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryStateStore, TracingObserver};
pub use domain::*;
pub use ports::*;
pub use service::{EntryStore, NonceCache, NonceCacheGuard, SnapshotProvider};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
