//! # Inbound Port - NonceCacheApi
//!
//! Driving port used by transaction validation and the mempool.
//!
//! Batched read-then-write sequences are not part of this trait; they go
//! through `NonceCache::lock()` and the returned guard.

use crate::domain::{Address, Epoch, Nonce, NonceCacheError, Version};

/// Self-locking nonce cache API.
pub trait NonceCacheApi: Send + Sync {
    /// Next valid nonce for `address` in `epoch`, as far as the cache knows.
    fn get_nonce(&self, address: Address, epoch: Epoch) -> Nonce;

    /// Record `nonce` as used. Never lowers the tracked value.
    fn set_nonce(&self, address: Address, epoch: Epoch, nonce: Nonce);

    /// Move the fallback snapshot to the latest committed version.
    ///
    /// # Errors
    /// - `SnapshotUnavailable`: previous snapshot is kept
    fn reload_fallback(&self) -> Result<(), NonceCacheError>;

    /// Drop all cached entries.
    fn clear(&self);

    /// Version of the held snapshot.
    fn version(&self) -> Version;
}
