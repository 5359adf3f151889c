//! Value objects exposed for diagnostics.

use super::{Address, Epoch, Nonce, Version};
use uuid::Uuid;

/// How an entry was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Address was not cached; read from state.
    NewAddress,
    /// Address cached, epoch was not; read from state.
    NewEpoch,
    /// Existing entry kept.
    Kept {
        /// Snapshot nonce, `None` when the account is absent from the snapshot.
        state_nonce: Option<Nonce>,
    },
    /// Snapshot nonce was higher; entry rebuilt.
    Rebuilt {
        /// Snapshot nonce the entry was rebuilt from.
        state_nonce: Nonce,
        /// Tracked nonce before the rebuild.
        previous: Nonce,
    },
}

/// Emitted after an entry has been resolved for a watched address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveEvent {
    /// Watched address.
    pub address: Address,
    /// Requested epoch.
    pub epoch: Epoch,
    /// How the entry was found or built.
    pub outcome: ResolveOutcome,
    /// Tracked nonce after resolution.
    pub nonce: Nonce,
    /// Version of the held snapshot.
    pub version: Version,
    /// Cache instance that emitted the event.
    pub cache_id: Uuid,
}

/// Emitted when a watched address has its nonce set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetNonceEvent {
    /// Watched address.
    pub address: Address,
    /// Requested epoch.
    pub epoch: Epoch,
    /// Tracked nonce before the write.
    pub current: Nonce,
    /// Nonce the caller asked for.
    pub requested: Nonce,
    /// Tracked nonce after the write.
    pub tracked: Nonce,
    /// Version of the held snapshot.
    pub version: Version,
    /// Cache instance that emitted the event.
    pub cache_id: Uuid,
}

/// Cache statistics for monitoring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached addresses.
    pub addresses: usize,
    /// Number of cached (address, epoch) entries.
    pub entries: usize,
    /// Version of the held snapshot.
    pub version: Version,
    /// Store epoch at the held snapshot.
    pub epoch: Epoch,
}
