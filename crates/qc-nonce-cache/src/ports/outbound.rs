//! # Outbound Ports
//!
//! Dependencies of the nonce cache: the authoritative state store and the
//! diagnostics sink.

use crate::domain::{
    AccountRef, Address, Epoch, NonceCacheError, ResolveEvent, SetNonceEvent, Version,
};
use parking_lot::Mutex;

/// Authoritative state store - outbound port.
///
/// The cache only ever asks for read-only views. How accounts are persisted
/// and how the epoch is computed is the store's business.
pub trait StateStore: Send + Sync {
    /// Open a read-only view at `version` (`LATEST_VERSION` = latest committed).
    ///
    /// # Errors
    /// - `SnapshotUnavailable`: the store cannot produce a view at `version`
    fn readonly(&self, version: Version) -> Result<Box<dyn StateSnapshot>, NonceCacheError>;
}

/// Read-only, versioned view of the account store.
///
/// Implementations must be immutable: every call returns data as of the
/// moment the view was captured.
pub trait StateSnapshot: Send + Sync {
    /// Version this view is bound to.
    fn version(&self) -> Version;

    /// Store-wide current epoch at this version.
    fn epoch(&self) -> Epoch;

    /// Account at this version, or a zero-state placeholder if absent.
    fn get_or_new_account(&self, address: &Address) -> AccountRef;

    /// Account at this version, `None` if absent.
    fn get_account(&self, address: &Address) -> Option<AccountRef>;
}

/// Diagnostics sink for the watched address.
///
/// Called with the cache lock held. Implementations must not call back into
/// the cache.
pub trait NonceObserver: Send + Sync {
    /// An entry was resolved (created, kept or rebuilt).
    fn on_entry_resolved(&self, _event: &ResolveEvent) {}

    /// A nonce write was applied.
    fn on_nonce_set(&self, _event: &SetNonceEvent) {}
}

/// Observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl NonceObserver for NoopObserver {}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Observer that records every event, for tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    resolved: Mutex<Vec<ResolveEvent>>,
    set: Mutex<Vec<SetNonceEvent>>,
}

impl RecordingObserver {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve events seen so far.
    pub fn resolved(&self) -> Vec<ResolveEvent> {
        self.resolved.lock().clone()
    }

    /// Set-nonce events seen so far.
    pub fn set_events(&self) -> Vec<SetNonceEvent> {
        self.set.lock().clone()
    }
}

impl NonceObserver for RecordingObserver {
    fn on_entry_resolved(&self, event: &ResolveEvent) {
        self.resolved.lock().push(event.clone());
    }

    fn on_nonce_set(&self, event: &SetNonceEvent) {
        self.set.lock().push(event.clone());
    }
}
