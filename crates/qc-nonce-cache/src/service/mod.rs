//! # Nonce Cache Service
//!
//! Concurrency facade over the entry store and the snapshot provider.
//!
//! ## Two API Tiers
//!
//! | Tier | Entry point | Locking |
//! |------|-------------|---------|
//! | Self-locking | `NonceCache::{get_nonce, set_nonce, clear, reload_fallback}` | Acquires and releases per call |
//! | Caller holds lock | `NonceCacheGuard::{get_nonce, set_nonce, ...}` | Requires `NonceCache::lock()` |
//!
//! The guard is the only way to reach the lock-free tier, so lock-free calls
//! cannot run without the lock. The lock is not reentrant: calling the
//! self-locking tier while a guard is alive on the same thread deadlocks.

mod entry_store;
mod snapshot;

pub use entry_store::EntryStore;
pub use snapshot::SnapshotProvider;

use crate::adapters::TracingObserver;
use crate::domain::{
    Address, CacheStats, Epoch, Nonce, NonceCacheConfig, NonceCacheError, ResolveEvent,
    SetNonceEvent, Version,
};
use crate::ports::{NonceCacheApi, NonceObserver, StateStore};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// State protected by the cache lock.
struct CacheState {
    snapshot: SnapshotProvider,
    entries: EntryStore,
    watched: Option<Address>,
}

/// Identity and sink for diagnostic events. Immutable after construction.
struct Diagnostics {
    cache_id: Uuid,
    observer: Arc<dyn NonceObserver>,
}

/// Epoch-aware nonce cache.
///
/// A single mutex covers the entry store, the snapshot and the watched
/// address. Critical sections are in-memory map lookups, except
/// `reload_fallback`, which calls into the store with the lock held.
pub struct NonceCache {
    state: Mutex<CacheState>,
    diagnostics: Diagnostics,
}

impl NonceCache {
    /// Create a cache bound to the latest committed version of `store`.
    ///
    /// # Errors
    /// - `SnapshotUnavailable`: the store cannot produce a read-only view
    pub fn new(store: Arc<dyn StateStore>) -> Result<Self, NonceCacheError> {
        Self::with_config(store, NonceCacheConfig::default())
    }

    /// Create a cache from explicit configuration.
    pub fn with_config(
        store: Arc<dyn StateStore>,
        config: NonceCacheConfig,
    ) -> Result<Self, NonceCacheError> {
        let snapshot = SnapshotProvider::at_version(store, config.snapshot_version)?;
        let cache_id = Uuid::new_v4();

        info!(
            cache_id = %cache_id,
            version = snapshot.version(),
            epoch = snapshot.epoch(),
            "[qc-nonce-cache] Nonce cache created"
        );

        Ok(Self {
            state: Mutex::new(CacheState {
                snapshot,
                entries: EntryStore::new(),
                watched: config.watched_address,
            }),
            diagnostics: Diagnostics {
                cache_id,
                observer: Arc::new(TracingObserver),
            },
        })
    }

    /// Replace the diagnostics observer.
    pub fn with_observer(mut self, observer: Arc<dyn NonceObserver>) -> Self {
        self.diagnostics.observer = observer;
        self
    }

    /// Tracked nonce for `(address, epoch)`.
    ///
    /// May create or rebuild the entry, so this takes the lock exclusively.
    pub fn get_nonce(&self, address: Address, epoch: Epoch) -> Nonce {
        self.lock().get_nonce(address, epoch)
    }

    /// Raise the tracked nonce for `(address, epoch)` to `nonce`.
    ///
    /// Never lowers it.
    pub fn set_nonce(&self, address: Address, epoch: Epoch, nonce: Nonce) {
        self.lock().set_nonce(address, epoch, nonce);
    }

    /// `set_nonce` for a caller that already holds the lock.
    pub fn set_nonce_lock_free(
        guard: &mut NonceCacheGuard<'_>,
        address: Address,
        epoch: Epoch,
        nonce: Nonce,
    ) {
        guard.set_nonce(address, epoch, nonce);
    }

    /// Acquire the cache lock for a batch of operations.
    ///
    /// Use the guard's methods inside the batch. The lock is released when
    /// the guard is dropped or passed to [`NonceCache::unlock`].
    pub fn lock(&self) -> NonceCacheGuard<'_> {
        NonceCacheGuard {
            state: self.state.lock(),
            diagnostics: &self.diagnostics,
        }
    }

    /// Release a lock taken with [`NonceCache::lock`].
    pub fn unlock(guard: NonceCacheGuard<'_>) {
        drop(guard);
    }

    /// Point the snapshot at the latest committed version.
    ///
    /// Cached entries are left alone; staleness is picked up per key on next
    /// access. On failure the previous snapshot stays in place.
    pub fn reload_fallback(&self) -> Result<(), NonceCacheError> {
        self.lock().reload_fallback()
    }

    /// Drop every cached entry. The snapshot is untouched.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Version of the held snapshot.
    pub fn version(&self) -> Version {
        self.state.lock().snapshot.version()
    }

    /// Store epoch at the held snapshot.
    pub fn epoch(&self) -> Epoch {
        self.state.lock().snapshot.epoch()
    }

    /// Address currently singled out for verbose tracing.
    pub fn watched_address(&self) -> Option<Address> {
        self.state.lock().watched
    }

    /// Single out `address` for verbose tracing. `None` disables it.
    pub fn set_watched_address(&self, address: Option<Address>) {
        self.state.lock().watched = address;
    }

    /// Identity of this cache instance in diagnostic events.
    pub fn cache_id(&self) -> Uuid {
        self.diagnostics.cache_id
    }

    /// Entry counts plus the held snapshot's version and epoch.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }
}

impl NonceCacheApi for NonceCache {
    fn get_nonce(&self, address: Address, epoch: Epoch) -> Nonce {
        NonceCache::get_nonce(self, address, epoch)
    }

    fn set_nonce(&self, address: Address, epoch: Epoch, nonce: Nonce) {
        NonceCache::set_nonce(self, address, epoch, nonce)
    }

    fn reload_fallback(&self) -> Result<(), NonceCacheError> {
        NonceCache::reload_fallback(self)
    }

    fn clear(&self) {
        NonceCache::clear(self)
    }

    fn version(&self) -> Version {
        NonceCache::version(self)
    }
}

/// Exclusive access to the cache for the lifetime of the guard.
///
/// Methods here do not lock; they are the lock-free tier.
pub struct NonceCacheGuard<'a> {
    state: MutexGuard<'a, CacheState>,
    diagnostics: &'a Diagnostics,
}

impl NonceCacheGuard<'_> {
    /// Tracked nonce for `(address, epoch)`.
    pub fn get_nonce(&mut self, address: Address, epoch: Epoch) -> Nonce {
        let state = &mut *self.state;
        let watched = state.watched == Some(address);
        let version = state.snapshot.version();

        let (entry, outcome) = state.entries.resolve(&state.snapshot, address, epoch);
        let nonce = entry.tracked_nonce;

        if watched {
            self.diagnostics.observer.on_entry_resolved(&ResolveEvent {
                address,
                epoch,
                outcome,
                nonce,
                version,
                cache_id: self.diagnostics.cache_id,
            });
        }
        nonce
    }

    /// Raise the tracked nonce for `(address, epoch)` to `nonce`.
    pub fn set_nonce(&mut self, address: Address, epoch: Epoch, nonce: Nonce) {
        let state = &mut *self.state;
        let watched = state.watched == Some(address);
        let version = state.snapshot.version();

        let (entry, outcome) = state.entries.resolve(&state.snapshot, address, epoch);
        let current = entry.tracked_nonce;
        let tracked = entry.bump(nonce);

        if watched {
            let observer = &self.diagnostics.observer;
            let cache_id = self.diagnostics.cache_id;
            observer.on_entry_resolved(&ResolveEvent {
                address,
                epoch,
                outcome,
                nonce: current,
                version,
                cache_id,
            });
            observer.on_nonce_set(&SetNonceEvent {
                address,
                epoch,
                current,
                requested: nonce,
                tracked,
                version,
                cache_id,
            });
        }
    }

    /// See [`NonceCache::reload_fallback`].
    pub fn reload_fallback(&mut self) -> Result<(), NonceCacheError> {
        let previous = self.state.snapshot.version();
        match self.state.snapshot.reload() {
            Ok(()) => {
                debug!(
                    cache_id = %self.diagnostics.cache_id,
                    previous,
                    version = self.state.snapshot.version(),
                    "[qc-nonce-cache] Snapshot reloaded"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    cache_id = %self.diagnostics.cache_id,
                    version = previous,
                    error = %err,
                    "[qc-nonce-cache] Snapshot reload failed, keeping previous view"
                );
                Err(err)
            }
        }
    }

    /// See [`NonceCache::clear`].
    pub fn clear(&mut self) {
        let dropped = self.state.entries.clear();
        debug!(
            cache_id = %self.diagnostics.cache_id,
            dropped,
            "[qc-nonce-cache] Cache cleared"
        );
    }

    /// See [`NonceCache::version`].
    pub fn version(&self) -> Version {
        self.state.snapshot.version()
    }

    /// See [`NonceCache::epoch`].
    pub fn epoch(&self) -> Epoch {
        self.state.snapshot.epoch()
    }

    /// See [`NonceCache::stats`].
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            addresses: self.state.entries.addresses(),
            entries: self.state.entries.len(),
            version: self.state.snapshot.version(),
            epoch: self.state.snapshot.epoch(),
        }
    }
}
