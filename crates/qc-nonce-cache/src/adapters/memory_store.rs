//! In-memory versioned state store.
//!
//! Implements the `StateStore` port. Every commit produces a new immutable
//! version; snapshots share account records with the versions they came from.

use crate::domain::{
    AccountRef, AccountState, Address, Epoch, NonceCacheError, SnapshotFailure, Version,
    LATEST_VERSION,
};
use crate::ports::{StateSnapshot, StateStore};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// One committed version of the account set.
#[derive(Debug)]
struct StateVersion {
    version: Version,
    epoch: Epoch,
    accounts: HashMap<Address, AccountRef>,
}

#[derive(Debug, Default)]
struct StoreInner {
    versions: BTreeMap<Version, Arc<StateVersion>>,
    next_version: Version,
    closed: bool,
}

/// In-memory implementation of `StateStore`.
#[derive(Debug)]
pub struct InMemoryStateStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStateStore {
    /// Empty store. `readonly` fails until the first commit.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                next_version: 1,
                ..Default::default()
            }),
        }
    }

    /// Commit account changes at `epoch` as a new version.
    ///
    /// Accounts not mentioned carry over from the previous version.
    pub fn commit<I>(&self, epoch: Epoch, changes: I) -> Version
    where
        I: IntoIterator<Item = (Address, AccountState)>,
    {
        let mut inner = self.inner.write();

        let mut accounts = inner
            .versions
            .values()
            .next_back()
            .map(|latest| latest.accounts.clone())
            .unwrap_or_default();
        for (address, state) in changes {
            accounts.insert(address, Arc::new(state));
        }

        let version = inner.next_version;
        inner.next_version += 1;
        inner.versions.insert(
            version,
            Arc::new(StateVersion {
                version,
                epoch,
                accounts,
            }),
        );

        debug!(version, epoch, "[qc-nonce-cache] Committed state version");
        version
    }

    /// Latest committed version, if any.
    pub fn latest_version(&self) -> Option<Version> {
        self.inner.read().versions.keys().next_back().copied()
    }

    /// Drop versions older than `keep_after`. The latest version is always
    /// kept. Returns the number of versions removed.
    pub fn prune(&self, keep_after: Version) -> usize {
        let mut inner = self.inner.write();
        let latest = inner.versions.keys().next_back().copied();
        let before = inner.versions.len();
        inner
            .versions
            .retain(|v, _| *v >= keep_after || Some(*v) == latest);
        before - inner.versions.len()
    }

    /// Shut the store down. Every later `readonly` call fails.
    pub fn close(&self) {
        self.inner.write().closed = true;
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStateStore {
    fn readonly(&self, version: Version) -> Result<Box<dyn StateSnapshot>, NonceCacheError> {
        let inner = self.inner.read();
        if inner.closed {
            return Err(NonceCacheError::snapshot(version, SnapshotFailure::StoreClosed));
        }

        let state = if version == LATEST_VERSION {
            inner
                .versions
                .values()
                .next_back()
                .cloned()
                .ok_or_else(|| {
                    NonceCacheError::snapshot(version, SnapshotFailure::NotInitialized)
                })?
        } else if inner.versions.is_empty() {
            return Err(NonceCacheError::snapshot(version, SnapshotFailure::NotInitialized));
        } else {
            inner
                .versions
                .get(&version)
                .cloned()
                .ok_or_else(|| {
                    NonceCacheError::snapshot(version, SnapshotFailure::VersionUnavailable)
                })?
        };

        Ok(Box::new(MemorySnapshot { state }))
    }
}

/// Read-only view over one `StateVersion`.
struct MemorySnapshot {
    state: Arc<StateVersion>,
}

impl StateSnapshot for MemorySnapshot {
    fn version(&self) -> Version {
        self.state.version
    }

    fn epoch(&self) -> Epoch {
        self.state.epoch
    }

    fn get_or_new_account(&self, address: &Address) -> AccountRef {
        self.get_account(address).unwrap_or_default()
    }

    fn get_account(&self, address: &Address) -> Option<AccountRef> {
        self.state.accounts.get(address).cloned()
    }
}
