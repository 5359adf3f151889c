//! Snapshot provider: owns the read-only view of the state store.

use crate::domain::{AccountRef, Address, Epoch, NonceCacheError, Version, LATEST_VERSION};
use crate::ports::{StateSnapshot, StateStore};
use std::sync::Arc;

/// Holds the current read-only view and the store it came from.
///
/// The view is replaced wholesale on reload, never mutated in place.
pub struct SnapshotProvider {
    store: Arc<dyn StateStore>,
    view: Box<dyn StateSnapshot>,
}

impl SnapshotProvider {
    /// Bind to the latest committed version.
    pub fn new_from_store(store: Arc<dyn StateStore>) -> Result<Self, NonceCacheError> {
        Self::at_version(store, LATEST_VERSION)
    }

    /// Bind to a specific version.
    pub fn at_version(
        store: Arc<dyn StateStore>,
        version: Version,
    ) -> Result<Self, NonceCacheError> {
        let view = store.readonly(version)?;
        Ok(Self { store, view })
    }

    /// Swap in a view of the latest committed version.
    ///
    /// On failure the current view is kept.
    pub fn reload(&mut self) -> Result<(), NonceCacheError> {
        self.view = self.store.readonly(LATEST_VERSION)?;
        Ok(())
    }

    /// Version of the held view.
    pub fn version(&self) -> Version {
        self.view.version()
    }

    /// Store epoch at the held view.
    pub fn epoch(&self) -> Epoch {
        self.view.epoch()
    }

    /// Account as of the held view, zero-state placeholder if absent.
    pub fn get_account(&self, address: &Address) -> AccountRef {
        self.view.get_or_new_account(address)
    }

    /// Account as of the held view, `None` if absent.
    pub fn get_account_if_exists(&self, address: &Address) -> Option<AccountRef> {
        self.view.get_account(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStateStore;
    use crate::domain::{AccountState, SnapshotFailure};

    const ALICE: Address = [0xAA; 20];

    #[test]
    fn test_new_fails_on_empty_store() {
        let store = Arc::new(InMemoryStateStore::new());
        let err = SnapshotProvider::new_from_store(store).err().unwrap();
        assert_eq!(
            err,
            NonceCacheError::snapshot(LATEST_VERSION, SnapshotFailure::NotInitialized)
        );
    }

    #[test]
    fn test_binds_latest_version() {
        let store = Arc::new(InMemoryStateStore::new());
        store.commit(1, [(ALICE, AccountState::new(1, 1))]);
        let latest = store.commit(2, [(ALICE, AccountState::new(2, 2))]);

        let provider = SnapshotProvider::new_from_store(store).unwrap();
        assert_eq!(provider.version(), latest);
        assert_eq!(provider.epoch(), 2);
        assert_eq!(provider.get_account(&ALICE).nonce, 2);
    }

    #[test]
    fn test_placeholder_vs_absent() {
        let store = Arc::new(InMemoryStateStore::new());
        store.commit(1, [(ALICE, AccountState::new(0, 1))]);
        let provider = SnapshotProvider::new_from_store(store).unwrap();

        let bob = [0xBB; 20];
        assert_eq!(*provider.get_account(&bob), AccountState::default());
        assert!(provider.get_account_if_exists(&bob).is_none());

        // Exists with zero nonce is not the same as absent.
        let alice = provider.get_account_if_exists(&ALICE).unwrap();
        assert_eq!(alice.nonce, 0);
    }

    #[test]
    fn test_reload_moves_to_latest() {
        let store = Arc::new(InMemoryStateStore::new());
        let v1 = store.commit(1, [(ALICE, AccountState::new(1, 1))]);
        let mut provider = SnapshotProvider::new_from_store(store.clone()).unwrap();

        let v2 = store.commit(1, [(ALICE, AccountState::new(4, 1))]);
        assert_eq!(provider.version(), v1);
        assert_eq!(provider.get_account(&ALICE).nonce, 1);

        provider.reload().unwrap();
        assert_eq!(provider.version(), v2);
        assert_eq!(provider.get_account(&ALICE).nonce, 4);
    }

    #[test]
    fn test_failed_reload_keeps_previous_view() {
        let store = Arc::new(InMemoryStateStore::new());
        let v1 = store.commit(1, [(ALICE, AccountState::new(3, 1))]);
        let mut provider = SnapshotProvider::new_from_store(store.clone()).unwrap();

        store.close();
        let err = provider.reload().unwrap_err();
        assert!(err.is_snapshot_unavailable());
        assert_eq!(provider.version(), v1);
        assert_eq!(provider.get_account(&ALICE).nonce, 3);
    }
}
