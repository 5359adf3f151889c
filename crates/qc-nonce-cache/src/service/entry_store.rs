//! # Account Entry Store
//!
//! Two-level map `address -> epoch -> CacheEntry` plus the resolve-and-merge
//! algorithm that reconciles it with the snapshot.
//!
//! ## Algorithm: Resolve and Merge
//!
//! ```text
//! resolve(addr, epoch)
//!   ├─ addr unknown         → build from snapshot (placeholder ok)  NewAddress
//!   ├─ epoch unknown        → build from snapshot (placeholder ok)  NewEpoch
//!   └─ entry cached
//!        ├─ account exists, nonce > tracked, epoch == requested
//!        │                  → rebuild from fresh account            Rebuilt
//!        └─ otherwise       → keep                                  Kept
//! ```

use super::snapshot::SnapshotProvider;
use crate::domain::{Address, CacheEntry, Epoch, ResolveOutcome};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// All cached entries. No capacity bound, no eviction.
#[derive(Debug, Default)]
pub struct EntryStore {
    accounts: HashMap<Address, HashMap<Epoch, CacheEntry>>,
}

impl EntryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or build the entry for `(address, epoch)`.
    pub fn resolve(
        &mut self,
        snapshot: &SnapshotProvider,
        address: Address,
        epoch: Epoch,
    ) -> (&mut CacheEntry, ResolveOutcome) {
        let epochs = match self.accounts.entry(address) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let entry = Self::build(snapshot, &address, epoch);
                let epochs = vacant.insert(HashMap::new());
                return (epochs.entry(epoch).or_insert(entry), ResolveOutcome::NewAddress);
            }
        };

        match epochs.entry(epoch) {
            Entry::Vacant(vacant) => {
                let entry = Self::build(snapshot, &address, epoch);
                (vacant.insert(entry), ResolveOutcome::NewEpoch)
            }
            Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                // Never synthesize a placeholder here: "absent" must not look
                // like "exists with nonce 0".
                let outcome = match snapshot.get_account_if_exists(&address) {
                    Some(fresh) if entry.is_stale(&fresh, epoch) => {
                        let previous = entry.tracked_nonce;
                        let state_nonce = fresh.nonce;
                        *entry = CacheEntry::build(fresh, snapshot.epoch(), epoch);
                        ResolveOutcome::Rebuilt {
                            state_nonce,
                            previous,
                        }
                    }
                    Some(fresh) => ResolveOutcome::Kept {
                        state_nonce: Some(fresh.nonce),
                    },
                    None => ResolveOutcome::Kept { state_nonce: None },
                };
                (entry, outcome)
            }
        }
    }

    fn build(snapshot: &SnapshotProvider, address: &Address, epoch: Epoch) -> CacheEntry {
        CacheEntry::build(snapshot.get_account(address), snapshot.epoch(), epoch)
    }

    /// Cached entry without touching the snapshot.
    pub fn peek(&self, address: &Address, epoch: Epoch) -> Option<&CacheEntry> {
        self.accounts.get(address)?.get(&epoch)
    }

    /// Drop everything. Returns the number of entries dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.len();
        self.accounts = HashMap::new();
        dropped
    }

    /// Number of cached addresses.
    pub fn addresses(&self) -> usize {
        self.accounts.len()
    }

    /// Number of cached (address, epoch) entries.
    pub fn len(&self) -> usize {
        self.accounts.values().map(HashMap::len).sum()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStateStore;
    use crate::domain::AccountState;
    use std::sync::Arc;

    const ALICE: Address = [0xAA; 20];
    const BOB: Address = [0xBB; 20];

    fn provider(store: &Arc<InMemoryStateStore>) -> SnapshotProvider {
        SnapshotProvider::new_from_store(store.clone()).unwrap()
    }

    #[test]
    fn test_new_address_then_new_epoch_then_kept() {
        let store = Arc::new(InMemoryStateStore::new());
        store.commit(3, [(ALICE, AccountState::new(5, 3))]);
        let snapshot = provider(&store);
        let mut entries = EntryStore::new();

        let (entry, outcome) = entries.resolve(&snapshot, ALICE, 3);
        assert_eq!(entry.tracked_nonce, 5);
        assert_eq!(outcome, ResolveOutcome::NewAddress);

        let (entry, outcome) = entries.resolve(&snapshot, ALICE, 4);
        assert_eq!(entry.tracked_nonce, 0);
        assert_eq!(outcome, ResolveOutcome::NewEpoch);

        let (entry, outcome) = entries.resolve(&snapshot, ALICE, 3);
        assert_eq!(entry.tracked_nonce, 5);
        assert_eq!(
            outcome,
            ResolveOutcome::Kept {
                state_nonce: Some(5)
            }
        );

        assert_eq!(entries.addresses(), 1);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_absent_account_is_kept_without_placeholder() {
        let store = Arc::new(InMemoryStateStore::new());
        store.commit(1, [(ALICE, AccountState::new(1, 1))]);
        let snapshot = provider(&store);
        let mut entries = EntryStore::new();

        let (entry, _) = entries.resolve(&snapshot, BOB, 1);
        assert_eq!(entry.tracked_nonce, 0);
        entry.bump(3);

        let (entry, outcome) = entries.resolve(&snapshot, BOB, 1);
        assert_eq!(entry.tracked_nonce, 3);
        assert_eq!(outcome, ResolveOutcome::Kept { state_nonce: None });
    }

    #[test]
    fn test_rebuild_when_snapshot_is_ahead() {
        let store = Arc::new(InMemoryStateStore::new());
        store.commit(2, [(ALICE, AccountState::new(1, 2))]);
        let mut snapshot = provider(&store);
        let mut entries = EntryStore::new();

        entries.resolve(&snapshot, ALICE, 2);

        store.commit(2, [(ALICE, AccountState::new(8, 2))]);
        snapshot.reload().unwrap();

        let (entry, outcome) = entries.resolve(&snapshot, ALICE, 2);
        assert_eq!(entry.tracked_nonce, 8);
        assert_eq!(
            outcome,
            ResolveOutcome::Rebuilt {
                state_nonce: 8,
                previous: 1
            }
        );
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_historical_epoch_stays_pinned() {
        let store = Arc::new(InMemoryStateStore::new());
        store.commit(2, [(ALICE, AccountState::new(1, 2))]);
        let mut snapshot = provider(&store);
        let mut entries = EntryStore::new();

        entries.resolve(&snapshot, ALICE, 2);

        // Account moves to epoch 3 with a higher nonce.
        store.commit(3, [(ALICE, AccountState::new(9, 3))]);
        snapshot.reload().unwrap();

        let (entry, outcome) = entries.resolve(&snapshot, ALICE, 2);
        assert_eq!(entry.tracked_nonce, 1);
        assert_eq!(
            outcome,
            ResolveOutcome::Kept {
                state_nonce: Some(9)
            }
        );
    }

    #[test]
    fn test_peek_and_clear() {
        let store = Arc::new(InMemoryStateStore::new());
        store.commit(1, [(ALICE, AccountState::new(2, 1))]);
        let snapshot = provider(&store);
        let mut entries = EntryStore::new();

        assert!(entries.peek(&ALICE, 1).is_none());
        entries.resolve(&snapshot, ALICE, 1);
        entries.resolve(&snapshot, BOB, 1);
        assert_eq!(entries.peek(&ALICE, 1).map(|e| e.tracked_nonce), Some(2));

        assert_eq!(entries.clear(), 2);
        assert!(entries.is_empty());
        assert!(entries.peek(&ALICE, 1).is_none());
    }
}
