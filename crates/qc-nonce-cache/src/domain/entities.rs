//! # Domain Entities for the Nonce Cache
//!
//! ## Type Decisions
//!
//! - `Nonce = u32` and `Epoch = u16` match the account record kept by the
//!   state store. Sequencing restarts every epoch, so 32 bits is plenty.
//! - `AccountRef` is an `Arc` over an immutable `AccountState`. The cache
//!   holds on to whatever the snapshot handed out and never writes through it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Address type (20-byte account address).
pub type Address = [u8; 20];
/// Sequencing period; nonces restart from zero in each new epoch.
pub type Epoch = u16;
/// Per-account, per-epoch transaction sequence number.
pub type Nonce = u32;
/// State store version identifier.
pub type Version = i64;

/// Snapshot version meaning "latest committed".
pub const LATEST_VERSION: Version = -1;

/// Account record as captured by a state snapshot.
///
/// `epoch` is the epoch in which the account was last active. The `nonce`
/// only carries meaning inside that epoch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Last committed transaction nonce.
    pub nonce: Nonce,
    /// Epoch the nonce belongs to.
    pub epoch: Epoch,
}

impl AccountState {
    /// Account with `nonce` last active in `epoch`.
    pub fn new(nonce: Nonce, epoch: Epoch) -> Self {
        Self { nonce, epoch }
    }
}

/// Shared, read-only handle to an account inside a snapshot.
pub type AccountRef = Arc<AccountState>;

/// The cache's belief about one account's nonce within one epoch.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// Highest nonce observed or assigned for this (address, epoch).
    pub tracked_nonce: Nonce,
    /// Account as it was when this entry was (re)built.
    pub account: AccountRef,
}

impl CacheEntry {
    /// Build a fresh entry for `target_epoch`.
    ///
    /// The account's nonce is carried over only when the account was last
    /// active in both the snapshot's epoch and the target epoch. Anything
    /// older starts the new epoch from zero.
    pub fn build(account: AccountRef, snapshot_epoch: Epoch, target_epoch: Epoch) -> Self {
        let tracked_nonce = if account.epoch < snapshot_epoch || account.epoch < target_epoch {
            0
        } else {
            account.nonce
        };

        Self {
            tracked_nonce,
            account,
        }
    }

    /// Whether `fresh` shows the store has moved past this entry.
    ///
    /// Only a strictly higher nonce recorded in the requested epoch counts.
    /// A later epoch on the account leaves historical entries pinned.
    pub fn is_stale(&self, fresh: &AccountState, requested_epoch: Epoch) -> bool {
        fresh.nonce > self.tracked_nonce && fresh.epoch == requested_epoch
    }

    /// Raise the tracked nonce to `nonce` if higher. Returns the result.
    pub fn bump(&mut self, nonce: Nonce) -> Nonce {
        if self.tracked_nonce < nonce {
            self.tracked_nonce = nonce;
        }
        self.tracked_nonce
    }
}
