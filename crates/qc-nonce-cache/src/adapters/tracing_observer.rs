//! Tracing Observer Adapter
//!
//! Implements `NonceObserver` by emitting `tracing` events for the watched
//! address.

use crate::domain::{ResolveEvent, ResolveOutcome, SetNonceEvent};
use crate::ports::NonceObserver;
use tracing::info;

/// Logs watched-address activity at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl NonceObserver for TracingObserver {
    fn on_entry_resolved(&self, event: &ResolveEvent) {
        let address = hex::encode(event.address);
        match event.outcome {
            ResolveOutcome::NewAddress => info!(
                %address,
                epoch = event.epoch,
                nonce = event.nonce,
                version = event.version,
                cache_id = %event.cache_id,
                "[qc-nonce-cache] Address not found in memory, read from state"
            ),
            ResolveOutcome::NewEpoch => info!(
                %address,
                epoch = event.epoch,
                nonce = event.nonce,
                version = event.version,
                cache_id = %event.cache_id,
                "[qc-nonce-cache] Epoch not found in memory, read from state"
            ),
            ResolveOutcome::Kept { state_nonce } => info!(
                %address,
                epoch = event.epoch,
                nonce = event.nonce,
                state_nonce = ?state_nonce,
                version = event.version,
                cache_id = %event.cache_id,
                "[qc-nonce-cache] Resolved cached nonce"
            ),
            ResolveOutcome::Rebuilt {
                state_nonce,
                previous,
            } => info!(
                %address,
                epoch = event.epoch,
                nonce = event.nonce,
                state_nonce,
                previous,
                version = event.version,
                cache_id = %event.cache_id,
                "[qc-nonce-cache] Cached nonce behind state, entry rebuilt"
            ),
        }
    }

    fn on_nonce_set(&self, event: &SetNonceEvent) {
        info!(
            address = %hex::encode(event.address),
            epoch = event.epoch,
            current = event.current,
            new = event.requested,
            tracked = event.tracked,
            version = event.version,
            cache_id = %event.cache_id,
            "[qc-nonce-cache] Set nonce"
        );
    }
}
