//! # Domain Errors
//!
//! Only snapshot construction and reload can fail at runtime. Every other
//! cache operation is total.

use super::Version;
use thiserror::Error;

/// Why the state store could not hand out a read-only view.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotFailure {
    /// Nothing has been committed yet.
    #[error("store not initialized")]
    NotInitialized,

    /// Requested version was pruned or never existed.
    #[error("version not available")]
    VersionUnavailable,

    /// Store has been shut down.
    #[error("store closed")]
    StoreClosed,

    /// Backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Nonce cache error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NonceCacheError {
    /// Store could not produce a read-only view at `version`.
    #[error("Snapshot unavailable at version {version}: {reason}")]
    SnapshotUnavailable {
        /// Requested version (`-1` = latest).
        version: Version,
        /// Underlying cause.
        reason: SnapshotFailure,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

impl NonceCacheError {
    /// Snapshot-unavailable error for `version`.
    pub fn snapshot(version: Version, reason: SnapshotFailure) -> Self {
        Self::SnapshotUnavailable { version, reason }
    }

    /// Whether this is the snapshot-unavailable category.
    pub fn is_snapshot_unavailable(&self) -> bool {
        matches!(self, Self::SnapshotUnavailable { .. })
    }
}
