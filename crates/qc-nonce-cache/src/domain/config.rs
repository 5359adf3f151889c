//! Nonce cache configuration from environment variables.

use super::{Address, NonceCacheError, Version, LATEST_VERSION};
use serde::{Deserialize, Serialize};
use std::env;

/// Env var holding the watched address (hex, optional `0x` prefix).
pub const ENV_WATCHED_ADDRESS: &str = "QC_NONCE_CACHE_WATCH";

/// Env var holding the snapshot version to bind at construction.
pub const ENV_SNAPSHOT_VERSION: &str = "QC_NONCE_CACHE_VERSION";

/// Configuration for a `NonceCache`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceCacheConfig {
    /// Address singled out for verbose tracing.
    pub watched_address: Option<Address>,

    /// Snapshot version used at construction. Reloads always move to latest.
    pub snapshot_version: Version,
}

impl Default for NonceCacheConfig {
    fn default() -> Self {
        Self {
            watched_address: None,
            snapshot_version: LATEST_VERSION,
        }
    }
}

impl NonceCacheConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_NONCE_CACHE_WATCH`: Watched address (default: none)
    /// - `QC_NONCE_CACHE_VERSION`: Initial snapshot version (default: -1, latest)
    ///
    /// Invalid values are logged and replaced by defaults.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "[qc-nonce-cache] Invalid config, using defaults");
            Self::default()
        })
    }

    /// Like `from_env`, but reports invalid values.
    pub fn try_from_env() -> Result<Self, NonceCacheError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NonceCacheError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watched_address = match lookup(ENV_WATCHED_ADDRESS) {
            Some(raw) if !raw.trim().is_empty() => Some(parse_address(&raw)?),
            _ => None,
        };

        let snapshot_version = match lookup(ENV_SNAPSHOT_VERSION) {
            Some(raw) if !raw.trim().is_empty() => parse_version(&raw)?,
            _ => LATEST_VERSION,
        };

        Ok(Self {
            watched_address,
            snapshot_version,
        })
    }

    /// Builder method to set the watched address.
    pub fn with_watched_address(mut self, address: Address) -> Self {
        self.watched_address = Some(address);
        self
    }

    /// Builder method to pin the initial snapshot version.
    pub fn with_snapshot_version(mut self, version: Version) -> Self {
        self.snapshot_version = version;
        self
    }
}

/// Parse a 20-byte hex address, with or without `0x`.
pub fn parse_address(raw: &str) -> Result<Address, NonceCacheError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(digits)
        .map_err(|e| NonceCacheError::InvalidConfig(format!("{ENV_WATCHED_ADDRESS}: {e}")))?;

    Address::try_from(bytes.as_slice()).map_err(|_| {
        NonceCacheError::InvalidConfig(format!(
            "{ENV_WATCHED_ADDRESS}: expected 20 bytes, got {}",
            bytes.len()
        ))
    })
}

fn parse_version(raw: &str) -> Result<Version, NonceCacheError> {
    let version: Version = raw
        .trim()
        .parse()
        .map_err(|e| NonceCacheError::InvalidConfig(format!("{ENV_SNAPSHOT_VERSION}: {e}")))?;

    if version < LATEST_VERSION {
        return Err(NonceCacheError::InvalidConfig(format!(
            "{ENV_SNAPSHOT_VERSION}: {version} is not a valid version"
        )));
    }
    Ok(version)
}
