//! Configuration and ledger backend selection.
//!
//! Directories and the chain mode mirror the deployment layout: one data
//! root with `ledger/`, `cloud/`, and `keys/` underneath, each overridable
//! through the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use cachet_ledger::{Ledger, LocalLedger, MemoryLedger, DEFAULT_LOCK_TIMEOUT};

use crate::error::Result;

/// Which ledger backend a [`crate::Vault`] opens.
///
/// All backends expose the same operations; the choice is configuration,
/// never a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerBackend {
    /// File-backed hash chain under the ledger directory.
    #[default]
    Local,
    /// In-memory chain; nothing persists past the process.
    Memory,
}

/// Deployment configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of all persisted state.
    pub data_dir: PathBuf,
    /// Where the ledger file and its lock live.
    pub ledger_dir: PathBuf,
    /// Where ciphertext blobs live.
    pub cloud_dir: PathBuf,
    /// Where per-identity keys live.
    pub keys_dir: PathBuf,
    /// Which ledger backend to open.
    pub backend: LedgerBackend,
    /// Bound on waiting for the append lock.
    pub lock_timeout: Duration,
}

impl Config {
    /// Configuration rooted at `data_dir` with the standard subdirectories.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            ledger_dir: data_dir.join("ledger"),
            cloud_dir: data_dir.join("cloud"),
            keys_dir: data_dir.join("keys"),
            data_dir,
            backend: LedgerBackend::default(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Configuration from the environment.
    ///
    /// `CACHET_DATA_DIR` moves the root (default `data`);
    /// `CACHET_LEDGER_DIR`, `CACHET_CLOUD_DIR`, and `CACHET_KEYS_DIR`
    /// override individual directories; `CACHET_CHAIN_MODE` selects
    /// `local` (default) or `memory`.
    pub fn from_env() -> Self {
        let data_dir = env::var_os("CACHET_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let mut config = Self::new(data_dir);

        if let Some(dir) = env::var_os("CACHET_LEDGER_DIR") {
            config.ledger_dir = dir.into();
        }
        if let Some(dir) = env::var_os("CACHET_CLOUD_DIR") {
            config.cloud_dir = dir.into();
        }
        if let Some(dir) = env::var_os("CACHET_KEYS_DIR") {
            config.keys_dir = dir.into();
        }

        if let Ok(mode) = env::var("CACHET_CHAIN_MODE") {
            match mode.as_str() {
                "local" => config.backend = LedgerBackend::Local,
                "memory" => config.backend = LedgerBackend::Memory,
                other => {
                    tracing::warn!(mode = other, "unknown chain mode, using local");
                }
            }
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("data")
    }
}

/// Open the configured ledger backend.
pub fn open_ledger(config: &Config) -> Result<Box<dyn Ledger>> {
    match config.backend {
        LedgerBackend::Local => {
            let ledger =
                LocalLedger::open(&config.ledger_dir)?.with_lock_timeout(config.lock_timeout);
            Ok(Box::new(ledger))
        }
        LedgerBackend::Memory => Ok(Box::new(MemoryLedger::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let config = Config::new("/srv/cachet");
        assert_eq!(config.ledger_dir, PathBuf::from("/srv/cachet/ledger"));
        assert_eq!(config.cloud_dir, PathBuf::from("/srv/cachet/cloud"));
        assert_eq!(config.keys_dir, PathBuf::from("/srv/cachet/keys"));
        assert_eq!(config.backend, LedgerBackend::Local);
    }

    #[test]
    fn test_open_memory_backend() {
        let mut config = Config::new("/nonexistent");
        config.backend = LedgerBackend::Memory;

        // Memory backend needs no directories.
        let ledger = open_ledger(&config).unwrap();
        assert!(ledger.read_all().unwrap().is_empty());
    }
}
