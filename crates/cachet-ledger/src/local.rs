//! File-backed hash chain: the default ledger backend.
//!
//! The chain persists as one JSON file that every participant can read and
//! append to. Appends run under a cross-process advisory lock on an
//! adjacent lock file, held for exactly one read-tail/compute/append/persist
//! cycle. Persistence is whole-file write to a temporary path followed by an
//! atomic rename, so readers never observe a half-written block.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::debug;

use cachet_core::{Block, ChainHash, Event};

use crate::error::{LedgerError, Result};
use crate::traits::{verify_chain, Ledger};

const LEDGER_FILE: &str = "ledger.json";
const LOCK_FILE: &str = "ledger.lock";
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Default bound on waiting for the append lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// The file-backed ledger.
///
/// Each opened instance is an explicit handle; there is no process-global
/// ledger state.
pub struct LocalLedger {
    ledger_path: PathBuf,
    lock_path: PathBuf,
    lock_timeout: Duration,
}

impl LocalLedger {
    /// Open the ledger stored in `dir`, initializing an empty chain on the
    /// medium when none exists. Loading an existing chain leaves it
    /// unchanged.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let ledger = Self {
            ledger_path: dir.join(LEDGER_FILE),
            lock_path: dir.join(LOCK_FILE),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        };

        if !ledger.ledger_path.exists() {
            ledger.persist(&[])?;
        }

        Ok(ledger)
    }

    /// Override the append-lock timeout.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Path of the persisted chain.
    pub fn path(&self) -> &Path {
        &self.ledger_path
    }

    fn load(&self) -> Result<Vec<Block>> {
        let bytes = match fs::read(&self.ledger_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| LedgerError::ChainCorrupted(format!("{}: {e}", self.ledger_path.display())))
    }

    fn persist(&self, chain: &[Block]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(chain)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;

        let tmp_path = self.ledger_path.with_extension("json.tmp");
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(&bytes)?;
        tmp.sync_all()?;
        fs::rename(&tmp_path, &self.ledger_path)?;
        Ok(())
    }
}

impl Ledger for LocalLedger {
    fn append(&self, event: Event) -> Result<ChainHash> {
        let _lock = AppendLock::acquire(&self.lock_path, self.lock_timeout)?;

        let mut chain = self.load()?;
        let previous_hash = chain.last().map(|b| b.hash).unwrap_or(ChainHash::GENESIS);

        let block = Block::seal(now_millis(), previous_hash, event);
        let hash = block.hash;
        debug!(kind = block.event.type_name(), %hash, seq = chain.len(), "appending block");

        chain.push(block);
        self.persist(&chain)?;
        Ok(hash)
    }

    fn read_all(&self) -> Result<Vec<Block>> {
        self.load()
    }

    fn verify_integrity(&self) -> Result<bool> {
        let chain = self.load()?;
        Ok(verify_chain(&chain))
    }
}

/// RAII guard for the cross-process append lock.
struct AppendLock {
    file: File,
}

impl AppendLock {
    fn acquire(path: &Path, timeout: Duration) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        let contended = fs2::lock_contended_error();
        let deadline = Instant::now() + timeout;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Self { file }),
                Err(e) if e.raw_os_error() == contended.raw_os_error() => {
                    if Instant::now() >= deadline {
                        return Err(LedgerError::LockTimeout {
                            path: path.display().to_string(),
                            waited_ms: timeout.as_millis() as u64,
                        });
                    }
                    thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for AppendLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
