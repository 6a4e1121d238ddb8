//! Blob storage for ciphertext.
//!
//! Content-addressed put/get by opaque file id. Content is opaque here; the
//! protocol layer owns encryption and verification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, StoreError};

const BLOB_EXT: &str = "blob";
const META_FILE: &str = "meta.json";

/// Metadata for one stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMeta {
    pub file_id: String,
    pub filename: String,
    pub size: u64,
}

/// The blob store interface the protocol depends on.
///
/// `put` returns an opaque location string for display; file ids are
/// caller-supplied and must be unique per upload.
pub trait BlobStore: Send + Sync {
    fn put(&self, file_id: &str, content: &[u8], filename: &str) -> Result<String>;
    fn get(&self, file_id: &str) -> Result<Vec<u8>>;
    fn list(&self) -> Result<Vec<BlobMeta>>;
    fn get_meta(&self, file_id: &str) -> Result<Option<BlobMeta>>;
}

/// Directory-backed blob store: one `<file_id>.blob` file per upload plus a
/// `meta.json` index.
pub struct DirBlobStore {
    root: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MetaIndex(BTreeMap<String, MetaEntry>);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MetaEntry {
    filename: String,
    size: u64,
}

impl DirBlobStore {
    /// Open a blob store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn blob_path(&self, file_id: &str) -> PathBuf {
        self.root.join(format!("{file_id}.{BLOB_EXT}"))
    }

    fn load_meta(&self) -> Result<MetaIndex> {
        let path = self.root.join(META_FILE);
        match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(MetaIndex::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save_meta(&self, meta: &MetaIndex) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(meta)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(self.root.join(META_FILE), bytes)?;
        Ok(())
    }
}

impl BlobStore for DirBlobStore {
    fn put(&self, file_id: &str, content: &[u8], filename: &str) -> Result<String> {
        let path = self.blob_path(file_id);
        fs::write(&path, content)?;

        let mut meta = self.load_meta()?;
        meta.0.insert(
            file_id.to_string(),
            MetaEntry {
                filename: filename.to_string(),
                size: content.len() as u64,
            },
        );
        self.save_meta(&meta)?;

        tracing::debug!(file_id, size = content.len(), "stored blob");
        Ok(path.display().to_string())
    }

    fn get(&self, file_id: &str) -> Result<Vec<u8>> {
        match fs::read(self.blob_path(file_id)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::MissingBlob(file_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<BlobMeta>> {
        let meta = self.load_meta()?;
        Ok(meta
            .0
            .into_iter()
            .map(|(file_id, entry)| BlobMeta {
                file_id,
                filename: entry.filename,
                size: entry.size,
            })
            .collect())
    }

    fn get_meta(&self, file_id: &str) -> Result<Option<BlobMeta>> {
        let meta = self.load_meta()?;
        Ok(meta.0.get(file_id).map(|entry| BlobMeta {
            file_id: file_id.to_string(),
            filename: entry.filename.clone(),
            size: entry.size,
        }))
    }
}

/// In-memory blob store for tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<BTreeMap<String, (String, Vec<u8>)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, file_id: &str, content: &[u8], filename: &str) -> Result<String> {
        self.blobs
            .lock()
            .unwrap()
            .insert(file_id.to_string(), (filename.to_string(), content.to_vec()));
        Ok(format!("memory:{file_id}"))
    }

    fn get(&self, file_id: &str) -> Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(file_id)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| StoreError::MissingBlob(file_id.to_string()))
    }

    fn list(&self) -> Result<Vec<BlobMeta>> {
        Ok(self
            .blobs
            .lock()
            .unwrap()
            .iter()
            .map(|(file_id, (filename, content))| BlobMeta {
                file_id: file_id.clone(),
                filename: filename.clone(),
                size: content.len() as u64,
            })
            .collect())
    }

    fn get_meta(&self, file_id: &str) -> Result<Option<BlobMeta>> {
        Ok(self
            .blobs
            .lock()
            .unwrap()
            .get(file_id)
            .map(|(filename, content)| BlobMeta {
                file_id: file_id.to_string(),
                filename: filename.clone(),
                size: content.len() as u64,
            }))
    }
}
