//! Key-value persistence for cache blobs.
//!
//! # Design Decisions
//! - Values are opaque JSON text; the store never interprets them
//! - `FileStore` mirrors a concurrent map to one JSON file, rewritten after
//!   every mutation through a temp file and rename
//! - An undecodable store file is discarded, not fatal

use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// String-keyed store of text blobs.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.get(key).map(|r| r.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.inner.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key);
        Ok(())
    }
}

/// Store persisted to a JSON file so entries survive restarts.
#[derive(Debug)]
pub struct FileStore {
    inner: DashMap<String, String>,
    path: PathBuf,
    /// Serializes file rewrites.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open `path`, loading existing entries. A missing, empty or
    /// undecodable file starts an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let inner = DashMap::new();

        if path.exists() {
            let content = fs::read_to_string(&path)?;
            if !content.trim().is_empty() {
                match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                    Ok(map) => {
                        for (k, v) in map {
                            inner.insert(k, v);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(path = ?path, error = %e, "Discarding undecodable cache store");
                    }
                }
            }
            tracing::debug!(path = ?path, entries = inner.len(), "Loaded cache store");
        }

        Ok(Self {
            inner,
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let map: BTreeMap<_, _> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        let tmp = self.temp_path();
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, &map)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// `<file>.tmp` beside the store file.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.get(key).map(|r| r.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.inner.insert(key.to_string(), value);
        self.persist()
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.inner.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
