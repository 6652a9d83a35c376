use anyhow::{Context, Result};
use fs2::FileExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::models::Database;

/// Key under which the full snapshot (all four collections) is stored
pub const SNAPSHOT_KEY: &str = "ipt_demo_v1";

/// Key holding the "remember me" token: the last logged-in email
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Key holding the email of a registration awaiting verification
pub const UNVERIFIED_EMAIL_KEY: &str = "unverified_email";

/// Origin-scoped key-value persistence.
///
/// The store holds opaque string values under fixed keys. The record
/// store is the only writer; backends need no cross-process
/// coordination beyond a lock around individual writes.
pub trait DurableStore {
    /// Reads the value under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value under `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed durable store: one file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
    lock_file_path: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the given directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let lock_file_path = dir.join(".lock");
        Self {
            dir,
            lock_file_path,
        }
    }

    /// Returns the data directory backing this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Acquire an exclusive lock for the duration of a write.
    /// The lock is released when the returned handle is dropped.
    fn acquire_write_lock(&self) -> Result<std::fs::File> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {:?}", self.dir))?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to create lock file: {:?}", self.lock_file_path))?;

        lock_file
            .lock_exclusive()
            .with_context(|| format!("Failed to acquire lock on {:?}", self.lock_file_path))?;

        Ok(lock_file)
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read key file: {:?}", path)),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let _lock = self.acquire_write_lock()?;

        let path = self.key_path(key);
        fs::write(&path, value).with_context(|| format!("Failed to write key file: {:?}", path))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove key file: {:?}", path)),
        }
    }
}

/// In-memory durable store for tests and embedding
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads the snapshot from the durable store.
///
/// `Ok(None)` means no snapshot exists; a parse failure is an error,
/// which the record store treats the same as absent data.
pub fn load_snapshot(store: &dyn DurableStore) -> Result<Option<Database>> {
    let raw = match store.get(SNAPSHOT_KEY)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let db = serde_json::from_str(&raw).context("Failed to parse persisted snapshot")?;
    Ok(Some(db))
}

/// Serializes the full database and writes it under the snapshot key
pub fn save_snapshot(store: &dyn DurableStore, db: &Database) -> Result<()> {
    let raw = serde_json::to_string(db).context("Failed to serialize snapshot")?;
    store.put(SNAPSHOT_KEY, &raw)
}

/// Gets the path to the data directory
pub fn data_dir() -> Result<PathBuf> {
    // Check if ORGDESK_DATA_DIR environment variable is set
    if let Ok(dir) = std::env::var("ORGDESK_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    // Default to ~/.orgdesk
    let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

    Ok(home_dir.join(".orgdesk"))
}
