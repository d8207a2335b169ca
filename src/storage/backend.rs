//! Key-value storage area
//!
//! The profile store never touches a concrete storage medium directly. It
//! writes through [`KeyValueStorage`], which has two implementations:
//!
//! - [`MemoryStorage`]: process-local map, used by tests and short-lived tools
//! - [`FileStorage`]: one JSON object file on disk, the durable equivalent of
//!   browser local storage
//!
//! Both accept an optional byte quota. A write that would exceed it fails
//! with [`StorageError::QuotaExceeded`] and leaves the area untouched.

use crate::storage::error::{StorageError, StorageResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// File name of the storage area inside the data directory
pub const STORAGE_FILE_NAME: &str = "local_storage.json";

/// A string-keyed, string-valued storage area
///
/// Every call is a single synchronous read or write. There is no cross-writer
/// coordination: the last write to a key wins.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// All keys currently stored, sorted
    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// Bytes an entry counts against the quota
fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

fn used_bytes(map: &BTreeMap<String, String>) -> usize {
    map.iter().map(|(k, v)| entry_size(k, v)).sum()
}

/// Check that replacing `key` with `value` stays within `quota`
fn check_quota(
    map: &BTreeMap<String, String>,
    quota: Option<usize>,
    key: &str,
    value: &str,
) -> StorageResult<()> {
    let Some(quota) = quota else {
        return Ok(());
    };

    let used = used_bytes(map);
    let replaced = map.get(key).map(|old| entry_size(key, old)).unwrap_or(0);
    let needed = entry_size(key, value);

    if used - replaced + needed > quota {
        return Err(StorageError::QuotaExceeded {
            quota,
            used,
            needed,
        });
    }

    Ok(())
}

fn lock_map(
    map: &Mutex<BTreeMap<String, String>>,
) -> StorageResult<MutexGuard<'_, BTreeMap<String, String>>> {
    map.lock()
        .map_err(|e| StorageError::Lock(format!("storage map poisoned: {}", e)))
}

// ============================================
// In-memory storage
// ============================================

/// Storage area held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an area that rejects writes past `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            quota: Some(quota),
        }
    }

    /// Bytes currently counted against the quota
    pub fn used_bytes(&self) -> StorageResult<usize> {
        Ok(used_bytes(&*lock_map(&self.entries)?))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(lock_map(&self.entries)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = lock_map(&self.entries)?;
        check_quota(&entries, self.quota, key, value)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        lock_map(&self.entries)?.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(lock_map(&self.entries)?.keys().cloned().collect())
    }
}

// ============================================
// File-backed storage
// ============================================

/// Storage area persisted as a single JSON object file
///
/// The file is the source of truth: every operation re-reads it, and every
/// mutation is applied to the freshly read map before being written back.
/// Several handles (or processes) on the same file therefore only ever
/// overwrite each other per key, never drop each other's unrelated entries.
/// Writes go to a sibling temp file that is then renamed over the original,
/// so readers only ever see a complete file.
///
/// The storage area is small (a handful of profiles per device), so whole-file
/// reads and rewrites stay cheap.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl FileStorage {
    /// Open (or create on first write) the storage file inside `data_dir`
    pub fn open(data_dir: impl AsRef<Path>, quota: Option<usize>) -> StorageResult<Self> {
        Self::open_file(data_dir.as_ref().join(STORAGE_FILE_NAME), quota)
    }

    /// Open a storage file at an explicit path
    pub fn open_file(path: impl Into<PathBuf>, quota: Option<usize>) -> StorageResult<Self> {
        let path = path.into();
        let entries = read_map(&path)?;

        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened storage file");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            quota,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock the map and bring it up to date with the file
    fn refresh(&self) -> StorageResult<MutexGuard<'_, BTreeMap<String, String>>> {
        let mut entries = lock_map(&self.entries)?;
        *entries = read_map(&self.path)?;
        Ok(entries)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self
            .path
            .with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));
        if let Err(e) = std::fs::write(&tmp_path, content) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Re-read the file, apply `mutate` to a copy, persist it, then swap it in.
    /// On any failure the in-memory map keeps the state last read from disk.
    fn update<F>(&self, mutate: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> StorageResult<bool>,
    {
        let mut entries = self.refresh()?;
        let mut next = entries.clone();
        if !mutate(&mut next)? {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

/// Load the map stored at `path`; a missing or blank file is an empty area
fn read_map(path: &Path) -> StorageResult<BTreeMap<String, String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    serde_json::from_str(&content)
        .map_err(|e| StorageError::Corruption(format!("{}: {}", path.display(), e)))
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.refresh()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let quota = self.quota;
        self.update(|entries| {
            check_quota(entries, quota, key, value)?;
            entries.insert(key.to_string(), value.to_string());
            Ok(true)
        })
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.update(|entries| Ok(entries.remove(key).is_some()))
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.refresh()?.keys().cloned().collect())
    }
}
