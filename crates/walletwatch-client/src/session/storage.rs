/*
[INPUT]:  String key/value pairs for the persisted wallet session
[OUTPUT]: Durable (or in-process) session record
[POS]:    Session layer - storage backends behind SessionStore
[UPDATE]: When adding storage backends or changing the on-disk format
*/

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Key holding the wallet bearer token
pub const WALLET_TOKEN_KEY: &str = "web3_token";
/// Key holding the serialized wallet identity
pub const WALLET_USER_KEY: &str = "web3_user";

const SESSION_FILE_NAME: &str = "session.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Temporary file error: {0}")]
    TempFile(#[from] tempfile::PersistError),
}

/// Key/value storage scoped to one client session.
///
/// Only [`crate::session::SessionStore`] writes through this trait.
pub trait SessionStorage: Send + Sync + fmt::Debug {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Clones share the same entries, so a fresh store built
/// over a clone behaves like a page reload within the same session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    value: String,
    saved_at: DateTime<Utc>,
}

/// File-backed storage: one JSON document in the session directory,
/// replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Store the session under `<dir>/session.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When an entry was last written
    pub fn saved_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.load().ok()?.get(key).map(|entry| entry.saved_at)
    }

    fn load(&self) -> Result<BTreeMap<String, StoredEntry>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, entries: &BTreeMap<String, StoredEntry>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut temp_file = NamedTempFile::new_in(&dir)?;
        let json = serde_json::to_string_pretty(entries)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(&self.path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.load().ok()?.remove(key).map(|entry| entry.value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // An unreadable file is overwritten rather than blocking new writes.
        let mut entries = self.load().unwrap_or_default();
        entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                saved_at: Utc::now(),
            },
        );
        self.save(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }

        let mut entries = self.load().unwrap_or_default();
        entries.remove(key);

        if entries.is_empty() {
            match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            }
        } else {
            self.save(&entries)
        }
    }
}
