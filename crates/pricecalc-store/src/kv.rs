//! # Key-Value Storage
//!
//! The storage collaborator: string values under string keys, read and
//! overwritten whole.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  trait KeyValueStore                                                    │
//! │  ├── get(key)         → Option<String>                                  │
//! │  └── set(key, value)  → overwrite                                       │
//! │                                                                         │
//! │  MemoryStore   HashMap<String, String>        tests, embedding          │
//! │  FileStore     <dir>/<key>.json per key       desktop / CLI hosts       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Minimal string key-value storage.
pub trait KeyValueStore {
    /// Returns the stored value, `None` if the key was never written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrites the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory storage for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one entry already present.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryStore { entries }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// One JSON file per key inside a directory.
///
/// ## Behavior
/// - The directory is created on first write
/// - Writes go to a temporary file that is then renamed over the target,
///   so a crash never leaves half a rule list behind
/// - Keys are restricted to ASCII letters, digits, `-`, `_` and `.`, and may
///   not start with `.`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. Nothing touches the disk yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    /// Platform data directory for pricecalc.
    ///
    /// | Platform | Path |
    /// |----------|------|
    /// | Linux | `~/.local/share/pricecalc` |
    /// | macOS | `~/Library/Application Support/com.pricecalc.pricecalc` |
    /// | Windows | `%APPDATA%\pricecalc\pricecalc\data` |
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "pricecalc", "pricecalc").map(|dirs| dirs.data_dir().to_path_buf())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the storage directory if it is missing.
    ///
    /// Lets a host fail at startup instead of on the first save.
    pub fn ensure_dir(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> StoreResult<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if key.is_empty() || key.starts_with('.') || !key.chars().all(allowed) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!(path = %path.display(), bytes = value.len(), "Wrote storage entry");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_memory_store_with_entry() {
        let store = MemoryStore::with_entry("priceCalcRulesV1", "[]");
        assert_eq!(store.get("priceCalcRulesV1").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("priceCalcRulesV1").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_directory_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("data");
        let mut store = FileStore::new(&root);

        store.set("priceCalcRulesV1", "[1]").unwrap();
        store.set("priceCalcRulesV1", "[2]").unwrap();

        assert_eq!(store.get("priceCalcRulesV1").unwrap().as_deref(), Some("[2]"));
        let on_disk = fs::read_to_string(root.join("priceCalcRulesV1.json")).unwrap();
        assert_eq!(on_disk, "[2]");
        assert!(!root.join("priceCalcRulesV1.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_bad_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        for key in ["", "../escape", "a/b", ".hidden", "with space"] {
            assert!(
                matches!(store.set(key, "x"), Err(StoreError::InvalidKey(_))),
                "{key:?}"
            );
        }
        assert!(store.path_for("rules.v2-final_1").is_ok());
    }

    #[test]
    fn test_ensure_dir() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("a").join("b"));
        store.ensure_dir().unwrap();
        assert!(store.dir().is_dir());

        fs::write(dir.path().join("file"), "x").unwrap();
        let blocked = FileStore::new(dir.path().join("file").join("rules"));
        assert!(matches!(blocked.ensure_dir(), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_file_store_read_error_propagates() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be cannot be read as a string.
        fs::create_dir_all(dir.path().join("rules.json")).unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(store.get("rules"), Err(StoreError::Io(_))));
    }
}
