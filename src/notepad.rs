// SPDX-License-Identifier: MPL-2.0
//! Notepad persistence.
//!
//! A single `{title, content}` note is stored as a JSON string under a fixed
//! key in a small file-backed key/value store. The note is read when the
//! notepad opens and written only on an explicit save; there is no schema
//! versioning.
//!
//! # Path Resolution
//!
//! 1. Use [`KeyValueStore::open_in`] with an explicit directory
//! 2. Set `RASTER_TOOLS_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Store file name within the app data directory.
const STORE_FILE: &str = "storage.json";

/// Key the note is stored under.
pub const NOTEPAD_KEY: &str = "online-notepad-data";

// =============================================================================
// Key/Value Store
// =============================================================================

/// String-to-string map persisted as one JSON object.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl KeyValueStore {
    /// Opens the store in the default data directory.
    pub fn open() -> Result<Self> {
        let dir = paths::get_app_data_dir()
            .ok_or_else(|| Error::Storage("data directory cannot be determined".into()))?;
        Self::open_in(&dir)
    }

    /// Opens the store in `dir`.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is also
    /// treated as empty (and logged) so the next save replaces it.
    pub fn open_in(dir: &Path) -> Result<Self> {
        let path = dir.join(STORE_FILE);
        let entries = if path.exists() {
            match fs::read_to_string(&path)
                .map_err(Error::from)
                .and_then(|text| serde_json::from_str(&text).map_err(Error::from))
            {
                Ok(entries) => entries,
                Err(err) => {
                    log::warn!("ignoring unreadable store {}: {err}", path.display());
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Sets `key` and writes the whole store to disk.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.into(), value.into());
        self.flush()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

// =============================================================================
// Note
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Note {
    /// Reads the note; missing or corrupt data yields an empty note.
    #[must_use]
    pub fn load(store: &KeyValueStore) -> Self {
        let Some(raw) = store.get(NOTEPAD_KEY) else {
            return Self::default();
        };
        serde_json::from_str(raw).unwrap_or_else(|err| {
            log::warn!("stored note is corrupt, starting empty: {err}");
            Self::default()
        })
    }

    pub fn save(&self, store: &mut KeyValueStore) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        store.set(NOTEPAD_KEY, raw)?;
        log::info!("note saved to {}", store.path().display());
        Ok(())
    }

    /// Plain-text form used for the clipboard.
    #[must_use]
    pub fn clipboard_text(&self) -> String {
        format!("Title: {}\n\n{}", self.title, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_reopen_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = KeyValueStore::open_in(dir.path()).unwrap();
        let note = Note {
            title: "Groceries".into(),
            content: "milk\neggs".into(),
        };
        note.save(&mut store).unwrap();

        let reopened = KeyValueStore::open_in(dir.path()).unwrap();
        assert_eq!(Note::load(&reopened), note);
    }

    #[test]
    fn missing_store_yields_empty_note() {
        let dir = tempdir().unwrap();
        let store = KeyValueStore::open_in(dir.path()).unwrap();
        assert_eq!(Note::load(&store), Note::default());
    }

    #[test]
    fn corrupt_store_file_is_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(STORE_FILE), "{not json").unwrap();
        let store = KeyValueStore::open_in(dir.path()).unwrap();
        assert!(store.get(NOTEPAD_KEY).is_none());
    }

    #[test]
    fn corrupt_note_value_yields_empty_note() {
        let dir = tempdir().unwrap();
        let mut store = KeyValueStore::open_in(dir.path()).unwrap();
        store.set(NOTEPAD_KEY, "[1, 2").unwrap();
        assert_eq!(Note::load(&store), Note::default());
    }

    #[test]
    fn clipboard_text_format() {
        let note = Note {
            title: "T".into(),
            content: "body".into(),
        };
        assert_eq!(note.clipboard_text(), "Title: T\n\nbody");
    }
}
