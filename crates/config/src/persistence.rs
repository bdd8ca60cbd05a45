//! Client-local session persistence.
//!
//! Filter selections, the active grouping dimension, and per-column collapse
//! flags survive widget reloads. They live outside the host's record store,
//! in small JSON files under the user configuration directory, each keyed by
//! a fixed string identifier: read at startup, written on every change.
//!
//! Reads fail soft: a missing or corrupt entry simply yields `None` so the
//! board starts from defaults rather than refusing to render.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Session key for the persisted filter state.
pub const FILTERS_KEY: &str = "filters";

/// Session key for the persisted grouping dimension.
pub const GROUP_BY_KEY: &str = "group_by";

/// Session key for the persisted column collapse flags.
pub const COLLAPSED_KEY: &str = "collapsed";

/// Application directory name under the user configuration directory.
const APP_CONFIG_DIR: &str = "kanri";

/// Subdirectory holding session entries.
const SESSION_DIR: &str = "session";

/// Reads and parses a JSON or JSON5 file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json5::from_str(&contents)?)
}

/// Serializes a value to pretty JSON and writes it to a file, creating
/// parent directories as needed.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json_file<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    std::fs::write(path, contents).map_err(|source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// A key-value store for client-local session state.
///
/// One JSON file per key under the session directory.
///
/// # Examples
///
/// ```
/// use kanri_config::SessionStore;
/// use tempfile::TempDir;
///
/// let dir = TempDir::new().unwrap();
/// let store = SessionStore::at(dir.path());
///
/// store.set("group_by", &"priority").unwrap();
/// let restored: Option<String> = store.get("group_by");
/// assert_eq!(restored.as_deref(), Some("priority"));
/// ```
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Opens the default session store under the user configuration
    /// directory (typically `~/.config/kanri/session/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the user configuration directory cannot be
    /// determined.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .map(|d| d.join(APP_CONFIG_DIR).join(SESSION_DIR))
            .ok_or(ConfigError::NoConfigDirectory)?;
        Ok(Self::at(dir))
    }

    /// Opens a session store rooted at a specific directory.
    #[must_use]
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads a value by key.
    ///
    /// Missing entries yield `None` silently; corrupt entries yield `None`
    /// with a warning, so stale state never blocks startup.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        if !path.exists() {
            return None;
        }
        match read_json_file(&path) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(key, %error, "discarding unreadable session entry");
                None
            }
        }
    }

    /// Writes a value by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        write_json_file(self.path_for(key), value)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}
