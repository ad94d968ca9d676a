//! Persisted UI preferences.
//!
//! Replaces the browser-local key/value store of the original dashboard
//! with an explicit store object: one JSON file keyed by account id,
//! loaded once on start and written back on every change. Preferences are
//! non-critical; a missing or unreadable file just yields the defaults.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The preference keys the dashboard persists, per account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct Preferences {
    /// Last email this account signed in with (pre-filled next visit).
    pub last_email: Option<String>,
    pub theme: String,
    pub font_size: u8,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_email: None,
            theme: "light".to_string(),
            font_size: 14,
        }
    }
}

/// JSON-file-backed preference store with a load-on-start /
/// save-on-change contract.
///
/// Accounts that have never saved anything read as [`Preferences::default`].
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    current: Mutex<HashMap<String, Preferences>>,
}

impl PreferenceStore {
    /// Open the store, reading the file if present.
    ///
    /// Read or parse failures are logged and fall back to an empty store;
    /// preferences are never fatal to startup.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let current = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(prefs) => prefs,
                Err(e) => {
                    warn!("Ignoring malformed preference file {:?}: {}", path, e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!("Failed to read preference file {:?}: {}", path, e);
                HashMap::new()
            }
        };

        Self {
            path,
            current: Mutex::new(current),
        }
    }

    /// Current preferences of one account, defaults when it has none yet.
    pub fn get(&self, user_id: &str) -> Preferences {
        self.current.lock().get(user_id).cloned().unwrap_or_default()
    }

    /// Apply a change to one account's preferences and write the file
    /// immediately. Returns the updated values.
    pub fn update(
        &self,
        user_id: &str,
        apply: impl FnOnce(&mut Preferences),
    ) -> io::Result<Preferences> {
        let mut current = self.current.lock();
        let prefs = current.entry(user_id.to_string()).or_default();
        apply(prefs);
        let updated = prefs.clone();
        self.persist(&current)?;
        Ok(updated)
    }

    fn persist(&self, all: &HashMap<String, Preferences>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(all)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, raw)
    }
}
