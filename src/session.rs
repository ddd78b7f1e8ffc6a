//! Session storage: a small string key-value file
//!
//! Mirrors browser session storage. Values are strings; the saved position
//! lives under [`COORDINATES_KEY`] as the JSON text `{"lat":..,"lon":..}`.
//! The default file is scoped to one terminal session and lives in the
//! login's runtime dir, which is emptied at logout.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::state::Coordinates;

pub const COORDINATES_KEY: &str = "user-coordinates";

/// Environment variables that name the current terminal session, most specific first.
const SESSION_ENV_VARS: [&str; 2] = ["SKYTAB_SESSION", "TERM_SESSION_ID"];

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session entry is corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<runtime dir>/skytab/session-<id>.json`, falling back to the temp dir.
    ///
    /// `<id>` comes from [`SESSION_ENV_VARS`], else the parent (shell) process,
    /// so a new terminal asks for the location again.
    pub fn default_path() -> PathBuf {
        dirs_next::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("skytab")
            .join(session_file_name(&terminal_session_id()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    /// Store one value. An unreadable file is replaced rather than blocking writes.
    pub async fn set(&self, key: &str, value: String) -> Result<(), SessionError> {
        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(SessionError::Corrupt(e)) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt session file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value);
        self.write_entries(&entries).await
    }

    /// Saved coordinates, or `None` if nothing has been stored yet.
    pub async fn coordinates(&self) -> Result<Option<Coordinates>, SessionError> {
        match self.get(COORDINATES_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn store_coordinates(&self, coordinates: &Coordinates) -> Result<(), SessionError> {
        let raw = serde_json::to_string(coordinates)?;
        self.set(COORDINATES_KEY, raw).await
    }

    /// Forget everything; a missing file is not an error.
    pub async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write beside the target, then rename over it.
    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, json).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

fn terminal_session_id() -> String {
    SESSION_ENV_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|id| !id.is_empty()))
        .unwrap_or_else(parent_process_id)
}

#[cfg(unix)]
fn parent_process_id() -> String {
    std::os::unix::process::parent_id().to_string()
}

#[cfg(not(unix))]
fn parent_process_id() -> String {
    "default".to_string()
}

/// File name for a session id, with anything path-like replaced.
fn session_file_name(id: &str) -> String {
    let id: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("session-{id}.json")
}
