//! Saved login profiles ("characters")
//!
//! Profiles live in `characters.json` as a JSON array of
//! `{server, username, password}` records. The store never fails a read:
//! a missing file is an empty list and records of the wrong shape are skipped.
//! Mutations rewrite the whole file and keep records they do not understand.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{LauncherError, Result};

/// A saved (server, username, password) login triple.
/// The password is stored in clear text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub server: String,
    pub username: String,
    pub password: String,
}

impl Profile {
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Identity key check; the password is not part of identity
    pub fn matches(&self, server: &str, username: &str) -> bool {
        self.server == server && self.username == username
    }

    fn from_record(record: &Value) -> Option<Self> {
        serde_json::from_value(record.clone()).ok()
    }
}

fn record_matches(record: &Value, server: &str, username: &str) -> bool {
    record.get("server").and_then(Value::as_str) == Some(server)
        && record.get("username").and_then(Value::as_str) == Some(username)
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// All well-formed profiles in insertion order
    pub fn list(&self) -> Vec<Profile> {
        let profiles: Vec<Profile> = self
            .read_records()
            .iter()
            .filter_map(Profile::from_record)
            .collect();
        debug!(count = profiles.len(), "Listed profiles");
        profiles
    }

    /// Append a profile. Duplicates are allowed.
    pub fn add(&self, profile: Profile) -> Result<()> {
        let mut records = self.read_records();
        info!(server = %profile.server, username = %profile.username, "Adding profile");

        let record = serde_json::to_value(&profile).map_err(|source| LauncherError::Parse {
            path: self.path.clone(),
            source,
        })?;
        records.push(record);
        self.write_records(&records)
    }

    /// Remove the first profile matching (server, username).
    /// Returns false without touching anything else when nothing matches.
    pub fn remove(&self, server: &str, username: &str) -> Result<bool> {
        let mut records = self.read_records();

        let Some(idx) = records
            .iter()
            .position(|r| record_matches(r, server, username))
        else {
            debug!(%server, %username, "No profile to remove");
            return Ok(false);
        };

        records.remove(idx);
        self.write_records(&records)?;
        info!(%server, %username, "Removed profile");
        Ok(true)
    }

    fn read_records(&self) -> Vec<Value> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to read profiles");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                warn!(path = ?self.path, "Profiles file is not a list, ignoring contents");
                Vec::new()
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to parse profiles, ignoring contents");
                Vec::new()
            }
        }
    }

    fn write_records(&self, records: &[Value]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(records).map_err(|source| LauncherError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|e| LauncherError::io(&self.path, e))
    }
}
