//! Known login servers offered by the add-character dialog

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::defaults;
use crate::error::{LauncherError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub name: String,
    pub address: String,
}

impl ServerEntry {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ServerFile {
    #[serde(default)]
    servers: Vec<ServerEntry>,
}

fn default_servers() -> Vec<ServerEntry> {
    vec![ServerEntry::new(
        defaults::server::NAME,
        defaults::server::ADDRESS,
    )]
}

/// Reads and writes `servers.json` (`{"servers": [{name, address}]}`)
#[derive(Debug, Clone)]
pub struct ServerStore {
    path: PathBuf,
}

impl ServerStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Known servers. Creates the file with the built-in server on first use.
    pub fn list(&self) -> Vec<ServerEntry> {
        match self.read() {
            Ok(Some(servers)) => servers,
            Ok(None) => {
                let servers = default_servers();
                if let Err(err) = self.write(&servers) {
                    warn!(error = %err, "Failed to create default server list");
                } else {
                    info!(path = ?self.path, "Created default server list");
                }
                servers
            }
            Err(err) => {
                warn!(error = %err, "Failed to load server list, using built-in server");
                default_servers()
            }
        }
    }

    /// Append a server. An unreadable file is left alone and reported.
    pub fn add(&self, entry: ServerEntry) -> Result<()> {
        let mut servers = self.read()?.unwrap_or_else(default_servers);
        info!(name = %entry.name, address = %entry.address, "Adding server");
        servers.push(entry);
        self.write(&servers)
    }

    /// Remove the server at `index`; out-of-range indices are ignored
    pub fn remove(&self, index: usize) -> Result<()> {
        let mut servers = self.read()?.unwrap_or_else(default_servers);
        if index >= servers.len() {
            return Ok(());
        }
        let removed = servers.remove(index);
        info!(name = %removed.name, "Removed server");
        self.write(&servers)
    }

    /// Stored servers, None when the file does not exist yet
    fn read(&self) -> Result<Option<Vec<ServerEntry>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| LauncherError::io(&self.path, e))?;
        let file: ServerFile =
            serde_json::from_str(&contents).map_err(|source| LauncherError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(file.servers))
    }

    fn write(&self, servers: &[ServerEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }
        let file = ServerFile {
            servers: servers.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| LauncherError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|e| LauncherError::io(&self.path, e))
    }
}
