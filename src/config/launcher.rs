//! Launcher paths and remote endpoints
//!
//! Every location is configuration: CLI flags win over environment variables,
//! which win over the platform defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::constants::{config, remote};

/// Values given on the command line, all optional
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub settings_dir: Option<PathBuf>,
    pub install_dir: Option<PathBuf>,
    pub version_url: Option<String>,
    pub archive_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Directory holding settings, characters, servers and the version marker
    pub settings_dir: PathBuf,
    /// Archive extraction root and working directory of the game client
    pub install_dir: PathBuf,
    pub version_url: String,
    /// Archive URL with a `{version}` placeholder
    pub archive_url: String,
}

/// `%APPDATA%\Ugaris\settings` on Windows, `~/.Ugaris/settings` elsewhere
pub fn default_settings_dir() -> PathBuf {
    let root = if cfg!(windows) {
        dirs::config_dir().map(|p| p.join(config::APP_DIR))
    } else {
        dirs::home_dir().map(|p| p.join(format!(".{}", config::APP_DIR)))
    };

    root.unwrap_or_else(|| PathBuf::from("."))
        .join(config::SETTINGS_SUBDIR)
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

impl LauncherConfig {
    /// Resolve configuration from overrides, environment and platform defaults
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        let settings_dir = overrides
            .settings_dir
            .or_else(|| env_path(config::SETTINGS_DIR_ENV))
            .unwrap_or_else(default_settings_dir);

        let install_dir = overrides
            .install_dir
            .or_else(|| env_path(config::INSTALL_DIR_ENV))
            .unwrap_or_else(|| {
                settings_dir
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            });

        let resolved = Self {
            settings_dir,
            install_dir,
            version_url: overrides
                .version_url
                .unwrap_or_else(|| remote::VERSION_URL.to_string()),
            archive_url: overrides
                .archive_url
                .unwrap_or_else(|| remote::ARCHIVE_URL_TEMPLATE.to_string()),
        };
        debug!(config = ?resolved, "Resolved launcher configuration");
        resolved
    }

    /// Configuration rooted in a single directory
    #[cfg(test)]
    pub fn rooted_at(root: &Path) -> Self {
        Self::resolve(ConfigOverrides {
            settings_dir: Some(root.join(config::SETTINGS_SUBDIR)),
            install_dir: Some(root.to_path_buf()),
            ..Default::default()
        })
    }

    /// Create the settings and install directories if needed
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.settings_dir, &self.install_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {:?}", dir))?;
        }
        Ok(())
    }

    pub fn settings_file(&self) -> PathBuf {
        self.settings_dir.join(config::SETTINGS_FILENAME)
    }

    pub fn characters_file(&self) -> PathBuf {
        self.settings_dir.join(config::CHARACTERS_FILENAME)
    }

    pub fn servers_file(&self) -> PathBuf {
        self.settings_dir.join(config::SERVERS_FILENAME)
    }

    pub fn version_file(&self) -> PathBuf {
        self.settings_dir.join(config::VERSION_FILENAME)
    }
}
