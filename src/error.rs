//! Launcher error taxonomy
//!
//! Every failure surfaced to the status label maps onto one [`ErrorCategory`].
//! Parse failures of persisted files are normally recovered inside the stores
//! and only logged; the variant exists for callers that want the cause.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = LauncherError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LauncherError {
    /// Remote fetch failed or the server answered with a non-success status
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Version endpoint answered with a body that names no release
    #[error("invalid release information: {0}")]
    Release(String),

    /// Response stream broke off before the archive was complete
    #[error("download interrupted: {0}")]
    Interrupted(#[source] io::Error),

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required launch field is empty or malformed
    #[error("{field} is required but is empty or invalid")]
    Validation { field: &'static str },

    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    /// Update package is corrupt or contains unsupported entries
    #[error("invalid update archive: {0}")]
    Archive(String),

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse error classes shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parse,
    Validation,
    Archive,
    Launch,
    Io,
}

impl LauncherError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) | Self::Release(_) | Self::Interrupted(_) => ErrorCategory::Network,
            Self::Parse { .. } => ErrorCategory::Parse,
            Self::Validation { .. } | Self::InvalidSetting { .. } => ErrorCategory::Validation,
            Self::Archive(_) => ErrorCategory::Archive,
            Self::Launch { .. } => ErrorCategory::Launch,
            Self::Io { .. } => ErrorCategory::Io,
        }
    }
}

impl From<zip::result::ZipError> for LauncherError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}
