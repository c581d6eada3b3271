//! Version tokens: the locally installed marker and the remote release
//!
//! Tokens are opaque strings compared by exact equality. No semantic
//! version parsing happens anywhere.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{LauncherError, Result};

/// Locally cached token of the last successfully installed release
#[derive(Debug, Clone)]
pub struct VersionMarker {
    path: PathBuf,
}

impl VersionMarker {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Installed token, or None before the first successful install
    pub fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to read version marker");
                None
            }
        }
    }

    pub fn write(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }
        fs::write(&self.path, token).map_err(|e| LauncherError::io(&self.path, e))?;
        debug!(path = ?self.path, version = %token, "Recorded installed version");
        Ok(())
    }
}

/// Latest published release as reported by the version endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRelease {
    pub version: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
struct ReleaseDocument {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl RemoteRelease {
    /// Parse an endpoint body. A release JSON object (`tag_name` or
    /// `version`, optional `body` or `notes`) is preferred; anything else is
    /// taken as a plain-text token. A body naming no version is an error.
    pub fn parse(body: &str) -> Result<Self> {
        let trimmed = body.trim();

        let (version, notes) = if trimmed.starts_with('{') {
            let doc: ReleaseDocument = serde_json::from_str(trimmed)
                .map_err(|e| LauncherError::Release(format!("malformed release document: {e}")))?;
            let version = doc
                .tag_name
                .filter(|v| !v.trim().is_empty())
                .or(doc.version)
                .ok_or_else(|| LauncherError::Release("release document has no version".into()))?;
            let notes = doc.body.filter(|n| !n.trim().is_empty()).or(doc.notes);
            (version.trim().to_string(), notes)
        } else {
            (trimmed.to_string(), None)
        };

        if version.is_empty() {
            return Err(LauncherError::Release("empty version".into()));
        }

        Ok(Self {
            version,
            notes: notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let marker = VersionMarker::new(dir.path().join("version.json"));

        assert_eq!(marker.read(), None);
        marker.write("2024-05-01").unwrap();
        assert_eq!(marker.read(), Some("2024-05-01".to_string()));
    }

    #[test]
    fn test_marker_trims_and_treats_blank_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.json");
        let marker = VersionMarker::new(path.clone());

        fs::write(&path, "v7\n").unwrap();
        assert_eq!(marker.read(), Some("v7".to_string()));

        fs::write(&path, "  \n").unwrap();
        assert_eq!(marker.read(), None);
    }

    #[test]
    fn test_parse_plain_text() {
        let release = RemoteRelease::parse("  1.4.2\n").unwrap();
        assert_eq!(release.version, "1.4.2");
        assert_eq!(release.notes, None);
    }

    #[test]
    fn test_parse_release_json() {
        let release = RemoteRelease::parse(
            r#"{"tag_name": "v3.1", "body": "Faster inventory", "prerelease": false}"#,
        )
        .unwrap();
        assert_eq!(release.version, "v3.1");
        assert_eq!(release.notes.as_deref(), Some("Faster inventory"));

        let release = RemoteRelease::parse(r#"{"version": "9", "notes": ""}"#).unwrap();
        assert_eq!(release.version, "9");
        assert_eq!(release.notes, None);
    }

    #[test]
    fn test_parse_document_with_both_key_spellings() {
        let release =
            RemoteRelease::parse(r#"{"tag_name": "v5", "version": "v5", "body": "notes"}"#)
                .unwrap();
        assert_eq!(release.version, "v5");
        assert_eq!(release.notes.as_deref(), Some("notes"));

        let release = RemoteRelease::parse(
            r#"{"tag_name": "v6", "version": "6", "body": "", "notes": "from notes"}"#,
        )
        .unwrap();
        assert_eq!(release.version, "v6");
        assert_eq!(release.notes.as_deref(), Some("from notes"));
    }

    #[test]
    fn test_json_without_version_is_rejected() {
        let err = RemoteRelease::parse(r#"{"message": "rate limited"}"#).unwrap_err();
        assert!(matches!(err, LauncherError::Release(_)));

        let err = RemoteRelease::parse(r#"{"tag_name": 5}"#).unwrap_err();
        assert!(matches!(err, LauncherError::Release(_)));
    }

    #[test]
    fn test_empty_body_is_rejected() {
        for body in ["", "  \n", r#"{"version": "  "}"#] {
            let err = RemoteRelease::parse(body).unwrap_err();
            assert!(matches!(err, LauncherError::Release(_)), "body {body:?}");
        }
    }
}
