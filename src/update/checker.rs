//! Latest-release check against the version endpoint

use reqwest::blocking::Client;
use tracing::{info, warn};

use super::version::{RemoteRelease, VersionMarker};
use crate::error::Result;

/// Result of a successful check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    UpToDate {
        release: RemoteRelease,
    },
    /// `installed` is None on first run, which installs without prompting
    Available {
        release: RemoteRelease,
        installed: Option<String>,
    },
}

impl UpdateCheck {
    pub fn release(&self) -> &RemoteRelease {
        match self {
            UpdateCheck::UpToDate { release } | UpdateCheck::Available { release, .. } => release,
        }
    }

    pub fn is_first_run(&self) -> bool {
        matches!(self, UpdateCheck::Available { installed: None, .. })
    }
}

pub struct UpdateChecker {
    client: Client,
    version_url: String,
    marker: VersionMarker,
}

impl UpdateChecker {
    pub fn new(client: Client, version_url: String, marker: VersionMarker) -> Self {
        Self {
            client,
            version_url,
            marker,
        }
    }

    /// Fetch the latest release token from the version endpoint
    pub fn fetch_latest(&self) -> Result<RemoteRelease> {
        let body = self
            .client
            .get(&self.version_url)
            .send()?
            .error_for_status()?
            .text()?;
        RemoteRelease::parse(&body)
    }

    /// Compare the remote token with the installed marker
    pub fn check(&self) -> Result<UpdateCheck> {
        let release = self.fetch_latest().inspect_err(|err| {
            warn!(url = %self.version_url, error = %err, "Update check failed");
        })?;

        let outcome = match self.marker.read() {
            None => {
                info!(latest = %release.version, "No installed version, update required");
                UpdateCheck::Available {
                    release,
                    installed: None,
                }
            }
            Some(installed) if installed == release.version => {
                info!(version = %installed, "Client is up to date");
                UpdateCheck::UpToDate { release }
            }
            Some(installed) => {
                info!(%installed, latest = %release.version, "Update available");
                UpdateCheck::Available {
                    release,
                    installed: Some(installed),
                }
            }
        };

        Ok(outcome)
    }

    pub fn installed_version(&self) -> Option<String> {
        self.marker.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCategory, LauncherError};

    fn checker(server: &mockito::Server, dir: &tempfile::TempDir) -> UpdateChecker {
        UpdateChecker::new(
            Client::new(),
            format!("{}/client/version.txt", server.url()),
            VersionMarker::new(dir.path().join("version.json")),
        )
    }

    #[test]
    fn test_first_run_is_always_available() {
        let dir = tempfile::tempdir().unwrap();

        for body in ["1.0", r#"{"tag_name": "v2"}"#] {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/client/version.txt")
                .with_status(200)
                .with_body(body)
                .create();

            let outcome = checker(&server, &dir).check().unwrap();
            assert!(outcome.is_first_run(), "body {body:?} gave {outcome:?}");
            mock.assert();
        }
    }

    #[test]
    fn test_equal_tokens_are_up_to_date() {
        let mut server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let mock = server
            .mock("GET", "/client/version.txt")
            .with_status(200)
            .with_body("2024-06-01\n")
            .create();

        let checker = checker(&server, &dir);
        checker.marker.write("2024-06-01").unwrap();

        let outcome = checker.check().unwrap();
        mock.assert();
        assert!(matches!(outcome, UpdateCheck::UpToDate { .. }));
        assert_eq!(outcome.release().version, "2024-06-01");
    }

    #[test]
    fn test_different_tokens_are_available() {
        let mut server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let _mock = server
            .mock("GET", "/client/version.txt")
            .with_status(200)
            .with_body("1.10")
            .create();

        let checker = checker(&server, &dir);
        // Exact string comparison, no version ordering
        checker.marker.write("1.9").unwrap();

        match checker.check().unwrap() {
            UpdateCheck::Available { release, installed } => {
                assert_eq!(release.version, "1.10");
                assert_eq!(installed.as_deref(), Some("1.9"));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_http_error_is_network_error() {
        let mut server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let _mock = server
            .mock("GET", "/client/version.txt")
            .with_status(503)
            .create();

        let err = checker(&server, &dir).check().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_response_without_version_fails_check() {
        let dir = tempfile::tempdir().unwrap();

        for body in ["", "   \n", r#"{"message": "rate limited"}"#] {
            let mut server = mockito::Server::new();
            let _mock = server
                .mock("GET", "/client/version.txt")
                .with_status(200)
                .with_body(body)
                .create();

            let err = checker(&server, &dir).check().unwrap_err();
            assert!(matches!(err, LauncherError::Release(_)), "body {body:?} gave {err:?}");
            assert_eq!(err.category(), ErrorCategory::Network);
        }
    }
}
