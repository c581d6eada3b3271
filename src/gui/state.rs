use eframe::egui;
use tracing::{error, info, warn};

use crate::config::{Profile, ServerEntry, Settings};
use crate::constants::gui::*;
use crate::constants::update::CHUNKS_PER_FRAME;
use crate::error::ErrorCategory;
use crate::launch::LaunchResult;
use crate::launcher::Launcher;
use crate::update::{Download, InstallOutcome, Progress, RemoteRelease, Step, UpdateCheck};

/// Update lifecycle as shown in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateState {
    Checking,
    UpToDate,
    /// Waiting for the user to accept or decline
    UpdateAvailable {
        version: String,
    },
    Installing {
        version: String,
        progress: Progress,
    },
    Error(String),
}

impl UpdateState {
    pub fn color(&self) -> egui::Color32 {
        match self {
            UpdateState::UpToDate => COLOR_SUCCESS,
            UpdateState::Checking
            | UpdateState::UpdateAvailable { .. }
            | UpdateState::Installing { .. } => COLOR_WARNING,
            UpdateState::Error(_) => COLOR_ERROR,
        }
    }

    pub fn label(&self) -> String {
        match self {
            UpdateState::Checking => "Checking for updates...".to_string(),
            UpdateState::UpToDate => "Client is up to date".to_string(),
            UpdateState::UpdateAvailable { version } => format!("Update available: {version}"),
            UpdateState::Installing { version, progress } => match progress.fraction() {
                Some(fraction) => format!("Downloading {version}: {:.0}%", fraction * 100.0),
                None => format!("Downloading {version}: {} KiB", progress.downloaded / 1024),
            },
            UpdateState::Error(message) => message.clone(),
        }
    }
}

pub struct StatusMessage {
    pub text: String,
    pub color: egui::Color32,
}

impl StatusMessage {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: COLOR_ERROR,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: COLOR_SUCCESS,
        }
    }
}

/// Launcher window state. All commands run on the UI thread.
pub struct LauncherState {
    pub launcher: Launcher,
    pub update_state: UpdateState,
    pub release: Option<RemoteRelease>,
    pub status_message: Option<StatusMessage>,
    pub profiles: Vec<Profile>,
    pub servers: Vec<ServerEntry>,
    pub settings: Settings,
    pub selected_profile: Option<usize>,
    download: Option<Download>,
    installed: Option<String>,
}

impl LauncherState {
    pub fn new(launcher: Launcher) -> Self {
        let profiles = launcher.profiles().list();
        let servers = launcher.servers().list();
        let settings = launcher.settings().load();
        let installed = launcher.installed_version();

        Self {
            launcher,
            update_state: UpdateState::Checking,
            release: None,
            status_message: None,
            selected_profile: (!profiles.is_empty()).then_some(0),
            profiles,
            servers,
            settings,
            download: None,
            installed,
        }
    }

    pub fn installed_version(&self) -> Option<&str> {
        self.installed.as_deref()
    }

    pub fn is_installing(&self) -> bool {
        self.download.is_some()
    }

    /// Launch needs an installed client and no install in flight
    pub fn can_launch(&self) -> bool {
        self.installed.is_some() && !self.is_installing()
    }

    /// Query the version endpoint. First run starts the install right away.
    pub fn run_check(&mut self) {
        self.update_state = UpdateState::Checking;

        match self.launcher.checker().check() {
            Ok(outcome) => {
                self.release = Some(outcome.release().clone());
                let first_run = outcome.is_first_run();
                match outcome {
                    UpdateCheck::UpToDate { .. } => self.update_state = UpdateState::UpToDate,
                    UpdateCheck::Available { release, .. } if first_run => {
                        info!(version = %release.version, "First run, installing client");
                        self.start_install(release.version);
                    }
                    UpdateCheck::Available { release, .. } => {
                        self.update_state = UpdateState::UpdateAvailable {
                            version: release.version,
                        }
                    }
                }
            }
            Err(err) => {
                self.update_state = UpdateState::Error(format!("Update check failed: {err}"));
            }
        }
    }

    /// Accept the pending update prompt
    pub fn accept_update(&mut self) {
        if let UpdateState::UpdateAvailable { version } = &self.update_state {
            let version = version.clone();
            self.start_install(version);
        }
    }

    /// Decline the pending update and keep the installed client
    pub fn decline_update(&mut self) {
        if matches!(self.update_state, UpdateState::UpdateAvailable { .. }) {
            info!("Update declined");
            self.update_state = UpdateState::UpToDate;
            self.status_message = Some(StatusMessage {
                text: "Update skipped".to_string(),
                color: COLOR_WARNING,
            });
        }
    }

    pub fn start_install(&mut self, version: String) {
        match self.launcher.installer().begin(&version) {
            Ok(download) => {
                self.update_state = UpdateState::Installing {
                    version,
                    progress: download.progress(),
                };
                self.download = Some(download);
            }
            Err(err) => {
                error!(%version, error = %err, "Failed to start download");
                self.update_state = UpdateState::Error(format!("Download failed: {err}"));
            }
        }
    }

    /// Advance the running download by one frame's worth of chunks.
    /// Returns true while more work remains.
    pub fn poll_download(&mut self) -> bool {
        let Some(download) = self.download.as_mut() else {
            return false;
        };

        match download.step(CHUNKS_PER_FRAME) {
            Ok(Step::Pending(progress)) => {
                self.set_progress(progress);
                true
            }
            Ok(Step::Complete(progress)) => {
                self.set_progress(progress);
                if let Some(download) = self.download.take() {
                    let outcome = self.launcher.installer().finish(download);
                    self.apply_install_outcome(outcome);
                }
                false
            }
            Err(err) => {
                error!(error = %err, "Download failed");
                self.download = None;
                self.update_state = UpdateState::Error(format!("Download failed: {err}"));
                false
            }
        }
    }

    fn set_progress(&mut self, new_progress: Progress) {
        if let UpdateState::Installing { progress, .. } = &mut self.update_state {
            *progress = new_progress;
        }
    }

    fn apply_install_outcome(&mut self, outcome: InstallOutcome) {
        match outcome {
            InstallOutcome::Ok { version } => {
                self.status_message = Some(StatusMessage::success(format!(
                    "Installed version {version}"
                )));
                self.installed = Some(version);
                self.update_state = UpdateState::UpToDate;
            }
            InstallOutcome::DownloadFailed(err) => {
                self.update_state = UpdateState::Error(format!("Download failed: {err}"));
            }
            InstallOutcome::ExtractFailed(err) => {
                self.update_state = UpdateState::Error(format!("Installing update failed: {err}"));
            }
        }
    }

    pub fn selected(&self) -> Option<&Profile> {
        self.selected_profile.and_then(|idx| self.profiles.get(idx))
    }

    fn reload_profiles(&mut self) {
        self.profiles = self.launcher.profiles().list();
        self.selected_profile = match self.selected_profile {
            _ if self.profiles.is_empty() => None,
            Some(idx) => Some(idx.min(self.profiles.len() - 1)),
            None => Some(0),
        };
    }

    pub fn add_profile(&mut self, profile: Profile) {
        if let Err(err) = self.launcher.profiles().add(profile) {
            error!(error = %err, "Failed to save character");
            self.status_message = Some(StatusMessage::error(format!("Save failed: {err}")));
        }
        self.reload_profiles();
        self.selected_profile = self.profiles.len().checked_sub(1);
    }

    pub fn delete_profile(&mut self, profile: &Profile) {
        match self
            .launcher
            .profiles()
            .remove(&profile.server, &profile.username)
        {
            Ok(true) => {}
            Ok(false) => warn!(username = %profile.username, "Character was already removed"),
            Err(err) => {
                error!(error = %err, "Failed to delete character");
                self.status_message = Some(StatusMessage::error(format!("Delete failed: {err}")));
            }
        }
        self.reload_profiles();
    }

    pub fn save_settings(&mut self, settings: Settings) {
        match self.launcher.settings().save(&settings) {
            Ok(()) => {
                self.settings = settings;
                self.status_message = Some(StatusMessage::success("Settings saved"));
            }
            Err(err) => {
                error!(error = %err, "Failed to save settings");
                self.status_message = Some(StatusMessage::error(format!("Save failed: {err}")));
            }
        }
    }

    /// Launch the selected character. Returns true when the launcher should close.
    pub fn launch_selected(&mut self) -> bool {
        let Some(profile) = self.selected().cloned() else {
            self.status_message = Some(StatusMessage::error("Select a character first"));
            return false;
        };

        match self.launcher.launch(&profile) {
            LaunchResult::Launched => true,
            LaunchResult::Failed(err) => {
                let color = match err.category() {
                    ErrorCategory::Validation => COLOR_WARNING,
                    _ => COLOR_ERROR,
                };
                self.status_message = Some(StatusMessage {
                    text: err.to_string(),
                    color,
                });
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LauncherConfig;
    use crate::launch::Platform;
    use std::io::{Cursor, Write};

    fn state_with(server: &mockito::Server, dir: &tempfile::TempDir) -> LauncherState {
        let mut config = LauncherConfig::rooted_at(dir.path());
        config.version_url = format!("{}/version", server.url());
        config.archive_url = format!("{}/client/{{version}}_client.zip", server.url());
        LauncherState::new(Launcher::with_platform(config, Platform::Native).unwrap())
    }

    fn client_zip() -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("moac.exe", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"client").unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_first_run_installs_without_prompt() {
        let mut server = mockito::Server::new();
        let _version = server
            .mock("GET", "/version")
            .with_status(200)
            .with_body("3")
            .create();
        let _archive = server
            .mock("GET", "/client/3_client.zip")
            .with_status(200)
            .with_body(client_zip())
            .create();
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with(&server, &dir);

        assert!(!state.can_launch());
        state.run_check();
        assert!(matches!(state.update_state, UpdateState::Installing { .. }));
        assert!(!state.can_launch());

        while state.poll_download() {}

        assert_eq!(state.update_state, UpdateState::UpToDate);
        assert_eq!(state.installed_version(), Some("3"));
        assert!(state.can_launch());
        assert!(dir.path().join("moac.exe").exists());
    }

    #[test]
    fn test_existing_install_prompts_and_can_decline() {
        let mut server = mockito::Server::new();
        let _version = server
            .mock("GET", "/version")
            .with_status(200)
            .with_body("4")
            .create();
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("settings")).unwrap();
        std::fs::write(dir.path().join("settings").join("version.json"), "3").unwrap();

        let mut state = state_with(&server, &dir);
        state.run_check();
        assert_eq!(
            state.update_state,
            UpdateState::UpdateAvailable {
                version: "4".to_string()
            }
        );

        state.decline_update();
        assert_eq!(state.update_state, UpdateState::UpToDate);
        assert!(state.can_launch());
    }

    #[test]
    fn test_check_failure_is_error_state() {
        let mut server = mockito::Server::new();
        let _version = server.mock("GET", "/version").with_status(502).create();
        let dir = tempfile::tempdir().unwrap();

        let mut state = state_with(&server, &dir);
        state.run_check();
        assert!(matches!(state.update_state, UpdateState::Error(_)));
        assert_eq!(state.update_state.color(), COLOR_ERROR);
    }

    #[test]
    fn test_profile_selection_follows_changes() {
        let server = mockito::Server::new();
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with(&server, &dir);
        assert_eq!(state.selected_profile, None);

        state.add_profile(Profile::new("login.ugaris.com", "hero", "pw"));
        state.add_profile(Profile::new("login.ugaris.com", "sidekick", "pw"));
        assert_eq!(state.selected().map(|p| p.username.as_str()), Some("sidekick"));

        let sidekick = state.profiles[1].clone();
        state.delete_profile(&sidekick);
        assert_eq!(state.selected().map(|p| p.username.as_str()), Some("hero"));

        let hero = state.profiles[0].clone();
        state.delete_profile(&hero);
        assert_eq!(state.selected_profile, None);
    }
}
