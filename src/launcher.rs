//! Launcher service
//!
//! Owns the stores and the update and launch components for one resolved
//! [`LauncherConfig`]. Both front ends drive the launcher through this type,
//! so each command reads fresh snapshots from disk instead of sharing cached
//! UI state.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::info;

use crate::config::{LauncherConfig, Profile, ProfileStore, ServerStore, SettingsStore};
use crate::constants::remote;
use crate::error::Result;
use crate::launch::{self, LaunchCommand, LaunchCoordinator, LaunchResult, Platform, options};
use crate::update::{UpdateChecker, UpdateInstaller, VersionMarker};

pub struct Launcher {
    config: LauncherConfig,
    settings: SettingsStore,
    profiles: ProfileStore,
    servers: ServerStore,
    checker: UpdateChecker,
    installer: UpdateInstaller,
    coordinator: LaunchCoordinator,
}

impl Launcher {
    pub fn new(config: LauncherConfig) -> Result<Self> {
        Self::with_platform(config, Platform::host())
    }

    pub fn with_platform(config: LauncherConfig, platform: Platform) -> Result<Self> {
        // Downloads are not time-limited
        let client = Client::builder()
            .user_agent(remote::USER_AGENT)
            .timeout(None::<Duration>)
            .build()?;

        let marker = VersionMarker::new(config.version_file());
        let launcher = Self {
            settings: SettingsStore::new(config.settings_file()),
            profiles: ProfileStore::new(config.characters_file()),
            servers: ServerStore::new(config.servers_file()),
            checker: UpdateChecker::new(client.clone(), config.version_url.clone(), marker.clone()),
            installer: UpdateInstaller::new(
                client,
                config.archive_url.clone(),
                config.install_dir.clone(),
                marker,
            ),
            coordinator: LaunchCoordinator::new(config.install_dir.clone(), platform),
            config,
        };

        info!(
            settings_dir = ?launcher.config.settings_dir,
            install_dir = ?launcher.config.install_dir,
            ?platform,
            "Launcher initialized"
        );
        Ok(launcher)
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn servers(&self) -> &ServerStore {
        &self.servers
    }

    pub fn checker(&self) -> &UpdateChecker {
        &self.checker
    }

    pub fn installer(&self) -> &UpdateInstaller {
        &self.installer
    }

    pub fn installed_version(&self) -> Option<String> {
        self.checker.installed_version()
    }

    /// First saved profile with the given identity
    pub fn find_profile(&self, server: &str, username: &str) -> Option<Profile> {
        self.profiles
            .list()
            .into_iter()
            .find(|p| p.matches(server, username))
    }

    /// Build the command for `profile` from the settings currently on disk
    pub fn prepare_launch(&self, profile: &Profile) -> Result<LaunchCommand> {
        let settings = self.settings.load();
        let options = options::encode_settings(&settings);
        self.coordinator.build_command(profile, &settings, options)
    }

    pub fn launch(&self, profile: &Profile) -> LaunchResult {
        match self.prepare_launch(profile) {
            Ok(command) => launch::execute(&command),
            Err(err) => LaunchResult::Failed(err),
        }
    }
}
