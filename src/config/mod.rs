//! Configuration management
//!
//! Handles the launcher's flat-file JSON persistence: game settings,
//! saved login profiles, the server directory and resolved paths.

pub mod launcher;
pub mod profile;
pub mod servers;
pub mod settings;

pub use launcher::{ConfigOverrides, LauncherConfig};
pub use profile::{Profile, ProfileStore};
pub use servers::{ServerEntry, ServerStore};
pub use settings::{SettingValue, Settings, SettingsStore};
