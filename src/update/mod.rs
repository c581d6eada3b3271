//! Client update: release check, archive download and extraction

pub mod checker;
pub mod installer;
pub mod version;

pub use checker::{UpdateCheck, UpdateChecker};
pub use installer::{Download, InstallOutcome, Progress, Step, UpdateInstaller};
pub use version::{RemoteRelease, VersionMarker};
