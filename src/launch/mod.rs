//! Game client launch: options encoding, command assembly and exec

pub mod command;
pub mod exec;
pub mod options;

pub use command::{LaunchCommand, LaunchCoordinator, Platform};
pub use exec::{LaunchResult, execute};
