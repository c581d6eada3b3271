//! Handing the process over to the game client

use std::process::Command;

use tracing::{error, info};

use super::command::LaunchCommand;
use crate::error::LauncherError;

/// Terminal state of a launch attempt
#[derive(Debug)]
pub enum LaunchResult {
    /// The client is running and the launcher should exit. Unix replaces
    /// the process instead, so only a failure ever returns there.
    #[cfg_attr(unix, allow(dead_code))]
    Launched,
    /// Nothing was started; the launcher keeps running
    Failed(LauncherError),
}

fn os_command(launch: &LaunchCommand) -> Command {
    let mut command = Command::new(&launch.program);
    command.args(&launch.args).current_dir(&launch.current_dir);
    command
}

fn launch_error(launch: &LaunchCommand, source: std::io::Error) -> LaunchResult {
    let err = LauncherError::Launch {
        program: launch.program.display().to_string(),
        source,
    };
    error!(error = %err, "Launch failed");
    LaunchResult::Failed(err)
}

/// Replace the launcher process with the client. Only returns on failure.
#[cfg(unix)]
pub fn execute(launch: &LaunchCommand) -> LaunchResult {
    use std::os::unix::process::CommandExt;

    info!(command = %launch.display_masked(), "Launching client");
    let source = os_command(launch).exec();
    launch_error(launch, source)
}

/// Start the client detached. The caller exits on [`LaunchResult::Launched`].
#[cfg(not(unix))]
pub fn execute(launch: &LaunchCommand) -> LaunchResult {
    info!(command = %launch.display_masked(), "Launching client");
    match os_command(launch).spawn() {
        Ok(child) => {
            info!(pid = child.id(), "Client started");
            LaunchResult::Launched
        }
        Err(source) => launch_error(launch, source),
    }
}
