use std::process::Command;

use tracing::info;

use crate::config::LauncherConfig;
use crate::constants::wine;

/// Log system information for debugging purposes
pub fn log_system_info(config: &LauncherConfig) {
    info!("=== System Information ===");
    info!("Launcher: {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("Platform: {} ({})", std::env::consts::OS, std::env::consts::ARCH);

    // Kernel Version
    if cfg!(unix)
        && let Ok(kernel) = get_command_output("uname", &["-sr"])
    {
        info!("Kernel: {}", kernel);
    }

    // OS / Distribution
    if let Ok(os_release) = std::fs::read_to_string("/etc/os-release") {
        for line in os_release.lines() {
            if line.starts_with("PRETTY_NAME=") {
                let name = line.trim_start_matches("PRETTY_NAME=").trim_matches('"');
                info!("OS: {}", name);
                break;
            }
        }
    }

    // The client is a Windows binary; everywhere else it needs Wine
    if !cfg!(windows) {
        match get_command_output(wine::LAUNCHER, &["--version"]) {
            Ok(version) if !version.is_empty() => info!("Wine: {}", version),
            _ => info!("Wine: not found on PATH"),
        }
    }

    info!("Settings directory: {}", config.settings_dir.display());
    info!("Install directory: {}", config.install_dir.display());

    info!("==========================");
}

fn get_command_output(cmd: &str, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new(cmd).args(args).output()?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
