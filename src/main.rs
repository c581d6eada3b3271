#![deny(unsafe_code)]

mod common;
mod config;
mod constants;
mod error;
mod gui;
mod headless;
mod launch;
mod launcher;
mod update;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::Level as TraceLevel;
use tracing_subscriber::FmtSubscriber;

use crate::config::{ConfigOverrides, LauncherConfig};
use crate::launcher::Launcher;

#[derive(Parser)]
#[command(name = "ugaris-launcher")]
#[command(version)]
#[command(about = "Updater and launcher for the Ugaris game client", long_about = None)]
struct Cli {
    /// Enable debug logging and log system information at startup
    #[arg(long)]
    debug: bool,

    /// Directory holding settings, characters and the installed version marker
    #[arg(long, value_name = "DIR")]
    settings_dir: Option<PathBuf>,

    /// Directory the client is installed into and started from
    #[arg(long, value_name = "DIR")]
    install_dir: Option<PathBuf>,

    /// Endpoint returning the latest release version
    #[arg(long, value_name = "URL")]
    version_url: Option<String>,

    /// Archive URL template, `{version}` is replaced by the release version
    #[arg(long, value_name = "URL")]
    archive_url: Option<String>,

    /// Run a single command instead of opening the launcher window
    #[command(subcommand)]
    command: Option<headless::Command>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.debug {
        TraceLevel::DEBUG
    } else {
        TraceLevel::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let config = LauncherConfig::resolve(ConfigOverrides {
        settings_dir: cli.settings_dir,
        install_dir: cli.install_dir,
        version_url: cli.version_url,
        archive_url: cli.archive_url,
    });
    config.ensure_dirs()?;

    if cli.debug {
        common::debug::log_system_info(&config);
    }

    let launcher = Launcher::new(config)?;

    match cli.command {
        Some(command) => headless::run(&launcher, command),
        // Default mode: the launcher window
        None => gui::run_gui(launcher),
    }
}
