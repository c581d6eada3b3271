//! Command line front end
//!
//! Runs the same update and launch flow as the GUI without opening a window.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use tracing::info;

use crate::config::ServerEntry;
use crate::launch::LaunchResult;
use crate::launcher::Launcher;
use crate::update::{InstallOutcome, UpdateCheck};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compare the installed client with the latest release
    Check,
    /// Download and install the latest client if it is out of date
    Update {
        /// Reinstall even when the installed version is current
        #[arg(long)]
        force: bool,
    },
    /// List saved characters
    Characters,
    /// Start the client with a saved character
    Launch { server: String, username: String },
    /// List known login servers
    Servers,
    /// Add a login server to the add-character list
    AddServer { name: String, address: String },
    /// Remove a login server by its position in `servers`
    RemoveServer { index: usize },
}

pub fn run(launcher: &Launcher, command: Command) -> Result<()> {
    match command {
        Command::Check => check(launcher),
        Command::Update { force } => update(launcher, force),
        Command::Characters => characters(launcher),
        Command::Launch { server, username } => launch(launcher, &server, &username),
        Command::Servers => {
            for (idx, server) in launcher.servers().list().iter().enumerate() {
                println!("{idx}  {}  ({})", server.name, server.address);
            }
            Ok(())
        }
        Command::AddServer { name, address } => {
            launcher.servers().add(ServerEntry::new(name, address))?;
            Ok(())
        }
        Command::RemoveServer { index } => {
            launcher.servers().remove(index)?;
            Ok(())
        }
    }
}

fn check(launcher: &Launcher) -> Result<()> {
    let outcome = launcher.checker().check()?;
    match &outcome {
        UpdateCheck::UpToDate { release } => println!("Up to date ({})", release.version),
        UpdateCheck::Available { release, installed } => println!(
            "Update available: {} -> {}",
            installed.as_deref().unwrap_or("not installed"),
            release.version
        ),
    }
    if let Some(notes) = &outcome.release().notes {
        println!("\n{notes}");
    }
    Ok(())
}

fn update(launcher: &Launcher, force: bool) -> Result<()> {
    let outcome = launcher.checker().check()?;
    if matches!(outcome, UpdateCheck::UpToDate { .. }) && !force {
        println!("Already up to date ({})", outcome.release().version);
        return Ok(());
    }

    let version = outcome.release().version.clone();
    let mut last_percent = None;
    let result = launcher.installer().install(&version, |progress| {
        let percent = progress.fraction().map(|f| (f * 100.0) as u32);
        if percent.is_some() && percent != last_percent {
            last_percent = percent;
            eprint!("\rDownloading {}: {}%", version, percent.unwrap_or(0));
        }
    });
    if last_percent.is_some() {
        eprintln!();
    }

    match result {
        InstallOutcome::Ok { version } => {
            println!(
                "Installed version {version} into {}",
                launcher.config().install_dir.display()
            );
            Ok(())
        }
        InstallOutcome::DownloadFailed(err) => {
            Err(err).with_context(|| format!("Failed to download version {version}"))
        }
        InstallOutcome::ExtractFailed(err) => {
            Err(err).with_context(|| format!("Failed to install version {version}"))
        }
    }
}

fn characters(launcher: &Launcher) -> Result<()> {
    let profiles = launcher.profiles().list();
    if profiles.is_empty() {
        println!("No saved characters");
        return Ok(());
    }

    let width = profiles.iter().map(|p| p.server.len()).max().unwrap_or(0);
    for profile in profiles {
        println!("{:<width$}  {}", profile.server, profile.username);
    }
    Ok(())
}

fn launch(launcher: &Launcher, server: &str, username: &str) -> Result<()> {
    let Some(profile) = launcher.find_profile(server, username) else {
        bail!("No saved character {username} on {server}");
    };

    if launcher.installed_version().is_none() {
        bail!("Client is not installed, run `update` first");
    }

    info!(%server, %username, "Launching from command line");
    match launcher.launch(&profile) {
        LaunchResult::Launched => Ok(()),
        LaunchResult::Failed(err) => Err(err.into()),
    }
}
