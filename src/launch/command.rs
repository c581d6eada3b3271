//! Game client command line assembly

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::config::settings::keys;
use crate::config::{Profile, Settings};
use crate::constants::{client_args, wine};
use crate::error::{LauncherError, Result};

/// How the Windows client binary is started on this host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Run the client binary directly
    Native,
    /// Run it through the Wine compatibility layer
    Compat,
}

impl Platform {
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Native
        } else {
            Platform::Compat
        }
    }
}

/// Program and arguments ready to hand to the OS
#[derive(Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory of the client
    pub current_dir: PathBuf,
}

impl LaunchCommand {
    /// Command line with the password argument masked, for logs and status text
    pub fn display_masked(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|arg| {
            match arg.strip_prefix(client_args::PASSWORD) {
                Some(rest) if rest.starts_with(' ') => format!("{} ****", client_args::PASSWORD),
                _ => arg.clone(),
            }
        }));
        parts.join(" ")
    }
}

// Never print credentials through Debug
impl fmt::Debug for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchCommand")
            .field("command", &self.display_masked())
            .field("current_dir", &self.current_dir)
            .finish()
    }
}

fn flag_arg(flag: &str, value: impl fmt::Display) -> String {
    format!("{flag} {value}")
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LauncherError::Validation { field });
    }
    Ok(value)
}

#[derive(Debug, Clone)]
pub struct LaunchCoordinator {
    install_dir: PathBuf,
    platform: Platform,
}

impl LaunchCoordinator {
    pub fn new(install_dir: PathBuf, platform: Platform) -> Self {
        Self {
            install_dir,
            platform,
        }
    }

    /// Build the client command line. Pure: nothing is started.
    pub fn build_command(
        &self,
        profile: &Profile,
        settings: &Settings,
        options: u32,
    ) -> Result<LaunchCommand> {
        let server = required("server", &profile.server)?;
        let username = required("username", &profile.username)?;
        let password = required("password", &profile.password)?;
        let executable = required("executable", settings.text(keys::EXECUTABLE_NAME))?;

        let executable = self.install_dir.join(executable);

        let mut args = Vec::new();
        let program = match self.platform {
            Platform::Native => executable,
            Platform::Compat => {
                args.push(executable.display().to_string());
                PathBuf::from(wine::LAUNCHER)
            }
        };

        args.push(flag_arg(client_args::USERNAME, username));
        args.push(flag_arg(client_args::PASSWORD, password));
        args.push(flag_arg(client_args::DESTINATION, server));
        args.push(flag_arg(client_args::OPTIONS, options));
        args.push(flag_arg(client_args::CACHE, settings.integer(keys::SDL_CACHE_SIZE)));
        args.push(flag_arg(client_args::FRAMES, settings.integer(keys::SDL_FRAMES)));
        args.push(flag_arg(client_args::MULTI, settings.integer(keys::SDL_MULTI)));

        if !settings.is_fullscreen() {
            let (width, height) = settings
                .resolution()
                .ok_or(LauncherError::Validation { field: "resolution" })?;
            args.push(flag_arg(client_args::WIDTH, width));
            args.push(flag_arg(client_args::HEIGHT, height));
        }

        let command = LaunchCommand {
            program,
            args,
            current_dir: self.install_dir.clone(),
        };
        debug!(command = %command.display_masked(), "Built launch command");
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingValue;

    fn hero() -> Profile {
        Profile::new("login.example.com", "hero", "pw")
    }

    fn windowed_settings() -> Settings {
        let mut settings = Settings::default();
        settings
            .set(keys::RESOLUTION, SettingValue::Text("1600x1200".into()))
            .unwrap();
        settings
            .set(keys::EXECUTABLE_NAME, SettingValue::Text("moac.exe".into()))
            .unwrap();
        settings
    }

    fn expected_args() -> Vec<String> {
        [
            "-u hero",
            "-p pw",
            "-d login.example.com",
            "-o 0",
            "-c 8000",
            "-k 24",
            "-m 4",
            "-w 1600",
            "-h 1200",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_native_command_order() {
        let coordinator = LaunchCoordinator::new(PathBuf::from("/games/ugaris"), Platform::Native);
        let command = coordinator
            .build_command(&hero(), &windowed_settings(), 0)
            .unwrap();

        assert_eq!(command.program, PathBuf::from("/games/ugaris/moac.exe"));
        assert_eq!(command.args, expected_args());
        assert_eq!(command.current_dir, PathBuf::from("/games/ugaris"));
    }

    #[test]
    fn test_compat_prefixes_executable() {
        let coordinator = LaunchCoordinator::new(PathBuf::from("/games/ugaris"), Platform::Compat);
        let command = coordinator
            .build_command(&hero(), &windowed_settings(), 0)
            .unwrap();

        assert_eq!(command.program, PathBuf::from("wine"));
        assert_eq!(command.args[0], "/games/ugaris/moac.exe");
        assert_eq!(command.args[1..], expected_args()[..]);
    }

    #[test]
    fn test_fullscreen_omits_resolution() {
        let coordinator = LaunchCoordinator::new(PathBuf::from("/games/ugaris"), Platform::Native);
        let mut settings = windowed_settings();
        settings
            .set(keys::WINDOWED_FULLSCREEN, SettingValue::Flag(true))
            .unwrap();

        let command = coordinator.build_command(&hero(), &settings, 5).unwrap();
        assert_eq!(command.args.len(), 7);
        assert_eq!(command.args[3], "-o 5");
        assert!(!command.args.iter().any(|a| a.starts_with("-w") || a.starts_with("-h")));
    }

    #[test]
    fn test_empty_fields_are_validation_errors() {
        let coordinator = LaunchCoordinator::new(PathBuf::from("/games"), Platform::Native);
        let settings = windowed_settings();

        let cases = [
            (Profile::new("", "hero", "pw"), "server"),
            (Profile::new("login.example.com", "  ", "pw"), "username"),
            (Profile::new("login.example.com", "hero", ""), "password"),
        ];
        for (profile, expected) in cases {
            match coordinator.build_command(&profile, &settings, 0) {
                Err(LauncherError::Validation { field }) => assert_eq!(field, expected),
                other => panic!("expected validation error for {expected}, got {other:?}"),
            }
        }

        match coordinator.build_command(&hero(), &Settings::default(), 0) {
            Err(LauncherError::Validation { field }) => assert_eq!(field, "executable"),
            other => panic!("expected executable validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_values_are_trimmed() {
        let coordinator = LaunchCoordinator::new(PathBuf::from("/games/ugaris"), Platform::Native);
        let profile = Profile::new(" login.example.com ", "hero\n", " pw");
        let command = coordinator
            .build_command(&profile, &windowed_settings(), 0)
            .unwrap();
        assert_eq!(command.args, expected_args());
    }

    #[test]
    fn test_password_masked_in_display() {
        let coordinator = LaunchCoordinator::new(PathBuf::from("/games/ugaris"), Platform::Native);
        let command = coordinator
            .build_command(&Profile::new("login.example.com", "hero", "s3cret"), &windowed_settings(), 0)
            .unwrap();

        let shown = command.display_masked();
        assert!(shown.contains("-p ****"));
        assert!(!shown.contains("s3cret"));
        assert!(!format!("{command:?}").contains("s3cret"));
    }
}
