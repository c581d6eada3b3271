//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Configuration paths and filenames
pub mod config {
    /// Application directory name (under %APPDATA% on Windows, dot-prefixed in $HOME elsewhere)
    pub const APP_DIR: &str = "Ugaris";

    /// Subdirectory holding the persisted launcher state
    pub const SETTINGS_SUBDIR: &str = "settings";

    /// Environment override for the settings directory
    pub const SETTINGS_DIR_ENV: &str = "UGARIS_LAUNCHER_SETTINGS_DIR";

    /// Environment override for the install directory
    pub const INSTALL_DIR_ENV: &str = "UGARIS_LAUNCHER_INSTALL_DIR";

    pub const SETTINGS_FILENAME: &str = "settings.json";
    pub const CHARACTERS_FILENAME: &str = "characters.json";
    pub const SERVERS_FILENAME: &str = "servers.json";

    /// Installed version marker. Holds a plain token; the extension is kept
    /// so existing installs keep their marker.
    pub const VERSION_FILENAME: &str = "version.json";
}

/// Remote release endpoints
pub mod remote {
    /// Latest version token (plain text or release JSON)
    pub const VERSION_URL: &str = "https://ugaris.com/client/version.txt";

    /// Client archive location, `{version}` is replaced by the version token
    pub const ARCHIVE_URL_TEMPLATE: &str = "https://ugaris.com/client/{version}_client.zip";

    /// Placeholder substituted in [`ARCHIVE_URL_TEMPLATE`]
    pub const VERSION_PLACEHOLDER: &str = "{version}";

    pub const USER_AGENT: &str = concat!("ugaris-launcher/", env!("CARGO_PKG_VERSION"));
}

/// Update download tuning
pub mod update {
    /// Bytes read from the response per chunk
    pub const CHUNK_SIZE: usize = 8192;

    /// Chunks read per GUI frame before yielding back to the event loop
    pub const CHUNKS_PER_FRAME: usize = 64;

    /// Prefix for the temporary archive written during download
    pub const TEMP_PREFIX: &str = ".client-update-";
}

/// Wine compatibility layer used to start the Windows client elsewhere
pub mod wine {
    /// Launcher binary resolved through PATH
    pub const LAUNCHER: &str = "wine";
}

/// Game client command line flags. Fixed by the client, do not reorder.
pub mod client_args {
    pub const USERNAME: &str = "-u";
    pub const PASSWORD: &str = "-p";
    pub const DESTINATION: &str = "-d";
    pub const OPTIONS: &str = "-o";
    pub const CACHE: &str = "-c";
    pub const FRAMES: &str = "-k";
    pub const MULTI: &str = "-m";
    pub const WIDTH: &str = "-w";
    pub const HEIGHT: &str = "-h";
}

/// GUI-specific constants (egui launcher window)
pub mod gui {
    use egui;

    /// Launcher window dimensions
    pub const WINDOW_WIDTH: f32 = 480.0;
    pub const WINDOW_HEIGHT: f32 = 560.0;
    pub const WINDOW_MIN_WIDTH: f32 = 400.0;
    pub const WINDOW_MIN_HEIGHT: f32 = 400.0;

    /// Layout spacing
    pub const ITEM_SPACING: f32 = 8.0;

    /// Alert level colors
    pub const COLOR_SUCCESS: egui::Color32 = egui::Color32::from_rgb(100, 200, 100); // Green - up to date / installed
    pub const COLOR_WARNING: egui::Color32 = egui::Color32::from_rgb(255, 200, 0); // Yellow - checking / update pending
    pub const COLOR_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 100, 100); // Red - errors
}

/// Default configuration values
pub mod defaults {
    /// Built-in server directory entry
    pub mod server {
        pub const NAME: &str = "Ugaris Server";
        pub const ADDRESS: &str = "login.ugaris.com";
    }
}
