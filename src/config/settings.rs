//! Game client settings with JSON persistence
//!
//! The record is a flat key/value map whose shape is fixed by [`SCHEMA`].
//! Loading walks the schema by key, so unknown keys in the file are ignored
//! and missing or mistyped keys fall back to their defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LauncherError, Result};

/// Setting keys, shared with the options bit table
pub mod keys {
    pub const TRUE_FULLSCREEN: &str = "enable_true_full_screen";
    pub const WINDOWED_FULLSCREEN: &str = "enable_fullscreen";
    pub const RESOLUTION: &str = "resolution";
    pub const SOUND: &str = "enable_sound";
    pub const DARK_GUI: &str = "enable_dark_gui";
    pub const CONTEXT_MENU: &str = "enable_context";
    pub const KEYBINDINGS: &str = "enable_keybindings";
    pub const SMALLER_BOTTOM_WINDOW: &str = "enable_smaller_bottom_window";
    pub const SMALLER_TOP_WINDOW: &str = "enable_smaller_top_window";
    pub const BIG_HEALTH_BAR: &str = "enable_big_health_bar";
    pub const LARGE_FONT: &str = "enable_large_font";
    pub const LEGACY_MOUSE_WHEEL: &str = "enable_legacy_mouse_wheel";
    pub const INVENTORY_OPTIMIZATION: &str = "enable_inventory_optimization";
    pub const ANIMATION_OPTIMIZATION: &str = "enable_animation_optimization";
    pub const GAMMA_INCREASE: &str = "enable_gamma_increase";
    pub const GAMMA_INCREASE_MORE: &str = "enable_gamma_increase_more";
    pub const MINIMAP_MANAGEMENT: &str = "enable_minimap_management";
    pub const MINIMAP: &str = "enable_minimap";
    pub const SLIDING_TOP_BAR_SENSITIVITY: &str = "enable_sliding_top_bar_sensitivity";
    pub const LIGHTING_EFFECTS_REDUCTION: &str = "enable_lighting_effects_reduction";
    pub const APPDATA_USAGE: &str = "enable_appdata_usage";
    pub const EXECUTABLE_NAME: &str = "executable_name";
    pub const SDL_FRAMES: &str = "sdl_frames";
    pub const SDL_CACHE_SIZE: &str = "sdl_cache_size";
    pub const SDL_MULTI: &str = "sdl_multi";

    /// Key the resolution was stored under by older launcher releases
    pub const LEGACY_RESOLUTION: &str = "resolution_combo";
}

/// Resolutions offered while running windowed
pub const RESOLUTIONS: &[&str] = &["800x600", "1600x1200", "2400x1800", "3200x2400"];

/// Value type and default of a single setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Flag {
        default: bool,
    },
    /// Inclusive range enforced by [`Settings::set`]
    Integer {
        default: i64,
        min: i64,
        max: i64,
    },
    Choice {
        default: &'static str,
        options: &'static [&'static str],
    },
    Text {
        default: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: SettingKind,
}

impl SettingField {
    pub fn default_value(&self) -> SettingValue {
        match self.kind {
            SettingKind::Flag { default } => SettingValue::Flag(default),
            SettingKind::Integer { default, .. } => SettingValue::Integer(default),
            SettingKind::Choice { default, .. } | SettingKind::Text { default } => {
                SettingValue::Text(default.to_string())
            }
        }
    }
}

const fn flag(key: &'static str, label: &'static str) -> SettingField {
    SettingField {
        key,
        label,
        kind: SettingKind::Flag { default: false },
    }
}

const fn integer(key: &'static str, label: &'static str, min: i64, max: i64) -> SettingField {
    SettingField {
        key,
        label,
        kind: SettingKind::Integer {
            default: min,
            min,
            max,
        },
    }
}

/// Ordered settings schema, also the display order of the settings window
pub const SCHEMA: &[SettingField] = &[
    flag(keys::TRUE_FULLSCREEN, "Fullscreen"),
    flag(keys::WINDOWED_FULLSCREEN, "Windowed Fullscreen"),
    SettingField {
        key: keys::RESOLUTION,
        label: "Resolution (Windowed mode only)",
        kind: SettingKind::Choice {
            default: "800x600",
            options: RESOLUTIONS,
        },
    },
    flag(keys::SOUND, "Sound"),
    flag(keys::DARK_GUI, "Dark GUI"),
    flag(keys::CONTEXT_MENU, "Context Menu Enabled"),
    flag(keys::KEYBINDINGS, "Enable Keybindings"),
    flag(keys::SMALLER_BOTTOM_WINDOW, "Smaller Bottom GUI"),
    flag(keys::SMALLER_TOP_WINDOW, "Top GUI Slides Away"),
    flag(keys::BIG_HEALTH_BAR, "Big Health/Mana Bars"),
    flag(keys::LARGE_FONT, "Large Font"),
    flag(keys::LEGACY_MOUSE_WHEEL, "Legacy Mouse Wheel Logic"),
    flag(keys::INVENTORY_OPTIMIZATION, "Faster Inventory"),
    flag(keys::ANIMATION_OPTIMIZATION, "Reduced Animation Buffer"),
    flag(keys::GAMMA_INCREASE, "Increase Gamma"),
    flag(keys::GAMMA_INCREASE_MORE, "More Gamma Increase"),
    flag(keys::MINIMAP_MANAGEMENT, "Manage Minimaps"),
    flag(keys::MINIMAP, "Enable Minimap"),
    flag(
        keys::SLIDING_TOP_BAR_SENSITIVITY,
        "Less Sensitive Sliding Top Bar",
    ),
    flag(
        keys::LIGHTING_EFFECTS_REDUCTION,
        "Reduced Lighting Effects",
    ),
    flag(keys::APPDATA_USAGE, "Write to %appdata%"),
    SettingField {
        key: keys::EXECUTABLE_NAME,
        label: "Executable Name",
        kind: SettingKind::Text { default: "" },
    },
    integer(keys::SDL_FRAMES, "SDL Frames", 24, 60),
    integer(keys::SDL_CACHE_SIZE, "SDL Cache Size", 8000, 16000),
    integer(keys::SDL_MULTI, "SDL Multi-threading", 4, 10),
];

/// Look up a schema entry by key
pub fn field(key: &str) -> Option<&'static SettingField> {
    SCHEMA.iter().find(|f| f.key == key)
}

/// A single stored value, serialized as a bare JSON bool/number/string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Integer(i64),
    Text(String),
}

impl SettingValue {
    fn from_json(kind: SettingKind, value: &serde_json::Value) -> Option<Self> {
        match kind {
            SettingKind::Flag { .. } => value.as_bool().map(SettingValue::Flag),
            SettingKind::Integer { .. } => value.as_i64().map(SettingValue::Integer),
            SettingKind::Choice { options, .. } => value
                .as_str()
                .filter(|s| options.contains(s))
                .map(|s| SettingValue::Text(s.to_string())),
            SettingKind::Text { .. } => value.as_str().map(|s| SettingValue::Text(s.to_string())),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            SettingValue::Flag(_) => "flag",
            SettingValue::Integer(_) => "integer",
            SettingValue::Text(_) => "text",
        }
    }
}

/// Immutable-by-default snapshot of every schema key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<&'static str, SettingValue>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            values: SCHEMA.iter().map(|f| (f.key, f.default_value())).collect(),
        }
    }
}

impl Settings {
    /// Build a record from a parsed JSON object, walking the schema by key.
    /// Integers are taken as stored without clamping; choices outside the
    /// option list fall back to the default.
    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut settings = Self::default();

        for field in SCHEMA {
            let stored = map.get(field.key).or_else(|| {
                (field.key == keys::RESOLUTION)
                    .then(|| map.get(keys::LEGACY_RESOLUTION))
                    .flatten()
            });

            match stored.and_then(|v| SettingValue::from_json(field.kind, v)) {
                Some(value) => {
                    settings.values.insert(field.key, value);
                }
                None if stored.is_some() => {
                    warn!(
                        key = field.key,
                        value = ?stored,
                        "Setting has unexpected type or value, using default"
                    );
                }
                None => {}
            }
        }

        if settings.flag(keys::TRUE_FULLSCREEN) && settings.flag(keys::WINDOWED_FULLSCREEN) {
            warn!("Both fullscreen modes enabled in settings file, keeping true fullscreen");
            settings
                .values
                .insert(keys::WINDOWED_FULLSCREEN, SettingValue::Flag(false));
        }

        settings
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Boolean value of `key`, false for unknown or non-flag keys
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(SettingValue::Flag(true)))
    }

    pub fn integer(&self, key: &str) -> i64 {
        match (self.values.get(key), field(key).map(|f| f.kind)) {
            (Some(SettingValue::Integer(v)), _) => *v,
            (_, Some(SettingKind::Integer { default, .. })) => default,
            _ => 0,
        }
    }

    pub fn text(&self, key: &str) -> &str {
        match self.values.get(key) {
            Some(SettingValue::Text(s)) => s,
            _ => "",
        }
    }

    /// True when either fullscreen mode is on, making the resolution irrelevant
    pub fn is_fullscreen(&self) -> bool {
        self.flag(keys::TRUE_FULLSCREEN) || self.flag(keys::WINDOWED_FULLSCREEN)
    }

    /// Update a setting from UI input.
    ///
    /// Integers are clamped into their range, choices must be one of the
    /// offered options, and enabling one fullscreen mode clears the other.
    pub fn set(&mut self, key: &str, value: SettingValue) -> Result<()> {
        let field = field(key).ok_or_else(|| LauncherError::InvalidSetting {
            key: key.to_string(),
            reason: "unknown setting".to_string(),
        })?;

        let mismatch = |value: &SettingValue| LauncherError::InvalidSetting {
            key: key.to_string(),
            reason: format!("expected {:?}, got {}", field.kind, value.kind_name()),
        };

        let value = match (field.kind, value) {
            (SettingKind::Flag { .. }, SettingValue::Flag(enabled)) => {
                if enabled {
                    let other = match field.key {
                        keys::TRUE_FULLSCREEN => Some(keys::WINDOWED_FULLSCREEN),
                        keys::WINDOWED_FULLSCREEN => Some(keys::TRUE_FULLSCREEN),
                        _ => None,
                    };
                    if let Some(other) = other {
                        self.values.insert(other, SettingValue::Flag(false));
                    }
                }
                SettingValue::Flag(enabled)
            }
            (SettingKind::Integer { min, max, .. }, SettingValue::Integer(v)) => {
                SettingValue::Integer(v.clamp(min, max))
            }
            (SettingKind::Choice { options, .. }, SettingValue::Text(s)) => {
                if !options.contains(&s.as_str()) {
                    return Err(LauncherError::InvalidSetting {
                        key: key.to_string(),
                        reason: format!("{s:?} is not one of {options:?}"),
                    });
                }
                SettingValue::Text(s)
            }
            (SettingKind::Text { .. }, SettingValue::Text(s)) => SettingValue::Text(s),
            (_, other) => return Err(mismatch(&other)),
        };

        self.values.insert(field.key, value);
        Ok(())
    }

    /// Parse the chosen resolution into (width, height)
    pub fn resolution(&self) -> Option<(u32, u32)> {
        let (w, h) = self.text(keys::RESOLUTION).split_once('x')?;
        Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
    }
}

/// Reads and writes `settings.json`
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load settings, falling back to defaults when the file is missing or malformed
    pub fn load(&self) -> Settings {
        match self.try_load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                info!(path = ?self.path, "Settings file not found, loading defaults");
                Settings::default()
            }
            Err(err) => {
                warn!(error = %err, "Failed to load settings, loading defaults");
                Settings::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents =
            fs::read_to_string(&self.path).map_err(|e| LauncherError::io(&self.path, e))?;
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&contents)
            .map_err(|source| LauncherError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = ?self.path, keys = map.len(), "Loaded settings file");
        Ok(Some(Settings::from_json_map(&map)))
    }

    /// Overwrite the settings file with `settings`
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| LauncherError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(settings).map_err(|source| {
            LauncherError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|e| LauncherError::io(&self.path, e))?;

        info!(path = ?self.path, "Saved settings");
        Ok(())
    }
}
