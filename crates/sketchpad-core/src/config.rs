//! Application configuration loaded from a JSON file.

use crate::brush::{BrushState, DEFAULT_BRUSH_SIZE};
use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "SKETCHPAD_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which raster converter to use for PNG output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterBackend {
    /// Built-in rasterizer if compiled in, otherwise Ghostscript if installed.
    #[default]
    Auto,
    Builtin,
    Ghostscript,
    /// Never rasterize; PNG requests always fall back to PostScript.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub backend: RasterBackend,
    /// Ghostscript executable; `gs` on the PATH when unset.
    pub ghostscript_path: Option<PathBuf>,
}

/// Startup configuration. Every field has a default, so partial files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    #[serde(with = "hex_color")]
    pub background_color: SerializableColor,
    #[serde(with = "hex_color")]
    pub brush_color: SerializableColor,
    pub brush_size: u32,
    pub raster: RasterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "SketchPad".to_string(),
            width: 900,
            height: 600,
            background_color: SerializableColor::white(),
            brush_color: SerializableColor::black(),
            brush_size: DEFAULT_BRUSH_SIZE,
            raster: RasterConfig::default(),
        }
    }
}

impl AppConfig {
    /// Default config file location: `$SKETCHPAD_CONFIG`, else
    /// `<config dir>/sketchpad/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("sketchpad").join("config.json"))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from the default location, falling back to defaults on any error.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::info!("No config directory, using defaults");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Configuration loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Starting brush described by this config (size clamped).
    pub fn brush(&self) -> BrushState {
        BrushState::new(self.brush_color, self.brush_size, self.background_color)
    }
}

/// `#rrggbb` string representation for colors in the config file.
mod hex_color {
    use crate::shapes::SerializableColor;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(color: &SerializableColor, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&color.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SerializableColor, D::Error> {
        let s = String::deserialize(d)?;
        SerializableColor::from_hex(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid color `{}`, expected #rrggbb", s)))
    }
}
