//! Configuration system
//!
//! Any `serde` type with a `Default` can be loaded from and saved to `.toml`
//! or `.ron` files through the [`Config`] trait. [`GameConfig`] is the
//! configuration a [`Game`](crate::game::Game) is booted with.

use std::fmt;
use std::str::FromStr;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Packed 0xRRGGBB color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Black
    pub const BLACK: Color = Color(0x000000);
    /// White
    pub const WHITE: Color = Color(0xffffff);

    /// Pack 8-bit channels
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(u32::from_be_bytes([0, r, g, b]))
    }

    /// Red, green and blue channels
    pub fn rgb(self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();
        (r, g, b)
    }

    /// Normalized RGBA with full opacity, as render backends expect
    pub fn to_rgba_f32(self) -> [f32; 4] {
        let (r, g, b) = self.rgb();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xffffff)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    /// Accepts `#rrggbb`, `0xrrggbb` or bare `rrggbb`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .trim_start_matches('#')
            .trim_start_matches("0x")
            .trim_start_matches("0X");
        if digits.len() != 6 {
            return Err(ConfigError::Invalid(format!("color '{}' is not rrggbb", s)));
        }
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|e| ConfigError::Invalid(format!("color '{}': {}", s, e)))
    }
}

/// Boot configuration of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window or canvas title
    pub title: String,

    /// Logical width in pixels
    pub width: u32,

    /// Logical height in pixels
    pub height: u32,

    /// Identifier of the host surface to attach to, if any
    pub parent: Option<String>,

    /// Clear color
    pub background_color: Color,

    /// Base path for relative loader urls
    pub asset_path: String,

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Stage".to_string(),
            width: 800,
            height: 600,
            parent: None,
            background_color: Color::BLACK,
            asset_path: String::new(),
            log_level: "info".to_string(),
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Create a configuration with the given size and defaults elsewhere
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the clear color
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the loader base path
    pub fn with_asset_path(mut self, path: impl Into<String>) -> Self {
        self.asset_path = path.into();
        self
    }

    /// Reject values a game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("stage_engine_{}_{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_size_is_invalid() {
        assert!(matches!(GameConfig::new(0, 600).validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GameConfig = toml::from_str("title = \"Demo\"\nbackground_color = 16711680\n").unwrap();

        assert_eq!(config.title, "Demo");
        assert_eq!(config.background_color.rgb(), (0xff, 0, 0));
        assert_eq!(config.width, 800);
    }

    #[test]
    fn test_toml_and_ron_round_trip() {
        let config = GameConfig::new(320, 240)
            .with_title("Round trip")
            .with_background_color(Color::from_rgb(1, 2, 3))
            .with_asset_path("assets");

        for ext in ["toml", "ron"] {
            let path = temp_path(&format!("config.{}", ext));
            config.save_to_file(&path).unwrap();
            let loaded = GameConfig::load_from_file(&path).unwrap();
            std::fs::remove_file(&path).ok();
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = GameConfig::default().save_to_file(&temp_path("config.yaml"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color(0xff8000));
        assert_eq!("0x0000ff".parse::<Color>().unwrap(), Color(0x0000ff));
        assert!("fff".parse::<Color>().is_err());
        assert_eq!(Color(0xff8000).to_string(), "#ff8000");
    }
}
