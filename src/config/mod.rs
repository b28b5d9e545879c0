//! Configuration management.
//!
//! Configuration is read from `~/.config/tintuc/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;
pub mod portal;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;
pub use portal::{ApiConfig, CarouselConfig, HomeConfig, SectionConfig};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub home: HomeConfig,
    pub carousel: CarouselConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

impl Config {
    /// Load configuration from the default path, creating a commented default
    /// file when there is none. Missing fields use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    /// `~/.config/tintuc/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tintuc").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, DEFAULT_CONFIG).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!("Wrote default configuration to {}", path.display());
        Ok(())
    }
}

const DEFAULT_CONFIG: &str = r##"# tintuc configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "A", "1"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"

[api]
# Endpoint returning the article summary document
summary_url = "http://10.208.50.7:3019/gateway/articles/summary?source_id=5"

# Request timeout in seconds
timeout_secs = 15

# Links to this origin (and relative links) open inside tintuc
site_origin = "http://localhost:3000"

# user_agent = "tintuc/0.1"

[home]
# Highlighted cards at the top of the home screen
highlighted_limit = 5

# Slides in "Tiêu điểm trong tháng"
slider_size = 6

# "Cùng chủ đề" cards under an article
related_limit = 8

# Category sections, in display order. When a category has fewer than
# min_articles articles, built-in cards are shown instead.
[[home.sections]]
category = "ĐẦU TƯ"
label = "Khám phá"
min_articles = 1

[[home.sections]]
category = "CHỨNG KHOÁN"
label = "A.I"
min_articles = 1

[[home.sections]]
category = "THỊ TRƯỜNG"
label = "Mobile"
min_articles = 1

[[home.sections]]
category = "CHUYỂN ĐỔI SỐ"
label = "Game"
min_articles = 1

[carousel]
# Auto-advance interval (milliseconds)
tick_ms = 1500

# After manual navigation, wait this long before auto-advancing again
idle_resume_secs = 5

# Minimum drag distance for a swipe
swipe_threshold = 50

[colors]
active_border = "Green"
inactive_border = "DarkGray"
selection_bg = "#008F41"
selection_fg = "White"

# Category badge
tag_bg = "#D8F999"
tag_fg = "Black"

headline = "White"
time = "Gray"

# Article body
internal_link = "Green"
external_link = "Blue"
focused_link = "Yellow"
quote = "Cyan"
embed = "Magenta"
error = "LightRed"

# Status bar
status_fg = "White"
status_bg = "DarkGray"

[keybindings]
# Navigation
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_pane = ["Tab"]
prev_pane = ["BackTab", "Shift+Tab"]

# Articles
select = ["Enter"]
back = ["Esc", "Backspace"]
next_link = ["n"]
prev_link = ["N"]
open_in_browser = ["o"]
refresh = ["R"]

# Slider
slide_next = ["l", "Right"]
slide_prev = ["h", "Left"]
toggle_slider_pause = ["p"]
"##;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config =
            toml::from_str(DEFAULT_CONFIG).expect("Default config should be valid TOML");

        assert_eq!(config.colors.selection_bg, Color::Rgb(0, 143, 65));
        assert_eq!(config.keybindings.quit, vec!["q", "Ctrl+c"]);
        assert_eq!(config.home.sections, HomeConfig::default().sections);
        assert_eq!(config.carousel.tick_ms, 1500);
        assert_eq!(config.api.summary_url, ApiConfig::default().summary_url);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[api]
summary_url = "https://api.example.vn/summary"

[[home.sections]]
category = "GAME"
label = "Game"
min_articles = 3

[colors]
active_border = "#FF0000"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.api.summary_url, "https://api.example.vn/summary");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.home.sections.len(), 1);
        assert_eq!(config.home.sections[0].min_articles, 3);
        assert_eq!(config.home.related_limit, 8);
        assert_eq!(config.colors.active_border, Color::Rgb(255, 0, 0));
        assert_eq!(config.colors.inactive_border, Color::DarkGray);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.home.sections.len(), 4);
        assert_eq!(config.keybindings.back, vec!["Esc", "Backspace"]);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.home.highlighted_limit, 5);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[[home.sections]]"));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[carousel]\ntick_ms = \"fast\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
