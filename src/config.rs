//! Configuration for the siteterm terminal
//!
//! Supports an optional TOML configuration file; every field has a default,
//! so the terminal works with zero config.
//!
//! # Config file location
//!
//! 1. `$SITETERM_CONFIG` environment variable
//! 2. `~/.config/siteterm/config.toml`

use crate::terminal::EditorSettings;
use crate::terminal::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub window: WindowConfig,
    pub font: FontConfig,
    pub colors: ColorConfig,
    pub terminal: TerminalConfig,
    pub interpreter: InterpreterConfig,
    pub media: MediaConfig,
    /// Extra lines shown after a successful login, keyed by username
    #[serde(default = "default_welcome")]
    pub welcome: HashMap<String, WelcomeBanner>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            font: FontConfig::default(),
            colors: ColorConfig::default(),
            terminal: TerminalConfig::default(),
            interpreter: InterpreterConfig::default(),
            media: MediaConfig::default(),
            welcome: default_welcome(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// Returns the default configuration if no config file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific path
    ///
    /// Returns the default configuration if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!(
                "No config file found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        log::info!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Config file path based on the environment
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("SITETERM_CONFIG") {
            return PathBuf::from(path);
        }

        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/siteterm/config.toml")
    }

    /// Viewport template built from the window and font sections
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.window.width,
            height: self.window.height,
            scale_factor: 1.0,
            font_size: self.font.size,
            line_height: self.font.line_height,
            padding: self.font.padding,
            char_width_ratio: self.font.char_width_ratio,
        }
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            wheel_step: self.terminal.wheel_step,
            page_step: self.terminal.page_step,
            cancel_marker: self.terminal.cancel_marker.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(6.0..=72.0).contains(&self.font.size) {
            return Err(ConfigError::ValidationError(format!(
                "font.size must be between 6.0 and 72.0, got {}",
                self.font.size
            )));
        }

        if self.font.line_height <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "font.line_height must be positive, got {}",
                self.font.line_height
            )));
        }

        if self.font.padding < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "font.padding must not be negative, got {}",
                self.font.padding
            )));
        }

        if !(self.font.char_width_ratio > 0.0 && self.font.char_width_ratio <= 2.0) {
            return Err(ConfigError::ValidationError(format!(
                "font.char_width_ratio must be in (0.0, 2.0], got {}",
                self.font.char_width_ratio
            )));
        }

        if self.window.width < 100.0 || self.window.height < 100.0 {
            return Err(ConfigError::ValidationError(format!(
                "window must be at least 100x100, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.terminal.scrollback_lines > 1_000_000 {
            return Err(ConfigError::ValidationError(format!(
                "terminal.scrollback_lines must be <= 1,000,000, got {}",
                self.terminal.scrollback_lines
            )));
        }

        if self.terminal.wheel_step == 0 || self.terminal.page_step == 0 {
            return Err(ConfigError::ValidationError(
                "terminal.wheel_step and terminal.page_step must be at least 1".to_string(),
            ));
        }

        if self.terminal.cursor_blink_ms == 0 {
            return Err(ConfigError::ValidationError(
                "terminal.cursor_blink_ms must be at least 1".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.colors.scroll_indicator_alpha) {
            return Err(ConfigError::ValidationError(format!(
                "colors.scroll_indicator_alpha must be between 0.0 and 1.0, got {}",
                self.colors.scroll_indicator_alpha
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for user in &self.interpreter.users {
            if user.username.is_empty() || user.username.contains(char::is_whitespace) {
                return Err(ConfigError::ValidationError(format!(
                    "invalid username {:?}",
                    user.username
                )));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate user {:?}",
                    user.username
                )));
            }
            if !user.home.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "home of {} must be an absolute path, got {:?}",
                    user.username, user.home
                )));
            }
        }

        for seed in &self.interpreter.files {
            if seed.content.is_some() == seed.source.is_some() {
                return Err(ConfigError::ValidationError(format!(
                    "file {} needs exactly one of `content` or `source`",
                    seed.path
                )));
            }
        }

        Ok(())
    }
}

/// Window configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct WindowConfig {
    /// Initial width in logical pixels
    pub width: f32,
    /// Initial height in logical pixels
    pub height: f32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 450.0,
            title: "Hanna's Terminal".to_string(),
        }
    }
}

/// Font configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct FontConfig {
    /// Font families in order of preference; monospace is always the last resort
    pub families: Vec<String>,
    /// Font size in logical pixels
    pub size: f32,
    pub line_height: f32,
    pub padding: f32,
    /// Average glyph advance as a fraction of the font size (used for wrapping)
    pub char_width_ratio: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            families: vec!["Courier New".to_string()],
            size: 14.0,
            line_height: 20.0,
            padding: 30.0,
            char_width_ratio: 0.6,
        }
    }
}

/// Color scheme (RGB hex values)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ColorConfig {
    pub background: u32,
    pub foreground: u32,
    pub cursor: u32,
    pub scroll_indicator: u32,
    pub scroll_indicator_alpha: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: 0x222222,
            foreground: 0xff00ff,
            cursor: 0xffffff,
            scroll_indicator: 0xff00ff,
            scroll_indicator_alpha: 0.3,
        }
    }
}

/// Terminal behavior and fixed messages
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct TerminalConfig {
    /// Scrollback size in lines (0 = unbounded)
    pub scrollback_lines: usize,
    /// Lines per mouse wheel notch
    pub wheel_step: usize,
    /// Lines per PageUp/PageDown
    pub page_step: usize,
    /// Cursor blink half-period in milliseconds
    pub cursor_blink_ms: u64,
    /// Printed once the interpreter is ready
    pub greeting: String,
    /// Prompt used while no interpreter is available
    pub fallback_prompt: String,
    pub not_ready_message: String,
    pub load_failure_message: String,
    pub cancel_marker: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            scrollback_lines: crate::terminal::DEFAULT_SCROLLBACK,
            wheel_step: 1,
            page_step: 5,
            cursor_blink_ms: 500,
            greeting: "Welcome to Hanna's Terminal System v1.0".to_string(),
            fallback_prompt: "$ ".to_string(),
            not_ready_message: "Terminal not ready yet...".to_string(),
            load_failure_message: "ERROR: Failed to load terminal module".to_string(),
            cancel_marker: "^C".to_string(),
        }
    }
}

/// Built-in interpreter configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct InterpreterConfig {
    pub hostname: String,
    /// Failed password attempts before an account is locked
    pub max_login_attempts: u32,
    pub users: Vec<UserConfig>,
    /// Directories created at startup (parents included)
    pub directories: Vec<String>,
    /// Files created at startup
    pub files: Vec<FileSeed>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            hostname: "hanna-terminal".to_string(),
            max_login_attempts: 3,
            users: vec![
                UserConfig {
                    username: "root".to_string(),
                    // Login disabled until a hash is configured
                    password_sha256: String::new(),
                    uid: 0,
                    home: "/root".to_string(),
                    shell: "/bin/bash".to_string(),
                    fullname: "System Administrator".to_string(),
                },
                UserConfig {
                    username: "guest".to_string(),
                    // sha256("guest")
                    password_sha256:
                        "84983c60f7daadc1cb8698621f802c0d9f9a3c3c295c810748fb048115c186ec"
                            .to_string(),
                    uid: 1000,
                    home: "/home/guest".to_string(),
                    shell: "/bin/bash".to_string(),
                    fullname: "Guest".to_string(),
                },
            ],
            directories: vec!["/tmp".to_string(), "/media".to_string()],
            files: vec![FileSeed {
                path: "/home/guest/welcome.txt".to_string(),
                content: Some(
                    "Try these commands:\n  ls - List files\n  cat <file> - Read files\n  cd <dir> - Change directory\n  help - Show available commands"
                        .to_string(),
                ),
                source: None,
            }],
        }
    }
}

/// A login account of the built-in interpreter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub username: String,
    /// Hex SHA-256 of the password; empty disables password login
    #[serde(default)]
    pub password_sha256: String,
    #[serde(default = "default_uid")]
    pub uid: u32,
    pub home: String,
    #[serde(default = "default_shell")]
    pub shell: String,
    #[serde(default)]
    pub fullname: String,
}

fn default_uid() -> u32 {
    1000
}

fn default_shell() -> String {
    "/bin/bash".to_string()
}

/// A file seeded into the interpreter's filesystem
///
/// Exactly one of `content` (inline text) or `source` (host file) is set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileSeed {
    pub path: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub source: Option<PathBuf>,
}

/// Extra lines printed after the login welcome
///
/// When `file` names a readable interpreter file its lines are shown,
/// otherwise `lines`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct WelcomeBanner {
    pub file: Option<String>,
    pub lines: Vec<String>,
}

fn default_welcome() -> HashMap<String, WelcomeBanner> {
    HashMap::from([
        (
            "root".to_string(),
            WelcomeBanner {
                file: None,
                lines: vec![
                    "Welcome, System Administrator!".to_string(),
                    "You have full system access.".to_string(),
                ],
            },
        ),
        (
            "guest".to_string(),
            WelcomeBanner {
                file: Some("/home/guest/welcome.txt".to_string()),
                lines: Vec::new(),
            },
        ),
    ])
}

/// External media player used by the `play` command
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct MediaConfig {
    /// Player executable; `None` disables playback
    pub player: Option<String>,
    pub args: Vec<String>,
    /// Host directory that interpreter paths are resolved against
    pub root: Option<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            player: Some("ffplay".to_string()),
            args: vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
            ],
            root: None,
        }
    }
}
