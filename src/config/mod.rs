// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Log filter and output directory
//! - `[export]` - Encoder quality defaults
//! - `[enhance]` - Sharpening gateway endpoint and behaviour
//! - `[watermark]` - Font search directories
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `RASTER_TOOLS_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use raster_tools::config::{self, Config};
//!
//! let (mut config, _warning) = config::load();
//! config.export.compression_quality = Some(70);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// `env_logger` filter string (e.g. "debug", "raster_tools=trace").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,

    /// Directory exported artifacts are written to. Defaults to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

/// Encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Quality used by the compressor (1-100).
    #[serde(
        default = "default_compression_quality",
        skip_serializing_if = "Option::is_none"
    )]
    pub compression_quality: Option<u8>,

    /// Quality used when re-encoding resized images (1-100).
    #[serde(
        default = "default_resize_quality",
        skip_serializing_if = "Option::is_none"
    )]
    pub resize_quality: Option<u8>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            compression_quality: default_compression_quality(),
            resize_quality: default_resize_quality(),
        }
    }
}

/// Sharpening gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnhanceConfig {
    /// Whether upscales are sent to the gateway at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Multipart POST endpoint.
    #[serde(default = "default_sharpen_url")]
    pub url: String,

    /// Strength field sent with each request.
    #[serde(
        default = "default_sharpen_strength",
        skip_serializing_if = "Option::is_none"
    )]
    pub strength: Option<f32>,

    /// Request timeout in seconds.
    #[serde(
        default = "default_gateway_timeout_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_secs: Option<u64>,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_sharpen_url(),
            strength: default_sharpen_strength(),
            timeout_secs: default_gateway_timeout_secs(),
        }
    }
}

impl EnhanceConfig {
    /// Returns the request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS))
    }
}

/// Watermark settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WatermarkConfig {
    /// Directories searched for `<family>.ttf` / `<family>.otf`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub font_dirs: Vec<PathBuf>,
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub enhance: EnhanceConfig,

    #[serde(default)]
    pub watermark: WatermarkConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_compression_quality() -> Option<u8> {
    Some(DEFAULT_COMPRESSION_QUALITY)
}

fn default_resize_quality() -> Option<u8> {
    Some(RESIZE_ENCODE_QUALITY)
}

fn default_sharpen_url() -> String {
    DEFAULT_SHARPEN_URL.to_string()
}

fn default_sharpen_strength() -> Option<f32> {
    Some(DEFAULT_SHARPEN_STRENGTH)
}

fn default_gateway_timeout_secs() -> Option<u64> {
    Some(DEFAULT_GATEWAY_TIMEOUT_SECS)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!("{}: {err}", path.display())),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
