//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/optparser/optparser.toml`
//! 3. Explicit config file passed by the caller
//! 4. Environment variables: `OPTPARSER_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::help::DEFAULT_WRAP_WIDTH;
use crate::application::ApplicationError;

const ENV_PREFIX: &str = "OPTPARSER";

/// Runtime settings for parsing and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Return errors and help to the caller instead of exiting the process
    pub debug: bool,
    /// Column at which help descriptions wrap
    pub wrap_width: usize,
    /// Colorize terminal output
    pub color: bool,
    /// Log verbosity: 0 = off, 1 = info, 2 = debug, 3+ = trace
    pub verbosity: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            wrap_width: DEFAULT_WRAP_WIDTH,
            color: true,
            verbosity: 0,
        }
    }
}

/// Partially specified settings from one TOML layer.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawSettings {
    debug: Option<bool>,
    wrap_width: Option<usize>,
    color: Option<bool>,
    verbosity: Option<u8>,
}

/// Get the XDG config directory for optparser.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "optparser").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("optparser.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            debug: overlay.debug.unwrap_or(self.debug),
            wrap_width: overlay.wrap_width.unwrap_or(self.wrap_width),
            color: overlay.color.unwrap_or(self.color),
            verbosity: overlay.verbosity.unwrap_or(self.verbosity),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// `local` is an optional extra TOML file that overrides the global one.
    /// A missing file is skipped; an unreadable or malformed file is an error.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = local {
            if path.exists() {
                current = current.merge_with(&load_raw_settings(path)?);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply `OPTPARSER_*` environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("debug") {
            settings.debug = val;
        }
        if let Ok(val) = config.get_int("wrap_width") {
            settings.wrap_width = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("wrap_width out of range: {}", val),
            })?;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }
        if let Ok(val) = config.get_int("verbosity") {
            settings.verbosity = val.clamp(0, i64::from(u8::MAX)) as u8;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# optparser configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/optparser/optparser.toml
#   Local:  file passed explicitly by the program
#   Env:    OPTPARSER_* environment variables

# Return errors and help to the caller instead of exiting
# debug = false

# Column at which help descriptions wrap
# wrap_width = 75

# Colorize terminal output (NO_COLOR also disables it)
# color = true

# Log verbosity: 0 = off, 1 = info, 2 = debug, 3 = trace
# verbosity = 0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
