//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/layertree/layertree.toml`
//! 3. Environment variables: `LAYERTREE_*` prefix, `__` between section and key

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::controller::DEFAULT_MAIN_LEVEL_MARGIN;
use crate::application::ApplicationError;
use crate::domain::InsideBand;

/// Drag engine tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Width in pixels of the main-level zone along the container's left edge
    pub main_level_margin: f64,
    /// Lower bound (relative Y, exclusive) of the `inside` band on groups
    pub inside_band_lower: f64,
    /// Upper bound (relative Y, exclusive) of the `inside` band on groups
    pub inside_band_upper: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let band = InsideBand::default();
        Self {
            main_level_margin: DEFAULT_MAIN_LEVEL_MARGIN,
            inside_band_lower: band.lower(),
            inside_band_upper: band.upper(),
        }
    }
}

/// How commands print a tree.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tree,
    Json,
    Toml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Tree => "tree",
            OutputFormat::Json => "json",
            OutputFormat::Toml => "toml",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// Unified configuration for layertree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub output: OutputSettings,
}

/// Raw engine section; `None` means "not specified, keep the base value".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawEngineSettings {
    pub main_level_margin: Option<f64>,
    pub inside_band_lower: Option<f64>,
    pub inside_band_upper: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOutputSettings {
    pub format: Option<OutputFormat>,
}

/// Raw settings for intermediate parsing of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    pub engine: RawEngineSettings,
    pub output: RawOutputSettings,
}

/// Get the XDG config directory for layertree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "layertree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("layertree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay values present in `raw`.
    fn apply(&self, raw: &RawSettings) -> Self {
        Self {
            engine: EngineSettings {
                main_level_margin: raw
                    .engine
                    .main_level_margin
                    .unwrap_or(self.engine.main_level_margin),
                inside_band_lower: raw
                    .engine
                    .inside_band_lower
                    .unwrap_or(self.engine.inside_band_lower),
                inside_band_upper: raw
                    .engine
                    .inside_band_upper
                    .unwrap_or(self.engine.inside_band_upper),
            },
            output: OutputSettings {
                format: raw.output.format.unwrap_or(self.output.format),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/layertree/layertree.toml`
    /// 3. Environment variables: `LAYERTREE_*` (e.g. `LAYERTREE_ENGINE__MAIN_LEVEL_MARGIN=40`)
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Same as [`Settings::load`] with an explicit config file instead of the global one.
    ///
    /// A missing file is not an error; defaults and env vars still apply.
    #[instrument(level = "debug")]
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            if path.exists() {
                debug!("loading config from {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.apply(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply LAYERTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("LAYERTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<f64>("engine.main_level_margin") {
            settings.engine.main_level_margin = val;
        }
        if let Ok(val) = config.get::<f64>("engine.inside_band_lower") {
            settings.engine.inside_band_lower = val;
        }
        if let Ok(val) = config.get::<f64>("engine.inside_band_upper") {
            settings.engine.inside_band_upper = val;
        }
        if let Ok(val) = config.get_string("output.format") {
            settings.output.format = OutputFormat::from_str(&val, true).map_err(|_| {
                ApplicationError::Config {
                    message: format!("invalid output.format: {val} (expected tree, json or toml)"),
                }
            })?;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        InsideBand::new(self.engine.inside_band_lower, self.engine.inside_band_upper)?;
        let margin = self.engine.main_level_margin;
        if !margin.is_finite() || margin < 0.0 {
            return Err(ApplicationError::Config {
                message: format!("engine.main_level_margin must be a non-negative number: {margin}"),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# layertree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/layertree/layertree.toml
#   Env:    LAYERTREE_* environment variables, e.g.
#           LAYERTREE_ENGINE__MAIN_LEVEL_MARGIN=40
#           LAYERTREE_OUTPUT__FORMAT=json

[engine]
# Width (px) of the main-level zone along the tree container's left edge
# main_level_margin = 30.0

# Relative Y band on a group row that drops inside the group (exclusive)
# inside_band_lower = 0.25
# inside_band_upper = 0.75

[output]
# Tree output: "tree", "json" or "toml"
# format = "tree"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
