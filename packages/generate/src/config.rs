//! Map configuration loaded from TOML.
//!
//! The default configuration is embedded at compile time. A config file
//! replaces it entirely; any section it omits falls back to the built-in
//! defaults for that section.

use std::path::{Path, PathBuf};

use rec_map_render::page::ViewOptions;
use rec_map_render::style::MapStyles;
use rec_map_site::popup::PopupOptions;
use rec_map_site_models::CampsiteFilter;
use rec_map_source::registry::all_sources;
use rec_map_source::source_def::SourceDefinition;
use serde::{Deserialize, Serialize};

use crate::GenerateError;

/// Environment variable naming a config file to use instead of the
/// embedded default.
pub const CONFIG_ENV_VAR: &str = "REC_MAP_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Classification settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Which features are in scope for the open/closed layers.
    pub campsite_filter: CampsiteFilter,
}

/// Complete map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Page title.
    pub title: String,
    /// Classification settings.
    pub classification: ClassificationConfig,
    /// Popup formatting and portal link bases.
    pub popup: PopupOptions,
    /// Initial map view.
    pub view: ViewOptions,
    /// Per-layer styles.
    pub styles: MapStyles,
    /// Explicit source list. `None` uses the built-in registry.
    pub sources: Option<Vec<SourceDefinition>>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "BC Recreation Sites".to_string(),
            classification: ClassificationConfig::default(),
            popup: PopupOptions::default(),
            view: ViewOptions::default(),
            styles: MapStyles::default(),
            sources: None,
        }
    }
}

/// A loaded config plus the directory relative source paths resolve
/// against.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    /// The parsed configuration.
    pub config: MapConfig,
    /// Directory of the config file, or `.` for the embedded default.
    pub base_dir: PathBuf,
}

impl MapConfig {
    /// Parses a config from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Config`] if the TOML is malformed or has
    /// values of the wrong type.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, GenerateError> {
        toml::from_str(toml_str).map_err(|e| GenerateError::Config {
            message: e.to_string(),
        })
    }

    /// Returns the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Config`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, GenerateError> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Returns the configured sources, or the built-in registry when none
    /// are configured.
    #[must_use]
    pub fn source_definitions(&self) -> Vec<SourceDefinition> {
        self.sources.clone().unwrap_or_else(all_sources)
    }
}

/// Loads the config from `path`, falling back to `$REC_MAP_CONFIG` and then
/// the embedded default.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] if the file cannot be read, or
/// [`GenerateError::Config`] if it cannot be parsed.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, GenerateError> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    let Some(path) = path else {
        log::debug!("Using embedded default config");
        return Ok(LoadedConfig {
            config: MapConfig::embedded()?,
            base_dir: PathBuf::from("."),
        });
    };

    log::info!("Loading config from {}", path.display());
    let contents = std::fs::read_to_string(&path)?;
    let config = MapConfig::from_toml_str(&contents)?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    Ok(LoadedConfig { config, base_dir })
}
