#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! GeoJSON data sources for the recreation site map.
//!
//! A [`SourceDefinition`](source_def::SourceDefinition) says where a
//! `FeatureCollection` lives (local file or HTTP URL) and what role it plays
//! (primary sites or overlay). Sources are loaded once, concurrently, and
//! each outcome is kept separate so that a failing overlay never blocks the
//! primary collection.

pub mod fetch;
pub mod registry;
pub mod source_def;

use std::path::PathBuf;

/// Errors that can occur while loading a data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML source definition could not be parsed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The payload is not a `FeatureCollection`-shaped object.
    #[error(transparent)]
    MalformedPayload(#[from] rec_map_site::SiteError),
}

/// Options shared by every source load in a run.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directory that relative file paths are resolved against.
    pub base_dir: PathBuf,
    /// `User-Agent` header for HTTP sources.
    pub user_agent: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            user_agent: concat!("rec-map/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
