#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Rendering instructions for the recreation site map.
//!
//! Turns a [`SitePartition`](rec_map_site::partition::SitePartition) and an
//! optional overlay collection into styled [`RenderedLayer`](layer::RenderedLayer)s,
//! computes the fit-to-bounds rectangle, and writes a static page that hands
//! the layers to Leaflet. Each layer is wired to its own checkbox.

pub mod bounds;
pub mod layer;
pub mod output;
pub mod page;
pub mod style;

/// Errors that can occur while rendering or writing map output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Page template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A site could not be rendered.
    #[error(transparent)]
    Site(#[from] rec_map_site::SiteError),

    /// I/O error (file write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
