#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for generating the recreation site map.
//!
//! Loads every configured source once and concurrently, partitions the
//! primary site collection into open/closed/excluded groups, and writes a
//! static Leaflet page with one GeoJSON file per layer plus a
//! `summary.json` describing the run.
//!
//! A failed primary source is not fatal: the map is still written with
//! empty site layers. A failed overlay source only removes the overlay.

pub mod config;

use std::path::{Path, PathBuf};

use rec_map_render::bounds::{Bounds, compute_bounds};
use rec_map_render::layer::{RenderedLayer, build_overlay_layer, build_site_layers};
use rec_map_render::output::write_outputs;
use rec_map_render::page::MapDocument;
use rec_map_site::classify::classify_attributes;
use rec_map_site::partition::{PartitionCounts, SitePartition, partition_collection};
use rec_map_site::resolve::resolve_attributes;
use rec_map_site_models::{CampsiteFilter, LayerKind};
use rec_map_source::LoadOptions;
use rec_map_source::fetch::{LoadedSource, build_client, load_sources};
use rec_map_source::source_def::SourceRole;
use serde::Serialize;

use crate::config::MapConfig;

/// Errors that can occur while generating the map.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The configuration could not be parsed.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// Source setup failed (e.g. the HTTP client could not be built).
    #[error("Source error: {0}")]
    Source(#[from] rec_map_source::SourceError),

    /// Writing the map output failed.
    #[error("Render error: {0}")]
    Render(#[from] rec_map_render::RenderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "data/generated";

/// Load outcome of a single source, as recorded in `summary.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatus {
    /// Source ID.
    pub id: String,
    /// What the source was used for.
    pub role: SourceRole,
    /// Number of features loaded, or `None` on failure.
    pub features: Option<usize>,
    /// Failure message, if the load failed.
    pub error: Option<String>,
}

impl SourceStatus {
    fn from_loaded(loaded: &LoadedSource) -> Self {
        let (features, error) = match &loaded.result {
            Ok(payload) => (
                Some(payload["features"].as_array().map_or(0, Vec::len)),
                None,
            ),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            id: loaded.definition.id.clone(),
            role: loaded.definition.role,
            features,
            error,
        }
    }
}

/// Summary of one generation run, written to `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Page title.
    pub title: String,
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Filter used for the site layers.
    pub campsite_filter: CampsiteFilter,
    /// Site group sizes.
    pub counts: PartitionCounts,
    /// Overlay feature count, or `None` when no overlay was rendered.
    pub overlay_features: Option<usize>,
    /// Fit-to-bounds rectangle.
    pub bounds: Option<Bounds>,
    /// Per-source load outcomes.
    pub sources: Vec<SourceStatus>,
}

/// Collections loaded for one run.
#[derive(Debug)]
pub struct LoadedCollections {
    /// Merged primary site collection, or `None` if every sites source
    /// failed.
    pub sites: Option<serde_json::Value>,
    /// Merged overlay collection, or `None` if no overlay loaded.
    pub overlay: Option<serde_json::Value>,
    /// Per-source outcomes, in definition order.
    pub sources: Vec<SourceStatus>,
}

/// Concatenates the `features` of several collections into one.
///
/// Returns `None` when there are no collections to merge.
#[must_use]
pub fn merge_collections<'a, I>(payloads: I) -> Option<serde_json::Value>
where
    I: IntoIterator<Item = &'a serde_json::Value>,
{
    let mut payloads = payloads.into_iter().peekable();
    payloads.peek()?;

    let features: Vec<serde_json::Value> = payloads
        .filter_map(|p| p["features"].as_array())
        .flatten()
        .cloned()
        .collect();

    Some(serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}

/// Loads every configured source concurrently and merges the successful
/// payloads per role.
///
/// # Errors
///
/// Returns [`GenerateError::Source`] if the HTTP client cannot be built.
/// Individual source failures are not errors.
pub async fn load_collections(
    config: &MapConfig,
    options: &LoadOptions,
) -> Result<LoadedCollections, GenerateError> {
    let definitions = config.source_definitions();
    let client = build_client(options)?;
    let loaded = load_sources(&client, &definitions, options).await;

    let merge = |role: SourceRole| {
        merge_collections(
            loaded
                .iter()
                .filter(|l| l.definition.role == role)
                .filter_map(LoadedSource::payload),
        )
    };

    let sites = merge(SourceRole::Sites);
    if sites.is_none() {
        log::error!("No sites source loaded; site layers will be empty");
    }

    Ok(LoadedCollections {
        sites,
        overlay: merge(SourceRole::Overlay),
        sources: loaded.iter().map(SourceStatus::from_loaded).collect(),
    })
}

/// Partitions the merged site collection, treating a missing collection
/// as empty.
#[must_use]
pub fn partition_sites(sites: Option<&serde_json::Value>, filter: CampsiteFilter) -> SitePartition {
    let Some(sites) = sites else {
        return SitePartition::default();
    };
    partition_collection(sites, filter).unwrap_or_else(|e| {
        log::error!("Sites collection not partitioned: {e}");
        SitePartition::default()
    })
}

/// Builds the map document for a run.
///
/// # Errors
///
/// Returns [`GenerateError::Render`] if a site popup fails to render.
pub fn build_document(
    config: &MapConfig,
    partition: &SitePartition,
    overlay: Option<&serde_json::Value>,
) -> Result<MapDocument, GenerateError> {
    let mut layers = Vec::with_capacity(3);
    if let Some(overlay) = overlay
        && let Some(layer) = build_overlay_layer(overlay, &config.styles.overlay)
    {
        layers.push(layer);
    }
    layers.extend(build_site_layers(partition, &config.popup, &config.styles)?);

    let bounds = compute_bounds(&layers);

    Ok(MapDocument {
        title: config.title.clone(),
        view: config.view.clone(),
        layers,
        bounds,
    })
}

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Directory the page, layers, and summary are written to.
    pub output_dir: PathBuf,
    /// Overrides the configured campsite filter.
    pub filter: Option<CampsiteFilter>,
    /// Source loading options.
    pub load: LoadOptions,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            filter: None,
            load: LoadOptions::default(),
        }
    }
}

fn effective_filter(config: &MapConfig, filter: Option<CampsiteFilter>) -> CampsiteFilter {
    filter.unwrap_or(config.classification.campsite_filter)
}

/// Runs the full pipeline and writes the map to `args.output_dir`.
///
/// # Errors
///
/// Returns [`GenerateError`] if the HTTP client cannot be built or the
/// output cannot be written.
pub async fn run(config: &MapConfig, args: &GenerateArgs) -> Result<RunSummary, GenerateError> {
    let filter = effective_filter(config, args.filter);
    let collections = load_collections(config, &args.load).await?;

    let partition = partition_sites(collections.sites.as_ref(), filter);
    let document = build_document(config, &partition, collections.overlay.as_ref())?;

    let summary = RunSummary {
        title: config.title.clone(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        campsite_filter: filter,
        counts: partition.counts(),
        overlay_features: document
            .layer(LayerKind::Overlay)
            .map(RenderedLayer::len),
        bounds: document.bounds,
        sources: collections.sources,
    };

    write_outputs(&document, &summary, &args.output_dir)?;
    log::info!(
        "Map written to {}: {} open, {} closed, {} excluded, {} skipped",
        args.output_dir.display(),
        summary.counts.open,
        summary.counts.closed,
        summary.counts.excluded,
        summary.counts.skipped,
    );

    Ok(summary)
}

/// Loads the site sources and returns the partition counts without
/// writing anything.
///
/// # Errors
///
/// Returns [`GenerateError::Source`] if the HTTP client cannot be built.
pub async fn summarize(
    config: &MapConfig,
    filter: Option<CampsiteFilter>,
    options: &LoadOptions,
) -> Result<PartitionCounts, GenerateError> {
    let collections = load_collections(config, options).await?;
    let partition = partition_sites(
        collections.sites.as_ref(),
        effective_filter(config, filter),
    );
    Ok(partition.counts())
}

/// Returns one JSON record per site feature with its resolved attributes
/// and classification, up to `limit` records.
///
/// # Errors
///
/// Returns [`GenerateError::Source`] if the HTTP client cannot be built.
pub async fn inspect(
    config: &MapConfig,
    options: &LoadOptions,
    limit: Option<usize>,
) -> Result<Vec<serde_json::Value>, GenerateError> {
    let collections = load_collections(config, options).await?;
    let Some(sites) = collections.sites else {
        return Ok(Vec::new());
    };

    let features = sites["features"].as_array().map_or(&[][..], Vec::as_slice);
    Ok(features
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(index, feature)| {
            let attributes = resolve_attributes(feature);
            let classification = classify_attributes(&attributes);
            serde_json::json!({
                "index": index,
                "attributes": attributes,
                "classification": classification,
                "status": classification.status(),
            })
        })
        .collect())
}

/// Resolves an output directory argument, defaulting to
/// [`DEFAULT_OUTPUT_DIR`].
#[must_use]
pub fn output_dir(arg: Option<&Path>) -> PathBuf {
    arg.map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), Path::to_path_buf)
}
