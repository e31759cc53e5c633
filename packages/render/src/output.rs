//! Writes the page, per-layer GeoJSON, and summary to an output directory.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::RenderError;
use crate::page::{MapDocument, render_page};

/// Name of the layer subdirectory.
pub const LAYERS_DIR: &str = "layers";

/// Paths written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    /// `index.html`.
    pub page: PathBuf,
    /// One GeoJSON file per rendered layer.
    pub layers: Vec<PathBuf>,
    /// `summary.json`.
    pub summary: PathBuf,
}

fn remove_stale_layers(layers_dir: &Path, keep: &[String]) -> Result<(), RenderError> {
    for entry in std::fs::read_dir(layers_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.extension().is_some_and(|ext| ext == "geojson") && !keep.iter().any(|k| k == name) {
            log::debug!("Removing stale layer {}", path.display());
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Writes `index.html`, `layers/<kind>.geojson`, and `summary.json` under
/// `dir`, creating directories as needed.
///
/// Layer files left over from an earlier run whose layer was not produced
/// this time are removed, so the page never fetches stale data.
///
/// # Errors
///
/// Returns [`RenderError`] on I/O or serialization failure.
pub fn write_outputs<S: Serialize>(
    document: &MapDocument,
    summary: &S,
    dir: &Path,
) -> Result<WrittenOutputs, RenderError> {
    let layers_dir = dir.join(LAYERS_DIR);
    std::fs::create_dir_all(&layers_dir)?;

    let mut layers = Vec::with_capacity(document.layers.len());
    let mut names = Vec::with_capacity(document.layers.len());
    for layer in &document.layers {
        let name = layer.file_name();
        let path = layers_dir.join(&name);
        std::fs::write(&path, serde_json::to_string(&layer.collection)?)?;
        log::info!("Wrote {} ({} features)", path.display(), layer.len());
        layers.push(path);
        names.push(name);
    }
    remove_stale_layers(&layers_dir, &names)?;

    let page = dir.join("index.html");
    std::fs::write(&page, render_page(document)?)?;
    log::info!("Wrote {}", page.display());

    let summary_path = dir.join("summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(summary)?)?;

    Ok(WrittenOutputs {
        page,
        layers,
        summary: summary_path,
    })
}
