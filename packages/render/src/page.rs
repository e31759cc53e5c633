//! Static Leaflet page.
//!
//! The page embeds a small JSON config (view, bounds, per-layer file and
//! style) and fetches each layer's GeoJSON from `layers/`. One checkbox per
//! [`LayerKind`] adds or removes its layer group; checkboxes for layers that
//! were not produced are rendered disabled.
//!
//! The page is rendered from `templates/map.html` with HTML auto-escaping;
//! the config goes through `tojson`, which keeps it inert inside `<script>`.

use std::sync::LazyLock;

use minijinja::Environment;
use rec_map_site_models::LayerKind;
use serde::{Deserialize, Serialize};

use crate::RenderError;
use crate::bounds::Bounds;
use crate::layer::{POPUP_PROPERTY, RenderedLayer};

const PAGE_TEMPLATE_NAME: &str = "map.html";

static PAGE_ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.add_template(PAGE_TEMPLATE_NAME, include_str!("../templates/map.html"))
        .expect("valid page template");
    env
});

/// Initial map view and base tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Initial `[lat, lng]` center, used until bounds are fitted.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Tile URL template.
    pub tile_url: String,
    /// Tile attribution (HTML).
    pub attribution: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            center: [53.7267, -127.6476],
            zoom: 5,
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
        }
    }
}

/// Everything needed to write the map output.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    /// Page title.
    pub title: String,
    /// Initial view.
    pub view: ViewOptions,
    /// Rendered layers; overlay (if any) is drawn beneath the sites.
    pub layers: Vec<RenderedLayer>,
    /// Fit-to-bounds rectangle.
    pub bounds: Option<Bounds>,
}

impl MapDocument {
    /// Returns the layer of the given kind, if it was produced.
    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> Option<&RenderedLayer> {
        self.layers.iter().find(|l| l.kind == kind)
    }
}

/// Builds the JSON config embedded in the page.
#[must_use]
pub fn page_config(document: &MapDocument) -> serde_json::Value {
    let layers: Vec<serde_json::Value> = document
        .layers
        .iter()
        .map(|layer| {
            serde_json::json!({
                "kind": layer.kind,
                "file": format!("layers/{}", layer.file_name()),
                "count": layer.len(),
                "visible": true,
                "pane": (layer.kind == LayerKind::Overlay).then_some("overlay"),
                "style": layer.style.leaflet_options(),
            })
        })
        .collect();

    serde_json::json!({
        "view": {
            "center": document.view.center,
            "zoom": document.view.zoom,
            "tileUrl": document.view.tile_url,
            "attribution": document.view.attribution,
        },
        "bounds": document.bounds.map(Bounds::leaflet_corners),
        "popupProperty": POPUP_PROPERTY,
        "layers": layers,
    })
}

#[derive(Serialize)]
struct LayerControl {
    kind: String,
    label: &'static str,
    count: usize,
    enabled: bool,
}

fn controls(document: &MapDocument) -> Vec<LayerControl> {
    LayerKind::all()
        .iter()
        .map(|&kind| {
            let layer = document.layer(kind);
            LayerControl {
                kind: kind.to_string(),
                label: kind.label(),
                count: layer.map_or(0, RenderedLayer::len),
                enabled: layer.is_some(),
            }
        })
        .collect()
}

#[derive(Serialize)]
struct PageContext<'a> {
    title: &'a str,
    controls: Vec<LayerControl>,
    config: serde_json::Value,
}

/// Renders the map page.
///
/// # Errors
///
/// Returns [`RenderError::Template`] if the page template fails to render.
pub fn render_page(document: &MapDocument) -> Result<String, RenderError> {
    let context = PageContext {
        title: &document.title,
        controls: controls(document),
        config: page_config(document),
    };

    Ok(PAGE_ENV.get_template(PAGE_TEMPLATE_NAME)?.render(&context)?)
}

#[cfg(test)]
mod tests {
    use geojson::FeatureCollection;
    use minijinja::HtmlEscape;

    use super::*;
    use crate::style::MapStyles;

    fn empty_layer(kind: LayerKind) -> RenderedLayer {
        RenderedLayer {
            kind,
            style: MapStyles::default().for_kind(kind).clone(),
            collection: FeatureCollection {
                bbox: None,
                features: vec![],
                foreign_members: None,
            },
        }
    }

    fn document(layers: Vec<RenderedLayer>) -> MapDocument {
        MapDocument {
            title: "BC Rec Sites".to_string(),
            view: ViewOptions::default(),
            layers,
            bounds: None,
        }
    }

    #[test]
    fn renders_three_checkboxes_with_overlay_disabled_when_absent() {
        let doc = document(vec![empty_layer(LayerKind::Open), empty_layer(LayerKind::Closed)]);
        let html = render_page(&doc).unwrap();

        assert_eq!(html.matches(r#"type="checkbox""#).count(), 3);
        assert!(html.contains(r#"data-layer="open" checked"#));
        assert!(html.contains(r#"data-layer="closed" checked"#));
        assert!(html.contains(r#"data-layer="overlay" disabled"#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn config_lists_layer_files_and_overlay_pane() {
        let doc = document(vec![
            empty_layer(LayerKind::Overlay),
            empty_layer(LayerKind::Open),
        ]);
        let config = page_config(&doc);
        assert_eq!(config["layers"][0]["file"], "layers/overlay.geojson");
        assert_eq!(config["layers"][0]["pane"], "overlay");
        assert!(config["layers"][1]["pane"].is_null());
        assert!(config["bounds"].is_null());
        assert_eq!(config["popupProperty"], POPUP_PROPERTY);
    }

    #[test]
    fn title_is_escaped_and_script_cannot_be_closed() {
        let mut doc = document(vec![]);
        doc.title = "</script><b>".to_string();
        let html = render_page(&doc).unwrap();
        assert!(html.contains(&HtmlEscape("</script><b>").to_string()));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn placeholder_syntax_in_title_is_not_expanded() {
        let mut doc = document(vec![empty_layer(LayerKind::Open)]);
        doc.title = "Sites {{CONFIG_JSON}} {{ config }}".to_string();
        let html = render_page(&doc).unwrap();

        let title = html
            .split("<title>")
            .nth(1)
            .and_then(|rest| rest.split("</title>").next())
            .unwrap();
        assert_eq!(title, HtmlEscape(&doc.title).to_string());
        assert!(!title.contains("view"));
        assert_eq!(html.matches("\"tileUrl\"").count(), 1);
    }

    #[test]
    fn embedded_config_parses_back_to_page_config() {
        let mut doc = document(vec![empty_layer(LayerKind::Open)]);
        doc.view.attribution = "<a href=\"https://example.org/\">x</a> & 'y'".to_string();
        let html = render_page(&doc).unwrap();

        let json = html
            .split("const CONFIG = ")
            .nth(1)
            .and_then(|rest| rest.split(";\n").next())
            .unwrap();
        assert!(!json.contains("</a>"));
        let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, page_config(&doc));
    }

    #[test]
    fn checkbox_labels_show_layer_counts() {
        let doc = document(vec![empty_layer(LayerKind::Closed)]);
        let html = render_page(&doc).unwrap();
        assert!(html.contains(&format!("<span>{} (0)</span>", LayerKind::Closed.label())));
        assert!(html.contains(&format!("<span>{}</span>", LayerKind::Overlay.label())));
    }
}
