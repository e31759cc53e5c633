//! Per-layer path styles.

use rec_map_site_models::LayerKind;
use serde::{Deserialize, Serialize};

/// Stroke/fill style for one layer. `radius` applies to point features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    /// Stroke color (CSS color).
    pub stroke_color: String,
    /// Fill color (CSS color).
    pub fill_color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity, 0-1.
    pub opacity: f64,
    /// Fill opacity, 0-1.
    pub fill_opacity: f64,
    /// Circle marker radius in pixels.
    pub radius: f64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#3388ff".to_string(),
            fill_color: "#3388ff".to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
            radius: 6.0,
        }
    }
}

impl LayerStyle {
    /// Returns the style as Leaflet path options.
    #[must_use]
    pub fn leaflet_options(&self) -> serde_json::Value {
        serde_json::json!({
            "color": self.stroke_color,
            "fillColor": self.fill_color,
            "weight": self.weight,
            "opacity": self.opacity,
            "fillOpacity": self.fill_opacity,
            "radius": self.radius,
        })
    }
}

/// Styles for every layer kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyles {
    /// Open sites.
    pub open: LayerStyle,
    /// Closed sites.
    pub closed: LayerStyle,
    /// Crown-land overlay polygons.
    pub overlay: LayerStyle,
}

impl Default for MapStyles {
    fn default() -> Self {
        Self {
            open: LayerStyle {
                stroke_color: "#1b5e20".to_string(),
                fill_color: "#43a047".to_string(),
                ..LayerStyle::default()
            },
            closed: LayerStyle {
                stroke_color: "#b71c1c".to_string(),
                fill_color: "#e53935".to_string(),
                ..LayerStyle::default()
            },
            overlay: LayerStyle {
                stroke_color: "#8d6e63".to_string(),
                fill_color: "#d7ccc8".to_string(),
                weight: 0.5,
                opacity: 0.7,
                fill_opacity: 0.3,
                radius: 4.0,
            },
        }
    }
}

impl MapStyles {
    /// Returns the style for a layer kind.
    #[must_use]
    pub const fn for_kind(&self, kind: LayerKind) -> &LayerStyle {
        match kind {
            LayerKind::Open => &self.open,
            LayerKind::Closed => &self.closed,
            LayerKind::Overlay => &self.overlay,
        }
    }
}
