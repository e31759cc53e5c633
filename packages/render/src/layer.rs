//! Styled, popup-annotated layers ready for the map page.

use geojson::{Feature, FeatureCollection};
use rec_map_site::partition::{ClassifiedSite, SitePartition, collection_features, parse_feature};
use rec_map_site::popup::{PopupOptions, format_popup};
use rec_map_site_models::LayerKind;

use crate::RenderError;
use crate::style::{LayerStyle, MapStyles};

/// Feature property carrying the popup markup.
pub const POPUP_PROPERTY: &str = "popup_html";

/// Feature property carrying the `open`/`closed` status.
pub const STATUS_PROPERTY: &str = "site_status";

/// One toggleable group of features with its style.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLayer {
    /// Which checkbox controls this layer.
    pub kind: LayerKind,
    /// Path style.
    pub style: LayerStyle,
    /// Features to draw.
    pub collection: FeatureCollection,
}

impl RenderedLayer {
    /// Number of features in the layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    /// Returns `true` if the layer has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }

    /// File name of the layer's GeoJSON within the output `layers/`
    /// directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.geojson", self.kind)
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn site_feature(site: &ClassifiedSite, popup: &PopupOptions) -> Result<Feature, RenderError> {
    let mut feature = site.feature.clone();
    let html = format_popup(&site.attributes, site.classification.is_closed, popup)?;
    feature.set_property(POPUP_PROPERTY, html);
    feature.set_property(
        STATUS_PROPERTY,
        site.classification.status().as_ref().to_string(),
    );
    Ok(feature)
}

/// Builds the open and closed site layers, in that order.
///
/// Excluded features are not rendered.
///
/// # Errors
///
/// Returns [`RenderError::Site`] if a popup fails to render.
pub fn build_site_layers(
    partition: &SitePartition,
    popup: &PopupOptions,
    styles: &MapStyles,
) -> Result<Vec<RenderedLayer>, RenderError> {
    [
        (LayerKind::Open, &partition.open),
        (LayerKind::Closed, &partition.closed),
    ]
    .into_iter()
    .map(|(kind, sites)| {
        let features = sites
            .iter()
            .map(|s| site_feature(s, popup))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RenderedLayer {
            kind,
            style: styles.for_kind(kind).clone(),
            collection: collection(features),
        })
    })
    .collect()
}

/// Builds the overlay layer from a `FeatureCollection` payload.
///
/// Overlay features are not classified and carry no popups. Returns `None`
/// when the payload is malformed; individual features without a valid
/// geometry are dropped, using the same per-feature rules as the site
/// partition.
#[must_use]
pub fn build_overlay_layer(payload: &serde_json::Value, style: &LayerStyle) -> Option<RenderedLayer> {
    let raw = match collection_features(payload) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Overlay not rendered: {e}");
            return None;
        }
    };

    let features: Vec<Feature> = raw
        .iter()
        .filter_map(|value| parse_feature(value).ok())
        .collect();

    let dropped = raw.len() - features.len();
    if dropped > 0 {
        log::warn!("Overlay: dropped {dropped} malformed or geometry-less features");
    }

    Some(RenderedLayer {
        kind: LayerKind::Overlay,
        style: style.clone(),
        collection: collection(features),
    })
}
