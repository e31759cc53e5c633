#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tolerant classification and normalization of recreation site features.
//!
//! Site properties come from two schemas with different field spellings.
//! Everything here reads them through [`resolve`], which consults the alias
//! table on [`SiteAttribute`](rec_map_site_models::SiteAttribute). On top of
//! that sit the campsite/closure predicates ([`classify`]), closure date
//! normalization ([`date`]), popup markup ([`popup`]), and the open / closed /
//! excluded split ([`partition`]).
//!
//! All functions are pure and synchronous.

pub mod classify;
pub mod date;
pub mod partition;
pub mod popup;
pub mod resolve;

use geojson::JsonObject;

/// Errors that can occur while classifying a site collection.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The payload is not a `FeatureCollection`-shaped object.
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        /// Description of what went wrong.
        message: String,
    },

    /// A `features` entry has no usable geometry or is not an object.
    #[error("Malformed feature: {message}")]
    MalformedFeature {
        /// Description of what went wrong.
        message: String,
    },

    /// Popup template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Anything that exposes a GeoJSON property bag.
///
/// Implemented for whole features and for bare property objects so the
/// predicates in [`classify`] accept either shape.
pub trait SiteProperties {
    /// Returns the property bag, or `None` if the input carries none.
    fn site_properties(&self) -> Option<&JsonObject>;
}

impl SiteProperties for JsonObject {
    fn site_properties(&self) -> Option<&JsonObject> {
        Some(self)
    }
}

impl SiteProperties for geojson::Feature {
    fn site_properties(&self) -> Option<&JsonObject> {
        self.properties.as_ref()
    }
}

impl SiteProperties for serde_json::Value {
    /// An object with a `properties` member or `"type": "Feature"` is a
    /// feature, and only an object-valued `properties` counts as its bag.
    /// Any other object is the property bag itself.
    fn site_properties(&self) -> Option<&JsonObject> {
        let object = self.as_object()?;
        let is_feature = object.contains_key("properties")
            || object.get("type").and_then(serde_json::Value::as_str) == Some("Feature");
        if is_feature {
            return object.get("properties").and_then(serde_json::Value::as_object);
        }
        Some(object)
    }
}

impl<T: SiteProperties + ?Sized> SiteProperties for &T {
    fn site_properties(&self) -> Option<&JsonObject> {
        (**self).site_properties()
    }
}
