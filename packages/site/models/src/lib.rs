#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Semantic attribute types for BC recreation site features.
//!
//! Recreation site data arrives in two overlapping schemas that spell the
//! same attribute differently (e.g. `CLOSURE_IND` vs `CLOSR_IND`). This crate
//! defines the closed set of [`SiteAttribute`]s with their priority-ordered
//! alias tables, the scalar [`PropertyValue`] a resolved field carries, and
//! the derived [`Classification`] and [`LayerKind`] types shared by the
//! rest of the workspace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A semantic site attribute, independent of which schema named it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SiteAttribute {
    /// Site or project name.
    Name,
    /// Number of defined campsites.
    CampsiteCount,
    /// Short location description.
    Location,
    /// Free-text site description.
    Description,
    /// Driving directions.
    Directions,
    /// `Y`/`N` closure flag.
    ClosureIndicator,
    /// Reason or category of a closure.
    ClosureType,
    /// Closure date (epoch milliseconds or date text).
    ClosureDate,
    /// Free-text closure comment.
    ClosureComment,
    /// Forest file identifier used by the external site portals.
    ExternalSiteId,
}

impl SiteAttribute {
    /// Returns the candidate field names for this attribute, long-form
    /// schema first.
    #[must_use]
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Name => &["PROJECT_NAME", "PROJECT_NM"],
            Self::CampsiteCount => &["DEFINED_CAMPSITES", "DFND_CAMP"],
            Self::Location => &["SITE_LOCATION", "SITE_LOC"],
            Self::Description => &["SITE_DESCRIPTION", "ST_DESC"],
            Self::Directions => &["DRIVING_DIRECTIONS", "DRV_DIRCTN"],
            Self::ClosureIndicator => &["CLOSURE_IND", "CLOSR_IND"],
            Self::ClosureType => &["CLOSURE_TYPE", "CLOSR_TYPE"],
            Self::ClosureDate => &["CLOSURE_DATE", "CLOSR_DT"],
            Self::ClosureComment => &["CLOSURE_COMMENT", "CLOSR_COM"],
            Self::ExternalSiteId => &["FOREST_FILE_ID", "F_FILE_ID"],
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Name,
            Self::CampsiteCount,
            Self::Location,
            Self::Description,
            Self::Directions,
            Self::ClosureIndicator,
            Self::ClosureType,
            Self::ClosureDate,
            Self::ClosureComment,
            Self::ExternalSiteId,
        ]
    }
}

/// A scalar property value resolved from a feature's property bag.
///
/// JSON `null` never becomes a `PropertyValue`; absence is modelled with
/// `Option::None` so that a numeric `0` stays distinguishable from missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A JSON boolean.
    Bool(bool),
    /// A JSON number.
    Number(f64),
    /// A JSON string, or the JSON text of a nested array/object.
    Text(String),
}

impl PropertyValue {
    /// Converts a JSON value into a scalar. Returns `None` for `null` and
    /// for numbers that cannot be represented as `f64`.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Some(Self::Text(value.to_string()))
            }
        }
    }

    /// Coerces the value to a finite number.
    ///
    /// Text is trimmed and parsed as a decimal. Booleans, blank text, and
    /// non-finite results (`NaN`, `inf`) yield `None`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Bool(_) => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Renders the value as display text.
    ///
    /// Integral numbers render without a fractional part (`12`, not `12.0`).
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
        }
    }

    /// Returns `true` when the value renders as empty or whitespace-only
    /// text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

/// Typed attribute record for a single feature.
///
/// Populated once by the field resolver; downstream code reads attributes by
/// [`SiteAttribute`] and never inspects raw field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteAttributes {
    values: BTreeMap<SiteAttribute, PropertyValue>,
}

impl SiteAttributes {
    /// Creates an empty attribute record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets an attribute value, replacing any previous one.
    pub fn insert(&mut self, attribute: SiteAttribute, value: PropertyValue) {
        self.values.insert(attribute, value);
    }

    /// Returns the raw resolved value of an attribute.
    #[must_use]
    pub fn get(&self, attribute: SiteAttribute) -> Option<&PropertyValue> {
        self.values.get(&attribute)
    }

    /// Returns the display text of an attribute, or `None` when the
    /// attribute is absent or blank.
    #[must_use]
    pub fn text(&self, attribute: SiteAttribute) -> Option<String> {
        self.get(attribute)
            .filter(|v| !v.is_blank())
            .map(PropertyValue::display_text)
    }

    /// Returns the number of resolved attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no attribute resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(SiteAttribute, PropertyValue)> for SiteAttributes {
    fn from_iter<T: IntoIterator<Item = (SiteAttribute, PropertyValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Whether the campsite-count predicate scopes which features are shown.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CampsiteFilter {
    /// Only features with a positive campsite count are in scope.
    #[default]
    CampsitesOnly,
    /// Every well-formed feature is in scope.
    AllSites,
}

/// Open/closed status of a site.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SiteStatus {
    /// No closure recorded.
    Open,
    /// Closure indicator is `Y`.
    Closed,
}

/// Classification derived from a feature's properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Campsite count resolved to a number greater than zero.
    pub is_campsite: bool,
    /// Closure indicator resolved to `Y`.
    pub is_closed: bool,
}

impl Classification {
    /// Returns the open/closed status.
    #[must_use]
    pub const fn status(self) -> SiteStatus {
        if self.is_closed {
            SiteStatus::Closed
        } else {
            SiteStatus::Open
        }
    }

    /// Returns `true` if the feature is shown under the given filter.
    #[must_use]
    pub const fn in_scope(self, filter: CampsiteFilter) -> bool {
        match filter {
            CampsiteFilter::CampsitesOnly => self.is_campsite,
            CampsiteFilter::AllSites => true,
        }
    }
}

/// A map layer that can be toggled independently.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayerKind {
    /// In-scope sites with no closure.
    Open,
    /// In-scope sites flagged closed.
    Closed,
    /// Crown-land polygon overlay.
    Overlay,
}

impl LayerKind {
    /// Returns the checkbox label for this layer.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open sites",
            Self::Closed => "Closed sites",
            Self::Overlay => "Crown land",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Open, Self::Closed, Self::Overlay]
    }
}
