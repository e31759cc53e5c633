//! Splits a feature collection into open, closed, and excluded groups.
//!
//! The pass is single and stable: each group keeps the original feature
//! order. Entries that are not objects, or whose geometry is missing or
//! invalid, are dropped from every group and counted in
//! [`SitePartition::skipped`]. Other feature members are read leniently.

use geojson::{Feature, Geometry, feature::Id};
use rec_map_site_models::{CampsiteFilter, Classification, SiteAttributes, SiteStatus};
use serde::Serialize;

use crate::SiteError;
use crate::classify::classify_attributes;
use crate::resolve::resolve_attributes;

/// A well-formed feature with its resolved attributes and classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedSite {
    /// Position of the feature in the source `features` array.
    pub index: usize,
    /// The parsed feature.
    pub feature: Feature,
    /// Attributes resolved through the alias table.
    pub attributes: SiteAttributes,
    /// Campsite and closure classification.
    pub classification: Classification,
}

/// Disjoint site groups derived from one feature collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SitePartition {
    /// In-scope sites with no closure.
    pub open: Vec<ClassifiedSite>,
    /// In-scope sites flagged closed.
    pub closed: Vec<ClassifiedSite>,
    /// Well-formed features outside the campsite filter.
    pub excluded: Vec<ClassifiedSite>,
    /// Entries dropped because they were malformed or had no geometry.
    pub skipped: usize,
}

impl SitePartition {
    /// Total number of well-formed features across all three groups.
    #[must_use]
    pub fn total(&self) -> usize {
        self.open.len() + self.closed.len() + self.excluded.len()
    }

    /// Returns per-group counts.
    #[must_use]
    pub fn counts(&self) -> PartitionCounts {
        PartitionCounts {
            open: self.open.len(),
            closed: self.closed.len(),
            excluded: self.excluded.len(),
            skipped: self.skipped,
        }
    }
}

/// Group sizes of a [`SitePartition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionCounts {
    /// Open in-scope sites.
    pub open: usize,
    /// Closed in-scope sites.
    pub closed: usize,
    /// Out-of-scope sites.
    pub excluded: usize,
    /// Malformed or geometry-less entries.
    pub skipped: usize,
}

/// Returns the `features` array of a `FeatureCollection`-shaped payload.
///
/// # Errors
///
/// Returns [`SiteError::MalformedPayload`] if the payload is not an object
/// or its `features` member is missing or not an array.
pub fn collection_features(payload: &serde_json::Value) -> Result<&[serde_json::Value], SiteError> {
    let object = payload
        .as_object()
        .ok_or_else(|| SiteError::MalformedPayload {
            message: "top-level value is not an object".to_string(),
        })?;

    object
        .get("features")
        .and_then(serde_json::Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| SiteError::MalformedPayload {
            message: "`features` is missing or not an array".to_string(),
        })
}

/// Parses one `features` entry, requiring only a valid geometry.
///
/// `properties` is kept when it is an object and `id` when it is a string
/// or number; any other value for either is treated as absent.
///
/// # Errors
///
/// Returns [`SiteError::MalformedFeature`] if the entry is not an object or
/// its geometry is missing, null, or not valid GeoJSON.
pub fn parse_feature(raw: &serde_json::Value) -> Result<Feature, SiteError> {
    let object = raw.as_object().ok_or_else(|| SiteError::MalformedFeature {
        message: "entry is not an object".to_string(),
    })?;

    let geometry = match object.get("geometry") {
        None | Some(serde_json::Value::Null) => {
            return Err(SiteError::MalformedFeature {
                message: "no geometry".to_string(),
            });
        }
        Some(value) => {
            Geometry::from_json_value(value.clone()).map_err(|e| SiteError::MalformedFeature {
                message: format!("invalid geometry: {e}"),
            })?
        }
    };

    let id = match object.get("id") {
        Some(serde_json::Value::String(s)) => Some(Id::String(s.clone())),
        Some(serde_json::Value::Number(n)) => Some(Id::Number(n.clone())),
        _ => None,
    };

    Ok(Feature {
        bbox: None,
        geometry: Some(geometry),
        id,
        properties: object
            .get("properties")
            .and_then(serde_json::Value::as_object)
            .cloned(),
        foreign_members: None,
    })
}

/// Partitions a `FeatureCollection` payload.
///
/// # Errors
///
/// Returns [`SiteError::MalformedPayload`] if the payload does not carry an
/// array-valued `features` member. No groups are produced in that case.
pub fn partition_collection(
    payload: &serde_json::Value,
    filter: CampsiteFilter,
) -> Result<SitePartition, SiteError> {
    let features = collection_features(payload)?;
    Ok(partition_features(features, filter))
}

/// Partitions raw feature values.
#[must_use]
pub fn partition_features(features: &[serde_json::Value], filter: CampsiteFilter) -> SitePartition {
    let mut partition = SitePartition::default();

    for (index, raw) in features.iter().enumerate() {
        let feature = match parse_feature(raw) {
            Ok(feature) => feature,
            Err(e) => {
                log::debug!("Skipping feature {index}: {e}");
                partition.skipped += 1;
                continue;
            }
        };

        let attributes = resolve_attributes(&feature);
        let classification = classify_attributes(&attributes);
        let site = ClassifiedSite {
            index,
            feature,
            attributes,
            classification,
        };

        if !classification.in_scope(filter) {
            partition.excluded.push(site);
            continue;
        }
        match classification.status() {
            SiteStatus::Open => partition.open.push(site),
            SiteStatus::Closed => partition.closed.push(site),
        }
    }

    if partition.skipped > 0 {
        log::warn!(
            "Skipped {} malformed or geometry-less features out of {}",
            partition.skipped,
            features.len()
        );
    }

    partition
}
