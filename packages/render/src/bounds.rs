//! Fit-to-bounds rectangle over rendered layers.

use geo::BoundingRect;
use serde::{Deserialize, Serialize};

use crate::layer::RenderedLayer;

/// A WGS84 bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl Bounds {
    /// Returns the smallest rectangle covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// Returns `[[south, west], [north, east]]`, the corner order Leaflet's
    /// `fitBounds` expects.
    #[must_use]
    pub const fn leaflet_corners(self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }
}

fn feature_bounds(feature: &geojson::Feature) -> Option<Bounds> {
    let geometry = feature.geometry.as_ref()?;
    let geometry: geo::Geometry<f64> = geometry.value.clone().try_into().ok()?;
    let rect = geometry.bounding_rect()?;
    Some(Bounds {
        west: rect.min().x,
        south: rect.min().y,
        east: rect.max().x,
        north: rect.max().y,
    })
}

/// Computes the rectangle covering every feature of every layer.
///
/// Returns `None` if no feature has a usable geometry.
#[must_use]
pub fn compute_bounds<'a, I>(layers: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a RenderedLayer>,
{
    layers
        .into_iter()
        .flat_map(|layer| layer.collection.features.iter())
        .filter_map(feature_bounds)
        .reduce(Bounds::union)
}
