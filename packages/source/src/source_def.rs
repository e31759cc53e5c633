//! Config-driven data source definition.
//!
//! [`SourceDefinition`] captures where a GeoJSON collection lives and how
//! the map uses it, in a serializable TOML config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SourceError;

/// A GeoJSON data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"bc_rec_sites"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the collection is used for.
    pub role: SourceRole,
    /// Where to read the collection from.
    pub location: SourceLocation,
    /// Whether a failed load should be reported as an error rather than a
    /// warning. Defaults to `true` for sites and `false` for overlays.
    #[serde(default)]
    pub required: Option<bool>,
}

/// How a source's features are used on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRole {
    /// Recreation sites, classified into open/closed layers.
    Sites,
    /// Unclassified polygons drawn beneath the sites (e.g. Crown land).
    Overlay,
}

/// Where a source's `FeatureCollection` is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceLocation {
    /// A local GeoJSON file.
    File {
        /// Path, relative paths resolved against the load base directory.
        path: PathBuf,
    },
    /// A GeoJSON document fetched with a single `GET`.
    Http {
        /// Absolute URL.
        url: String,
    },
}

impl SourceLocation {
    /// Returns a printable description of the location, with file paths
    /// resolved against `base_dir`.
    #[must_use]
    pub fn describe(&self, base_dir: &Path) -> String {
        match self {
            Self::File { path } => base_dir.join(path).display().to_string(),
            Self::Http { url } => url.clone(),
        }
    }
}

impl SourceDefinition {
    /// Returns `true` if a failed load of this source is an error.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
            .unwrap_or(matches!(self.role, SourceRole::Sites))
    }
}

/// Parses a single source definition from TOML.
///
/// # Errors
///
/// Returns [`SourceError::Toml`] if the TOML is malformed or missing
/// required fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, SourceError> {
    Ok(toml::from_str(toml_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_http_source() {
        let def = parse_source_toml(
            r#"
            id = "remote"
            name = "Remote sites"
            role = "sites"

            [location]
            type = "http"
            url = "https://example.org/sites.geojson"
            "#,
        )
        .unwrap();
        assert_eq!(def.role, SourceRole::Sites);
        assert_eq!(
            def.location,
            SourceLocation::Http {
                url: "https://example.org/sites.geojson".to_string()
            }
        );
        assert!(def.is_required());
    }

    #[test]
    fn overlays_are_optional_by_default() {
        let def = parse_source_toml(
            r#"
            id = "crown"
            name = "Crown"
            role = "overlay"
            location = { type = "file", path = "crown.geojson" }
            "#,
        )
        .unwrap();
        assert!(!def.is_required());
    }

    #[test]
    fn explicit_required_flag_wins() {
        let def = parse_source_toml(
            r#"
            id = "crown"
            name = "Crown"
            role = "overlay"
            required = true
            location = { type = "file", path = "crown.geojson" }
            "#,
        )
        .unwrap();
        assert!(def.is_required());
    }

    #[test]
    fn rejects_unknown_location_type() {
        let result = parse_source_toml(
            r#"
            id = "x"
            name = "X"
            role = "sites"
            location = { type = "ftp", url = "ftp://example.org" }
            "#,
        );
        assert!(matches!(result, Err(SourceError::Toml(_))));
    }

    #[test]
    fn describes_file_relative_to_base() {
        let location = SourceLocation::File {
            path: PathBuf::from("data/a.geojson"),
        };
        let described = location.describe(Path::new("/srv/map"));
        assert!(described.ends_with("a.geojson"));
        assert!(described.starts_with("/srv/map"));
    }
}
