//! Built-in sources: the BC recreation site collection and the Crown-land
//! overlay.
//!
//! Each definition lives in `packages/source/sources/<id>.toml` and is
//! embedded with [`include_str!`]. A config file with `[[sources]]` replaces
//! this list entirely.

use crate::source_def::{SourceDefinition, SourceRole, parse_source_toml};

/// TOML configs embedded at compile time.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    ("bc_rec_sites", include_str!("../sources/bc_rec_sites.toml")),
    ("crown_land", include_str!("../sources/crown_land.toml")),
];

/// Total number of configured sources (used in tests).
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 2;

/// Returns all default source definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_source_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the default source definitions with the given role.
#[must_use]
pub fn sources_with_role(role: SourceRole) -> Vec<SourceDefinition> {
    all_sources().into_iter().filter(|s| s.role == role).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_sources() {
        assert_eq!(all_sources().len(), EXPECTED_SOURCE_COUNT);
    }

    #[test]
    fn source_ids_are_unique() {
        let sources = all_sources();
        let mut ids: Vec<&str> = sources.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_SOURCE_COUNT);
    }

    #[test]
    fn has_exactly_one_required_sites_source() {
        let sites = sources_with_role(SourceRole::Sites);
        assert_eq!(sites.len(), 1);
        assert!(sites[0].is_required());
    }

    #[test]
    fn overlay_is_optional() {
        for overlay in sources_with_role(SourceRole::Overlay) {
            assert!(!overlay.is_required(), "{}", overlay.id);
        }
    }
}
