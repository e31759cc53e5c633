//! Case-insensitive, multi-alias property lookup.
//!
//! Each [`SiteAttribute`] carries an ordered candidate list. Candidates are
//! tried in order; within a candidate an exact key match wins over a
//! case-insensitive one. `null` values are skipped as if the key were
//! missing.

use geojson::JsonObject;
use rec_map_site_models::{PropertyValue, SiteAttribute, SiteAttributes};

use crate::SiteProperties;

/// Returns the first non-null value among `candidates`.
///
/// Returns `None` only when no candidate resolves; a present `0` or `""` is
/// returned as-is.
#[must_use]
pub fn resolve_field<'a>(props: &'a JsonObject, candidates: &[&str]) -> Option<&'a serde_json::Value> {
    for &candidate in candidates {
        if let Some(value) = props.get(candidate)
            && !value.is_null()
        {
            return Some(value);
        }

        let folded = props
            .iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(candidate) && !value.is_null())
            .map(|(_, value)| value);
        if folded.is_some() {
            return folded;
        }
    }
    None
}

/// Resolves a semantic attribute from a property bag to a scalar.
#[must_use]
pub fn resolve(props: &JsonObject, attribute: SiteAttribute) -> Option<PropertyValue> {
    resolve_field(props, attribute.candidates()).and_then(PropertyValue::from_json)
}

/// Resolves a semantic attribute from a feature or property bag.
///
/// Inputs without a property bag resolve nothing.
#[must_use]
pub fn resolve_from<P: SiteProperties + ?Sized>(
    input: &P,
    attribute: SiteAttribute,
) -> Option<PropertyValue> {
    input
        .site_properties()
        .and_then(|props| resolve(props, attribute))
}

/// Resolves every semantic attribute into a typed record.
#[must_use]
pub fn resolve_attributes<P: SiteProperties + ?Sized>(input: &P) -> SiteAttributes {
    let Some(props) = input.site_properties() else {
        return SiteAttributes::new();
    };

    SiteAttribute::all()
        .iter()
        .filter_map(|&attribute| resolve(props, attribute).map(|value| (attribute, value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn resolves_lowercase_short_form_key() {
        let props = bag(serde_json::json!({"closr_ind": "Y"}));
        let value = resolve_field(&props, &["CLOSURE_IND", "CLOSR_IND"]).unwrap();
        assert_eq!(value, "Y");
    }

    #[test]
    fn first_candidate_exact_wins_over_second_exact() {
        let props = bag(serde_json::json!({"CLOSURE_IND": "N", "CLOSR_IND": "Y"}));
        let value = resolve_field(&props, &["CLOSURE_IND", "CLOSR_IND"]).unwrap();
        assert_eq!(value, "N");
    }

    #[test]
    fn first_candidate_case_insensitive_wins_over_second_exact() {
        let props = bag(serde_json::json!({"closure_ind": "N", "CLOSR_IND": "Y"}));
        let value = resolve_field(&props, &["CLOSURE_IND", "CLOSR_IND"]).unwrap();
        assert_eq!(value, "N");
    }

    #[test]
    fn exact_match_wins_within_candidate() {
        let props = bag(serde_json::json!({"Closure_Ind": "N", "CLOSURE_IND": "Y"}));
        let value = resolve_field(&props, &["CLOSURE_IND"]).unwrap();
        assert_eq!(value, "Y");
    }

    #[test]
    fn null_is_skipped_in_favor_of_next_candidate() {
        let props = bag(serde_json::json!({"DEFINED_CAMPSITES": null, "DFND_CAMP": 4}));
        let value = resolve(&props, SiteAttribute::CampsiteCount).unwrap();
        assert_eq!(value, PropertyValue::Number(4.0));
    }

    #[test]
    fn zero_is_distinguishable_from_missing() {
        let props = bag(serde_json::json!({"DFND_CAMP": 0}));
        assert_eq!(
            resolve(&props, SiteAttribute::CampsiteCount),
            Some(PropertyValue::Number(0.0))
        );
        assert_eq!(resolve(&props, SiteAttribute::Name), None);
    }

    #[test]
    fn resolves_whole_record_from_short_schema() {
        let feature = serde_json::json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-123.1, 49.3]},
            "properties": {
                "PROJECT_NM": "Cedar Flats",
                "DFND_CAMP": "8",
                "F_FILE_ID": "REC1234",
                "OBJECTID": 77
            }
        });
        let attrs = resolve_attributes(&feature);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.text(SiteAttribute::Name).as_deref(), Some("Cedar Flats"));
        assert_eq!(
            attrs.get(SiteAttribute::CampsiteCount),
            Some(&PropertyValue::Text("8".into()))
        );
        assert_eq!(
            attrs.text(SiteAttribute::ExternalSiteId).as_deref(),
            Some("REC1234")
        );
    }

    #[test]
    fn input_without_bag_resolves_nothing() {
        assert!(resolve_attributes(&serde_json::json!("not a feature")).is_empty());
    }
}
