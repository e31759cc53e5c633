//! Campsite and closure predicates.
//!
//! Both predicates accept anything implementing [`SiteProperties`] (a
//! `geojson::Feature`, a JSON feature object, or a bare property bag) and
//! also have variants over pre-resolved [`SiteAttributes`].

use rec_map_site_models::{Classification, PropertyValue, SiteAttribute, SiteAttributes};

use crate::SiteProperties;
use crate::resolve::resolve_from;

/// Literal closure indicator value meaning "closed".
const CLOSED_FLAG: &str = "Y";

/// Returns the numeric campsite count, or `None` if absent or unparsable.
#[must_use]
pub fn campsite_count<P: SiteProperties + ?Sized>(input: &P) -> Option<f64> {
    resolve_from(input, SiteAttribute::CampsiteCount)
        .as_ref()
        .and_then(PropertyValue::as_number)
}

/// Returns `true` if the campsite count resolves to a number greater than
/// zero.
#[must_use]
pub fn is_campsite<P: SiteProperties + ?Sized>(input: &P) -> bool {
    campsite_count(input).is_some_and(|n| n > 0.0)
}

/// Returns `true` if the closure indicator normalizes to `Y`.
#[must_use]
pub fn is_closed<P: SiteProperties + ?Sized>(input: &P) -> bool {
    closure_flag_set(resolve_from(input, SiteAttribute::ClosureIndicator).as_ref())
}

/// Classifies a feature or property bag.
#[must_use]
pub fn classify<P: SiteProperties + ?Sized>(input: &P) -> Classification {
    Classification {
        is_campsite: is_campsite(input),
        is_closed: is_closed(input),
    }
}

/// Classifies an already-resolved attribute record.
#[must_use]
pub fn classify_attributes(attributes: &SiteAttributes) -> Classification {
    Classification {
        is_campsite: attributes
            .get(SiteAttribute::CampsiteCount)
            .and_then(PropertyValue::as_number)
            .is_some_and(|n| n > 0.0),
        is_closed: closure_flag_set(attributes.get(SiteAttribute::ClosureIndicator)),
    }
}

fn closure_flag_set(value: Option<&PropertyValue>) -> bool {
    value.is_some_and(|v| v.display_text().trim().eq_ignore_ascii_case(CLOSED_FLAG))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_attributes;

    fn bag(value: serde_json::Value) -> geojson::JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn closed_for_y_variants_under_either_schema() {
        for field in ["CLOSURE_IND", "CLOSR_IND"] {
            for flag in ["y", "Y", " Y "] {
                let props = bag(serde_json::json!({ field: flag }));
                assert!(is_closed(&props), "{field}={flag:?}");
            }
        }
    }

    #[test]
    fn open_for_everything_else() {
        for field in ["CLOSURE_IND", "CLOSR_IND"] {
            for flag in ["N", "", "YES", "closed", "Y Y"] {
                let props = bag(serde_json::json!({ field: flag }));
                assert!(!is_closed(&props), "{field}={flag:?}");
            }
        }
        assert!(!is_closed(&bag(serde_json::json!({}))));
        assert!(!is_closed(&bag(serde_json::json!({"CLOSURE_IND": null}))));
        assert!(!is_closed(&bag(serde_json::json!({"CLOSURE_IND": true}))));
    }

    #[test]
    fn not_campsite_for_zero_negative_garbage_or_absent() {
        for field in ["DEFINED_CAMPSITES", "DFND_CAMP"] {
            for count in [
                serde_json::json!("0"),
                serde_json::json!(0),
                serde_json::json!(-1),
                serde_json::json!("abc"),
            ] {
                let props = bag(serde_json::json!({ field: count.clone() }));
                assert!(!is_campsite(&props), "{field}={count}");
            }
        }
        assert!(!is_campsite(&bag(serde_json::json!({}))));
    }

    #[test]
    fn campsite_for_positive_counts() {
        for field in ["DEFINED_CAMPSITES", "DFND_CAMP"] {
            for count in [
                serde_json::json!("1"),
                serde_json::json!(2.5),
                serde_json::json!(100),
            ] {
                let props = bag(serde_json::json!({ field: count.clone() }));
                assert!(is_campsite(&props), "{field}={count}");
            }
        }
    }

    #[test]
    fn predicates_accept_features_and_bags() {
        let feature = serde_json::json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-120.0, 50.0]},
            "properties": {"dfnd_camp": "12", "closr_ind": "y"}
        });
        let parsed = geojson::Feature::from_json_value(feature.clone()).unwrap();
        let props = feature["properties"].as_object().unwrap();

        let expected = Classification {
            is_campsite: true,
            is_closed: true,
        };
        assert_eq!(classify(&feature), expected);
        assert_eq!(classify(&parsed), expected);
        assert_eq!(classify(props), expected);
        assert_eq!(classify_attributes(&resolve_attributes(&parsed)), expected);
    }

    #[test]
    fn feature_without_properties_is_open_non_campsite() {
        let feature = geojson::Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert_eq!(
            classify(&feature),
            Classification {
                is_campsite: false,
                is_closed: false,
            }
        );
    }

    #[test]
    fn top_level_members_of_json_feature_are_ignored() {
        let feature = serde_json::json!({
            "type": "Feature",
            "geometry": null,
            "properties": null,
            "CLOSURE_IND": "Y",
            "DEFINED_CAMPSITES": 5
        });
        assert!(!is_closed(&feature));
        assert!(!is_campsite(&feature));
    }
}
