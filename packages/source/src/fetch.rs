//! One-shot loading of GeoJSON sources.
//!
//! Each source is read exactly once: no retry, no refresh. Loads run
//! concurrently and every outcome is returned separately, so callers decide
//! per source whether a failure matters.

use futures::future::join_all;
use rec_map_site::partition::collection_features;

use crate::source_def::{SourceDefinition, SourceLocation};
use crate::{LoadOptions, SourceError};

/// The outcome of loading one source.
#[derive(Debug)]
pub struct LoadedSource {
    /// The definition that was loaded.
    pub definition: SourceDefinition,
    /// The validated `FeatureCollection` payload, or why it is missing.
    pub result: Result<serde_json::Value, SourceError>,
}

impl LoadedSource {
    /// Returns the payload if the load succeeded.
    #[must_use]
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.result.as_ref().ok()
    }
}

/// Builds the HTTP client used for all sources in a run.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the client cannot be built.
pub fn build_client(options: &LoadOptions) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .user_agent(options.user_agent.as_str())
        .build()
        .map_err(Into::into)
}

/// Reads and validates a single source.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read, the request fails or
/// returns a non-success status, the body is not JSON, or the JSON is not a
/// `FeatureCollection`.
pub async fn fetch_source(
    client: &reqwest::Client,
    definition: &SourceDefinition,
    options: &LoadOptions,
) -> Result<serde_json::Value, SourceError> {
    let payload: serde_json::Value = match &definition.location {
        SourceLocation::File { path } => {
            let path = options.base_dir.join(path);
            log::debug!("{}: reading {}", definition.id, path.display());
            let bytes = tokio::fs::read(&path).await?;
            serde_json::from_slice(&bytes)?
        }
        SourceLocation::Http { url } => {
            log::debug!("{}: GET {url}", definition.id);
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes)?
        }
    };

    collection_features(&payload)?;
    Ok(payload)
}

/// Loads every source concurrently, isolating failures.
///
/// Failures are logged at `error` for required sources and `warn` for
/// optional ones. The returned list is in definition order.
pub async fn load_sources(
    client: &reqwest::Client,
    definitions: &[SourceDefinition],
    options: &LoadOptions,
) -> Vec<LoadedSource> {
    let loads = definitions.iter().map(|definition| async move {
        let result = fetch_source(client, definition, options).await;
        let location = definition.location.describe(&options.base_dir);
        match &result {
            Ok(payload) => {
                let count = payload["features"].as_array().map_or(0, Vec::len);
                log::info!("{}: loaded {count} features from {location}", definition.id);
            }
            Err(e) if definition.is_required() => {
                log::error!("{}: failed to load {location}: {e}", definition.id);
            }
            Err(e) => {
                log::warn!("{}: optional source unavailable ({location}): {e}", definition.id);
            }
        }
        LoadedSource {
            definition: definition.clone(),
            result,
        }
    });

    join_all(loads).await
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::source_def::SourceRole;

    fn file_source(id: &str, role: SourceRole, path: &str) -> SourceDefinition {
        SourceDefinition {
            id: id.to_string(),
            name: id.to_string(),
            role,
            location: SourceLocation::File {
                path: PathBuf::from(path),
            },
            required: None,
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn non_collection_payloads_are_malformed() {
        let dir = temp_dir("rec_map_source_test_shape");
        let options = LoadOptions {
            base_dir: dir.clone(),
            ..LoadOptions::default()
        };
        let client = build_client(&options).unwrap();

        std::fs::write(dir.join("ok.geojson"), r#"{"features": []}"#).unwrap();
        let ok = fetch_source(
            &client,
            &file_source("ok", SourceRole::Sites, "ok.geojson"),
            &options,
        )
        .await;
        assert!(ok.is_ok());

        let bad_payloads = [
            "null",
            "[]",
            r#"{"type":"FeatureCollection"}"#,
            r#"{"features":"none"}"#,
        ];
        for (index, bad) in bad_payloads.into_iter().enumerate() {
            let name = format!("bad{index}.geojson");
            std::fs::write(dir.join(&name), bad).unwrap();
            let result = fetch_source(
                &client,
                &file_source("bad", SourceRole::Sites, &name),
                &options,
            )
            .await;
            assert!(
                matches!(
                    result,
                    Err(SourceError::MalformedPayload(
                        rec_map_site::SiteError::MalformedPayload { .. }
                    ))
                ),
                "{bad}"
            );
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn overlay_failure_does_not_affect_sites() {
        let dir = temp_dir("rec_map_source_test_isolation");
        std::fs::write(
            dir.join("sites.geojson"),
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":null,"properties":{}}]}"#,
        )
        .unwrap();
        std::fs::write(dir.join("overlay.geojson"), r#"{"type":"Feature"}"#).unwrap();

        let options = LoadOptions {
            base_dir: dir.clone(),
            ..LoadOptions::default()
        };
        let client = build_client(&options).unwrap();
        let loaded = load_sources(
            &client,
            &[
                file_source("sites", SourceRole::Sites, "sites.geojson"),
                file_source("overlay", SourceRole::Overlay, "overlay.geojson"),
                file_source("missing", SourceRole::Overlay, "missing.geojson"),
            ],
            &options,
        )
        .await;

        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].definition.id, "sites");
        assert!(loaded[0].payload().is_some());
        assert!(matches!(
            loaded[1].result,
            Err(SourceError::MalformedPayload(_))
        ));
        assert!(matches!(loaded[2].result, Err(SourceError::Io(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let dir = temp_dir("rec_map_source_test_invalid_json");
        std::fs::write(dir.join("bad.geojson"), "{not json").unwrap();

        let options = LoadOptions {
            base_dir: dir.clone(),
            ..LoadOptions::default()
        };
        let client = build_client(&options).unwrap();
        let result = fetch_source(
            &client,
            &file_source("bad", SourceRole::Sites, "bad.geojson"),
            &options,
        )
        .await;
        assert!(matches!(result, Err(SourceError::Json(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
