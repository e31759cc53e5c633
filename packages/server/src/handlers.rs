//! HTTP handler functions for the map server.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::AppState;

/// Response body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Always `true` while the server is answering.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Whether a generated `index.html` exists in the output directory.
    pub map_generated: bool,
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        map_generated: state.output_dir.join("index.html").is_file(),
    })
}
