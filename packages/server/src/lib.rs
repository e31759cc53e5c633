#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the generated recreation site map.
//!
//! Serves the static page and per-layer `GeoJSON` written by the generator,
//! plus a health endpoint.

mod handlers;

use std::path::PathBuf;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};

/// Environment variable naming the directory to serve.
pub const OUTPUT_DIR_ENV_VAR: &str = "REC_MAP_OUTPUT";

/// Directory served when `REC_MAP_OUTPUT` is unset.
pub const DEFAULT_OUTPUT_DIR: &str = "data/generated";

/// Shared application state.
pub struct AppState {
    /// Directory holding `index.html` and `layers/`.
    pub output_dir: PathBuf,
}

/// Returns the directory to serve from `REC_MAP_OUTPUT`, or the default.
#[must_use]
pub fn output_dir_from_env() -> PathBuf {
    std::env::var_os(OUTPUT_DIR_ENV_VAR).map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from)
}

/// Starts the HTTP server.
///
/// Reads `BIND_ADDR` (default `127.0.0.1`), `PORT` (default `8080`), and
/// `REC_MAP_OUTPUT` from the environment.
///
/// # Errors
///
/// Returns an error if the server fails to bind.
pub async fn run_server() -> std::io::Result<()> {
    let output_dir = output_dir_from_env();
    if !output_dir.join("index.html").is_file() {
        log::warn!(
            "No index.html in {}; run `rec_map generate` first",
            output_dir.display()
        );
    }

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!(
        "Serving {} on {bind_addr}:{port}",
        output_dir.display()
    );

    let state = web::Data::new(AppState {
        output_dir: output_dir.clone(),
    });

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(web::scope("/api").route("/health", web::get().to(handlers::health)))
            .service(Files::new("/", &output_dir).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
