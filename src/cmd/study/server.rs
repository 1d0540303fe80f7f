// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use flashdeck_core::Fallible;
use flashdeck_core::Filter;
use flashdeck_core::Timestamp;
use flashdeck_core::rng::TinyRng;
use tokio::net::TcpListener;
use tokio::signal;

use crate::cmd::open_session;
use crate::cmd::study::get::get_handler;
use crate::cmd::study::post::post_handler;
use crate::cmd::study::state::ServerState;
use crate::utils::CACHE_CONTROL_IMMUTABLE;
use crate::utils::clock_seed;

pub struct ServerConfig {
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
    pub advance_delay: Duration,
    /// The view the session starts with.
    pub filter: Filter,
    pub shuffle: bool,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let started_at = Timestamp::now();
    let mut session = open_session(&config.database)?;
    if config.shuffle {
        let mut rng = TinyRng::from_seed(clock_seed());
        session.shuffle(&mut rng);
    }
    session.set_filter(config.filter);

    let state = ServerState::new(session, config.advance_delay);
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/script.js", get(script_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.route("/cards.json", get(cards_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    println!("Studying at http://{bind}/");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::debug!(
        "Session ended after {} seconds",
        Timestamp::now().seconds_since(started_at)
    );
    Ok(())
}

async fn script_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static str) {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/javascript"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        include_str!("script.js"),
    )
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

/// The whole collection as an import document.
async fn cards_handler(
    State(state): State<ServerState>,
) -> (StatusCode, [(HeaderName, &'static str); 1], String) {
    let json = state
        .lock()
        .and_then(|session| Ok(serde_json::to_string_pretty(session.cards())?));
    match json {
        Ok(json) => (StatusCode::OK, [(CONTENT_TYPE, "application/json")], json),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(CONTENT_TYPE, "text/plain")],
            e.to_string(),
        ),
    }
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            // Without a signal handler, run until the process is killed.
            log::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}
