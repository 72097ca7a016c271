//! Settlers viewer - HTTP front for replayed client sessions
//!
//! This crate provides the web backend:
//! - Replay API stepping a client session through a recorded log
//! - The painted frame as JSON, for a browser front-end to draw
//! - Board geometry and click resolution
//! - Static file serving for the front-end

mod renderer;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;

use settlers_client::ReplayLog;

pub use renderer::{hud_content, Frame, FrameRenderer, SharedFrame};
pub use state::{Replay, ViewerState};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: "viewer/static".to_string(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ViewerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        .route("/api/status", get(routes::status::status_handler))
        // Geometry and painted output
        .route("/api/board", get(routes::board::get_board))
        .route("/api/frame", get(routes::frame::get_frame))
        .route("/api/select", post(routes::frame::select))
        // Replay API
        .route("/api/replay/state", get(routes::replay::get_replay_state))
        .route("/api/replay/load", post(routes::replay::load_replay))
        .route("/api/replay/forward", post(routes::replay::replay_forward))
        .route("/api/replay/backward", post(routes::replay::replay_backward))
        .route("/api/replay/goto", post(routes::replay::replay_goto))
        .route("/api/replay/stop", post(routes::replay::replay_stop))
        .with_state(state)
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server, optionally with a log preloaded
pub async fn run_server(
    config: ServerConfig,
    state: Arc<ViewerState>,
    preload: Option<(ReplayLog, String)>,
) -> anyhow::Result<()> {
    if let Some((log, user)) = preload {
        let total = state.load(log, &user)?;
        tracing::info!("Preloaded replay with {} messages", total);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let router = create_router(&config, state);

    tracing::info!("Settlers viewer starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
