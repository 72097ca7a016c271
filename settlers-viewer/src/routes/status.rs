//! Status endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::ViewerState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub map: String,
    pub replay_loaded: bool,
}

pub async fn status_handler(State(state): State<Arc<ViewerState>>) -> Json<StatusResponse> {
    let replay_loaded = state.replay().is_some();
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        map: state.config.map_name.clone(),
        replay_loaded,
    })
}
