//! Current frame and pointer selection

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use settlers_core::PrimitiveKind;

use crate::renderer::Frame;
use crate::state::ViewerState;

pub async fn get_frame(State(state): State<Arc<ViewerState>>) -> Json<Frame> {
    Json(state.frame().clone())
}

#[derive(Deserialize)]
pub struct SelectRequest {
    pub kind: PrimitiveKind,
    pub id: u32,
}

/// Resolve a click to the action the client would send; nothing is sent
pub async fn select(
    State(state): State<Arc<ViewerState>>,
    Json(req): Json<SelectRequest>,
) -> Json<Value> {
    let replay = state.replay();
    let Some(replay) = replay.as_ref() else {
        return Json(json!({ "error": "No replay loaded" }));
    };
    match replay.session().select(req.kind, req.id) {
        Some(action) => Json(json!({ "action": action })),
        None => Json(json!({ "action": null })),
    }
}
