//! Replay API endpoints
//!
//! Load a recorded message log and step the client session through it.

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use settlers_client::{Region, ReplayLog};

use crate::state::{Replay, ViewerState};

fn replay_json(replay: &Replay, last: Option<Region>) -> Value {
    let session = replay.session();
    json!({
        "active": true,
        "position": replay.position(),
        "total": replay.total(),
        "at_start": replay.position() == 0,
        "at_end": replay.at_end(),
        "phase": session.state().phase,
        "round": session.state().game.round.name(),
        "regions": last.map(Region::names),
    })
}

/// Get current replay state
pub async fn get_replay_state(State(state): State<Arc<ViewerState>>) -> Json<Value> {
    match state.replay().as_ref() {
        Some(replay) => Json(replay_json(replay, None)),
        None => Json(json!({ "active": false })),
    }
}

#[derive(Deserialize)]
pub struct LoadRequest {
    pub path: Option<String>,
    pub messages: Option<Vec<Value>>,
    pub user: Option<String>,
}

/// Load a log from a file path or inline messages
pub async fn load_replay(
    State(state): State<Arc<ViewerState>>,
    Json(req): Json<LoadRequest>,
) -> Json<Value> {
    let log = if let Some(path) = &req.path {
        match ReplayLog::load(Path::new(path)) {
            Ok(log) => log,
            Err(e) => return Json(json!({ "error": format!("{:#}", e) })),
        }
    } else if let Some(messages) = req.messages {
        ReplayLog::from_messages(messages.iter().map(Value::to_string).collect())
    } else {
        return Json(json!({ "error": "Must provide \"path\" or \"messages\"" }));
    };

    let user = req.user.unwrap_or_default();
    match state.load(log, &user) {
        Ok(total) => {
            tracing::info!("loaded replay with {} messages as {:?}", total, user);
            Json(json!({ "success": true, "total": total }))
        }
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

/// Apply the next message
pub async fn replay_forward(State(state): State<Arc<ViewerState>>) -> Json<Value> {
    let mut guard = state.replay();
    let Some(replay) = guard.as_mut() else {
        return Json(json!({ "error": "No active replay" }));
    };
    match replay.step() {
        Some(regions) => Json(replay_json(replay, Some(regions))),
        None => Json(json!({ "error": "Already at end", "at_end": true })),
    }
}

/// Step back one message by replaying from the start
pub async fn replay_backward(State(state): State<Arc<ViewerState>>) -> Json<Value> {
    let mut guard = state.replay();
    let Some(replay) = guard.as_mut() else {
        return Json(json!({ "error": "No active replay" }));
    };
    if replay.position() == 0 {
        return Json(json!({ "error": "Already at start", "at_start": true }));
    }
    match replay.seek(replay.position() - 1) {
        Ok(()) => Json(replay_json(replay, None)),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

#[derive(Deserialize)]
pub struct GotoRequest {
    pub index: usize,
}

/// Jump to a message index
pub async fn replay_goto(
    State(state): State<Arc<ViewerState>>,
    Json(req): Json<GotoRequest>,
) -> Json<Value> {
    let mut guard = state.replay();
    let Some(replay) = guard.as_mut() else {
        return Json(json!({ "error": "No active replay" }));
    };
    match replay.seek(req.index) {
        Ok(()) => Json(replay_json(replay, None)),
        Err(e) => Json(json!({ "error": e.to_string() })),
    }
}

/// Stop replaying and clear the frame
pub async fn replay_stop(State(state): State<Arc<ViewerState>>) -> Json<Value> {
    state.stop();
    Json(json!({ "success": true }))
}
