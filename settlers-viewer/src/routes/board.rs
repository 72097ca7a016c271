//! Board geometry endpoint
//!
//! Serves the replayed match's board when one exists, otherwise a demo board
//! of the configured variant so the front-end can lay itself out.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use settlers_client::{BoardScene, MatchState};
use settlers_core::{base_grid, demo_board, Primitive, Rect};

use crate::state::ViewerState;

#[derive(Serialize)]
pub struct BoardInfo {
    pub variant: &'static str,
    pub demo: bool,
    pub width: f64,
    pub height: f64,
    pub bounds: Rect,
    pub primitives: Vec<Primitive>,
}

fn board_info(scene: &BoardScene, game: &MatchState, demo: bool) -> BoardInfo {
    let layout = scene.topology().layout();
    let mut primitives = scene.tile_primitives(game);
    primitives.extend(scene.edge_primitives(game));
    primitives.extend(scene.vertex_primitives(game));
    primitives.extend(scene.port_primitives());
    BoardInfo {
        variant: scene.variant().name,
        demo,
        width: layout.surface_width(),
        height: layout.surface_height(),
        bounds: layout.bounds,
        primitives,
    }
}

pub async fn get_board(
    State(state): State<Arc<ViewerState>>,
) -> Result<Json<BoardInfo>, (StatusCode, String)> {
    if let Some(replay) = state.replay().as_ref() {
        let session = replay.session();
        if let Some(scene) = session.scene() {
            return Ok(Json(board_info(scene, &session.state().game, false)));
        }
    }

    let game = MatchState {
        map_name: state.config.map_name.clone(),
        board: demo_board(&base_grid()),
        ..MatchState::default()
    };
    BoardScene::build(&game, &state.config.map_name, state.config.viewport)
        .map(|scene| Json(board_info(&scene, &game, true)))
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}
