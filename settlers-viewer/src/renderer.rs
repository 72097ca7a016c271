//! Renderer that paints into a JSON frame
//!
//! The browser front-end polls the frame instead of receiving draw calls.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::{json, Value};

use settlers_client::{MapRenderer, Region, SessionState};
use settlers_core::{Primitive, TileId};

/// Everything painted so far
#[derive(Clone, Debug, Default, Serialize)]
pub struct Frame {
    /// Bumped on every paint call
    pub revision: u64,
    pub tiles: Vec<Primitive>,
    pub ports: Vec<Primitive>,
    pub edges: Vec<Primitive>,
    pub vertices: Vec<Primitive>,
    pub roads: Vec<Primitive>,
    pub settlements: Vec<Primitive>,
    pub cities: Vec<Primitive>,
    pub robbers: Vec<TileId>,
    /// HUD region name -> its current content
    pub hud: BTreeMap<&'static str, Value>,
}

/// Shared handle to the frame a [`FrameRenderer`] writes
pub type SharedFrame = Arc<RwLock<Frame>>;

pub struct FrameRenderer {
    frame: SharedFrame,
}

impl FrameRenderer {
    pub fn new(frame: SharedFrame) -> Self {
        Self { frame }
    }

    fn paint(&mut self, f: impl FnOnce(&mut Frame)) {
        let mut frame = self.frame.write().unwrap_or_else(|e| e.into_inner());
        frame.revision += 1;
        f(&mut frame);
    }
}

impl MapRenderer for FrameRenderer {
    fn render(&mut self, tiles: &[Primitive], ports: &[Primitive]) {
        self.paint(|frame| {
            frame.tiles = tiles.to_vec();
            frame.ports = ports.to_vec();
        });
    }

    fn update_edges(&mut self, edges: &[Primitive]) {
        self.paint(|frame| frame.edges = edges.to_vec());
    }

    fn update_vertices(&mut self, vertices: &[Primitive]) {
        self.paint(|frame| frame.vertices = vertices.to_vec());
    }

    fn update_tiles(&mut self, tiles: &[Primitive]) {
        self.paint(|frame| frame.tiles = tiles.to_vec());
    }

    fn update_roads(&mut self, roads: &[Primitive]) {
        self.paint(|frame| frame.roads = roads.to_vec());
    }

    fn update_settlements(&mut self, settlements: &[Primitive]) {
        self.paint(|frame| frame.settlements = settlements.to_vec());
    }

    fn update_cities(&mut self, cities: &[Primitive]) {
        self.paint(|frame| frame.cities = cities.to_vec());
    }

    fn update_robbers(&mut self, blocked: &[TileId]) {
        self.paint(|frame| frame.robbers = blocked.to_vec());
    }

    fn paint_hud(&mut self, region: Region, state: &SessionState) {
        let Some(&name) = region.names().first() else {
            return;
        };
        let content = hud_content(name, state);
        self.paint(|frame| {
            frame.hud.insert(name, content);
        });
    }
}

/// The slice of session state the HUD region `name` shows
pub fn hud_content(name: &str, state: &SessionState) -> Value {
    let game = &state.game;
    match name {
        "hand" => json!(game.hand),
        "devHand" => json!({
            "cards": game.dev_hand,
            "permissions": game.dev_hand_permissions,
        }),
        "dice" => json!(game.dice.value),
        "diceAction" => json!({ "enabled": state.can_roll_dice() }),
        "passAction" => json!({ "enabled": state.can_pass() }),
        "discard" => json!(game.discard),
        "playerList" => json!({
            "players": game.players,
            "current": game.turn.player,
            "points": game.points,
            "longestRoad": game.longest_road,
            "knightUsage": game.knight_usage,
            "resourceCount": game.resource_count,
            "devHandCount": game.dev_hand_count,
        }),
        "playerPorts" => json!(game.player_ports),
        "trade" => json!({ "enabled": game.actions.trade }),
        "tradeOffers" => json!(game.trade_offers),
        "buyDevCard" => json!({ "enabled": game.actions.buy_dev_card }),
        "pickRobbed" => json!(game.pick_robbed),
        "monopoly" => json!({ "enabled": game.actions.monopoly }),
        "yearOfPlenty" => json!({ "enabled": game.actions.year_of_plenty }),
        "logs" => json!(game.logs),
        "turn" => json!({
            "player": game.turn.player,
            "round": game.round.name(),
            "deadline": game.turn.local_deadline,
            "secondsLeft": game.turn.seconds_left,
        }),
        "room" => json!(state.room),
        "report" => json!(state.report),
        _ => Value::Null,
    }
}
