//! Session-scoped state
//!
//! One [`SessionState`] exists per joined room. It is created on join, owned
//! by the session and mutated only through the reconciler; renderers get a
//! shared reference when painting.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use settlers_core::{
    Board, BuildingKind, Buildings, ColorPair, DevHand, DevelopmentCard, EdgeId, Player, Port,
    ResourceCollection, TileId, VertexId,
};

use crate::phase::RoundPhase;
use crate::protocol::{Phase, RoomInfo, RoomParam, Statistics, TradeOffer};

/// Lobby state
#[derive(Clone, Debug, Default, Serialize)]
pub struct RoomState {
    pub room: RoomInfo,
    pub params: Vec<RoomParam>,
    pub min_max_players: (u32, u32),
}

/// Which edges the local player may pick
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EdgeAvailability {
    pub available: Vec<EdgeId>,
    pub enabled: bool,
    pub highlight: bool,
}

impl EdgeAvailability {
    pub fn is_selectable(&self, id: EdgeId) -> bool {
        self.enabled && self.available.contains(&id)
    }
}

/// Which vertices the local player may build on
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VertexAvailability {
    pub for_settlement: Vec<VertexId>,
    pub for_city: Vec<VertexId>,
    pub enabled: bool,
    pub highlight: bool,
}

impl VertexAvailability {
    pub fn is_selectable(&self, id: VertexId) -> bool {
        self.enabled && (self.for_settlement.contains(&id) || self.for_city.contains(&id))
    }
}

/// Tiles the robber may move to
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RobberMovement {
    pub available_tiles: Vec<TileId>,
    pub enabled: bool,
    pub highlight: bool,
}

impl RobberMovement {
    pub fn is_selectable(&self, id: TileId) -> bool {
        self.enabled && self.available_tiles.contains(&id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiceState {
    pub value: [u8; 2],
    pub enabled: bool,
}

/// Single-flag actions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ActionFlags {
    pub pass: bool,
    pub trade: bool,
    pub buy_dev_card: bool,
    pub monopoly: bool,
    pub year_of_plenty: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiscardState {
    pub amounts: BTreeMap<String, u32>,
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PickRobbedState {
    pub enabled: bool,
    pub options: Vec<String>,
}

/// Current turn and its skew-corrected deadline
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TurnState {
    pub player: String,
    /// `(subDeadline ?? deadline) + (receivedAt - serverNow)`
    pub local_deadline: Option<DateTime<Utc>>,
    /// Bumped on every turn update so the countdown restarts
    pub revision: u64,
    /// Whole seconds left as shown on the countdown, kept by the session
    pub seconds_left: Option<i64>,
}

/// Everything known about the running match
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchState {
    pub map_name: String,
    pub board: Board,
    pub ports: Vec<Port>,
    pub players: Vec<Player>,

    pub roads: Buildings,
    pub settlements: Buildings,
    pub cities: Buildings,
    pub blocked_tiles: Vec<TileId>,

    pub edges: EdgeAvailability,
    pub vertices: VertexAvailability,
    pub robber: RobberMovement,
    pub pick_robbed: PickRobbedState,

    pub hand: ResourceCollection,
    pub dev_hand: DevHand,
    pub dev_hand_permissions: BTreeMap<DevelopmentCard, bool>,
    pub resource_count: BTreeMap<String, u32>,
    pub dev_hand_count: BTreeMap<String, u32>,
    pub points: BTreeMap<String, u32>,
    pub longest_road: BTreeMap<String, u32>,
    pub knight_usage: BTreeMap<String, u32>,
    pub player_ports: Vec<String>,

    pub dice: DiceState,
    pub actions: ActionFlags,
    pub trade_offers: Vec<TradeOffer>,
    pub discard: DiscardState,

    pub turn: TurnState,
    pub round: RoundPhase,
    pub logs: Vec<String>,
}

impl MatchState {
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn color_of(&self, name: &str) -> Option<&ColorPair> {
        self.player(name).map(|p| &p.color)
    }

    /// What stands on a vertex; cities win over settlements
    pub fn building_at(&self, vertex: VertexId) -> BuildingKind {
        if self.cities.contains_key(&vertex) {
            BuildingKind::City
        } else if self.settlements.contains_key(&vertex) {
            BuildingKind::Settlement
        } else {
            BuildingKind::None
        }
    }

    /// Owner of the building on a vertex, if any
    pub fn vertex_owner(&self, vertex: VertexId) -> Option<&str> {
        self.cities
            .get(&vertex)
            .or_else(|| self.settlements.get(&vertex))
            .map(|b| b.owner.as_str())
    }

    pub fn road_owner(&self, edge: EdgeId) -> Option<&str> {
        self.roads.get(&edge).map(|b| b.owner.as_str())
    }
}

/// Post-match report
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchReport {
    pub room_name: String,
    pub statistics: Statistics,
    pub points_distribution: Option<BTreeMap<String, BTreeMap<String, u32>>>,
    pub rounds_played: u32,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Root of the session-scoped state
#[derive(Clone, Debug, Default, Serialize)]
pub struct SessionState {
    /// Local player's name
    pub user: String,
    /// Prefix of the last applied message
    pub phase: Phase,
    pub room: RoomState,
    #[serde(rename = "match")]
    pub game: MatchState,
    pub report: MatchReport,
}

impl SessionState {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ..Self::default()
        }
    }

    pub fn is_current_player(&self) -> bool {
        !self.user.is_empty() && self.game.turn.player == self.user
    }

    /// The local player may roll right now
    pub fn can_roll_dice(&self) -> bool {
        self.is_current_player() && self.game.round.allows_dice_roll()
    }

    /// The local player may end the round: dice rolled and it is their turn
    pub fn can_pass(&self) -> bool {
        let [a, b] = self.game.dice.value;
        self.is_current_player() && a > 0 && b > 0 && self.game.actions.pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settlers_core::Building;

    fn building(id: u32, owner: &str) -> Building {
        Building {
            id,
            owner: owner.to_string(),
        }
    }

    #[test]
    fn test_building_at_prefers_city() {
        let mut game = MatchState::default();
        game.settlements.insert(4, building(4, "ana"));
        game.settlements.insert(5, building(5, "ana"));
        game.cities.insert(5, building(5, "ana"));
        assert_eq!(game.building_at(4), BuildingKind::Settlement);
        assert_eq!(game.building_at(5), BuildingKind::City);
        assert_eq!(game.building_at(6), BuildingKind::None);
        assert_eq!(game.vertex_owner(5), Some("ana"));
    }

    #[test]
    fn test_selectable() {
        let edges = EdgeAvailability {
            available: vec![3, 4],
            enabled: false,
            highlight: true,
        };
        assert!(!edges.is_selectable(3));
        let edges = EdgeAvailability {
            enabled: true,
            ..edges
        };
        assert!(edges.is_selectable(3));
        assert!(!edges.is_selectable(5));
    }

    #[test]
    fn test_dice_roll_needs_turn_and_round() {
        let mut state = SessionState::new("ana");
        state.game.turn.player = "ana".to_string();
        state.game.round = RoundPhase::Regular;
        assert!(!state.can_roll_dice());
        state.game.round = RoundPhase::BetweenRounds;
        assert!(state.can_roll_dice());
        state.game.turn.player = "bo".to_string();
        assert!(!state.can_roll_dice());
    }
}
