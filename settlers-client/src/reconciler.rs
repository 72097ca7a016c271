//! Applies inbound events to [`SessionState`]
//!
//! Each event performs one narrow replacement and reports the regions it
//! touched. Regions accumulate in the reconciler's [`DirtyScheduler`] until
//! [`Reconciler::drain`] hands them out; a batch or hydrate therefore yields
//! one drain no matter how many sub-events it carried.

use chrono::{DateTime, Utc};

use crate::clock::local_deadline;
use crate::dirty::{DirtyScheduler, Region};
use crate::phase::RoundPhase;
use crate::protocol::{
    DiceUpdate, EdgeUpdate, Inbound, InboundEvent, MapUpdate, MatchHydrate, Phase, Report,
    RoundPlayerUpdate, SetupHydrate, VertexUpdate,
};
use crate::state::{
    DiscardState, EdgeAvailability, PickRobbedState, RobberMovement, SessionState,
    VertexAvailability,
};

/// The single writer of session state
#[derive(Debug, Default)]
pub struct Reconciler {
    dirty: DirtyScheduler,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one inbound unit received at `received_at`.
    ///
    /// Returns the regions this unit touched; they are also accumulated for
    /// the next [`drain`](Self::drain).
    pub fn apply(
        &mut self,
        state: &mut SessionState,
        inbound: Inbound,
        received_at: DateTime<Utc>,
    ) -> Region {
        let touched = apply_inbound(state, inbound, received_at);
        self.dirty.mark(touched);
        touched
    }

    /// Apply one unit and drain in a single step
    pub fn process(
        &mut self,
        state: &mut SessionState,
        inbound: Inbound,
        received_at: DateTime<Utc>,
    ) -> Region {
        self.apply(state, inbound, received_at);
        self.drain()
    }

    /// Mark regions touched outside event application (ticks, resizes)
    pub fn mark(&mut self, region: Region) {
        self.dirty.mark(region);
    }

    pub fn pending(&self) -> Region {
        self.dirty.pending()
    }

    pub fn drain(&mut self) -> Region {
        self.dirty.drain()
    }
}

fn apply_inbound(state: &mut SessionState, inbound: Inbound, received_at: DateTime<Utc>) -> Region {
    let Inbound { phase, event } = inbound;
    if let InboundEvent::Batch(events) = event {
        return events
            .into_iter()
            .fold(Region::empty(), |acc, sub| acc | apply_inbound(state, sub, received_at));
    }
    state.phase = phase;
    apply_event(state, event, received_at)
}

fn apply_event(state: &mut SessionState, event: InboundEvent, received_at: DateTime<Utc>) -> Region {
    let game = &mut state.game;
    match event {
        InboundEvent::RoomConnected(update) | InboundEvent::RoomUpdated(update) => {
            state.report.room_name = update.room.id.clone();
            state.room.room = update.room;
            state.room.params = update.params;
            if let Some(range) = update.min_max_players {
                state.room.min_max_players = range;
            }
            Region::ROOM
        }
        InboundEvent::GameStarted(start) => {
            let start = *start;
            state.room.room.status = start.room_status;
            game.map_name = start.map_name;
            game.board = start.map;
            game.players = start.players;
            game.ports = start.ports;
            game.resource_count = start.resource_count;
            game.logs = start.logs;
            Region::ROOM | Region::BOARD | Region::PLAYER_LIST | Region::LOGS
        }

        InboundEvent::Logs(logs) => {
            // the server always sends the full visible log
            game.logs = logs;
            Region::LOGS
        }
        InboundEvent::Map(update) => set_map(state, update),
        InboundEvent::Edges(update) => set_edges(state, update),
        InboundEvent::Vertices(update) => set_vertices(state, update),
        InboundEvent::RoundPlayer(update) => set_round_player(state, &update, received_at),
        InboundEvent::RoundType(update) => {
            match RoundPhase::from_index(update.round_type) {
                Some(round) => game.round = round,
                None => {
                    tracing::warn!("unknown round type {}", update.round_type);
                    return Region::empty();
                }
            }
            Region::TURN | Region::DICE_ACTION
        }
        InboundEvent::PlayerPorts(update) => {
            game.player_ports = update.ports;
            Region::PLAYER_PORTS
        }
        InboundEvent::Points(update) => {
            game.points = update.points;
            Region::PLAYER_LIST
        }
        InboundEvent::LongestRoad(update) => {
            game.longest_road = update.longest_road_size_by_player;
            Region::PLAYER_LIST
        }

        InboundEvent::Dice(update) => set_dice(state, update),
        InboundEvent::Hand(update) => {
            game.hand = update.hand;
            Region::HAND
        }
        InboundEvent::ResourceCount(update) => {
            game.resource_count = update.resource_count;
            Region::PLAYER_LIST
        }
        InboundEvent::DevHandCount(update) => {
            game.dev_hand_count = update.dev_hand_count;
            Region::PLAYER_LIST
        }
        InboundEvent::KnightUsage(update) => {
            game.knight_usage = update.knight_uses_by_player;
            Region::PLAYER_LIST
        }
        InboundEvent::Pass(toggle) => {
            game.actions.pass = toggle.enabled;
            Region::PASS_ACTION
        }
        InboundEvent::Trade(toggle) => {
            game.actions.trade = toggle.enabled;
            Region::TRADE
        }
        InboundEvent::TradeOffers(update) => {
            game.trade_offers = update.offers;
            Region::TRADE_OFFERS
        }
        InboundEvent::BuyDevCard(toggle) => {
            game.actions.buy_dev_card = toggle.enabled;
            Region::BUY_DEV_CARD
        }
        InboundEvent::DevHand(update) => {
            game.dev_hand = update.dev_hand;
            Region::DEV_HAND
        }
        InboundEvent::DevHandPermissions(update) => {
            game.dev_hand_permissions = update.dev_hand_permissions;
            Region::DEV_HAND
        }
        InboundEvent::Discard(update) => {
            game.discard = DiscardState {
                amounts: update.discard_amounts,
                enabled: update.enabled,
            };
            Region::DISCARD | Region::PLAYER_LIST
        }
        InboundEvent::RobberMovement(update) => {
            game.robber = RobberMovement {
                available_tiles: update.available_tiles,
                enabled: update.enabled,
                highlight: update.highlight,
            };
            Region::ROBBER_MOVEMENT
        }
        InboundEvent::PickRobbed(update) => {
            game.pick_robbed = PickRobbedState {
                enabled: update.enabled,
                options: update.options.unwrap_or_default(),
            };
            Region::PICK_ROBBED
        }
        InboundEvent::Monopoly(toggle) => {
            game.actions.monopoly = toggle.enabled;
            Region::MONOPOLY
        }
        InboundEvent::YearOfPlenty(toggle) => {
            game.actions.year_of_plenty = toggle.enabled;
            Region::YEAR_OF_PLENTY
        }
        InboundEvent::Report(update) => {
            state.report.statistics = update.report.statistics;
            Region::REPORT
        }
        InboundEvent::Statistics(update) => {
            state.report.statistics = update.statistics;
            Region::REPORT
        }

        InboundEvent::SetupHydrate(snapshot) => hydrate_setup(state, *snapshot, received_at),
        InboundEvent::MatchHydrate(snapshot) => hydrate_match(state, *snapshot, received_at),
        InboundEvent::OverData(over) => {
            let over = *over;
            state.room.room.status = over.room_status;
            set_report(state, over.report);
            state.report.start = over.start_datetime;
            state.report.end = over.end_datetime;
            state.report.rounds_played = over.rounds_played;
            Region::REPORT | Region::ROOM
        }
        InboundEvent::OverHydrate(over) => {
            let over = *over;
            state.game.players = over.players;
            state.game.map_name = over.map_name;
            state.room.room.status = over.room_status;
            state.report.room_name = over.room_name;
            set_report(state, over.report);
            state.report.start = over.start_datetime;
            state.report.end = over.end_datetime;
            state.report.rounds_played = over.rounds_played;
            Region::REPORT | Region::ROOM | Region::PLAYER_LIST
        }

        InboundEvent::Batch(events) => events.into_iter().fold(Region::empty(), |acc, sub| {
            acc | apply_inbound(state, sub, received_at)
        }),
    }
}

// ============================================================================
// Narrow setters shared by single events and snapshots
// ============================================================================

fn set_map(state: &mut SessionState, update: MapUpdate) -> Region {
    let game = &mut state.game;
    game.roads = update.roads;
    game.settlements = update.settlements;
    game.cities = update.cities;
    game.blocked_tiles = update.blocked_tiles;
    for tile in &mut game.board {
        tile.blocked = game.blocked_tiles.contains(&tile.id);
    }
    Region::ROADS | Region::SETTLEMENTS | Region::CITIES | Region::ROBBERS
}

fn set_edges(state: &mut SessionState, update: EdgeUpdate) -> Region {
    state.game.edges = EdgeAvailability {
        available: update.available_edges,
        enabled: update.enabled,
        highlight: update.highlight,
    };
    Region::EDGES
}

fn set_vertices(state: &mut SessionState, update: VertexUpdate) -> Region {
    state.game.vertices = VertexAvailability {
        for_settlement: update.available_settlement_vertices,
        for_city: update.available_city_vertices,
        enabled: update.enabled,
        highlight: update.highlight,
    };
    Region::VERTICES
}

fn set_round_player(
    state: &mut SessionState,
    update: &RoundPlayerUpdate,
    received_at: DateTime<Utc>,
) -> Region {
    let turn = &mut state.game.turn;
    turn.player = update.player.clone();
    turn.local_deadline = Some(local_deadline(update, received_at));
    turn.revision += 1;
    Region::TURN | Region::PLAYER_LIST | Region::DICE_ACTION
}

fn set_dice(state: &mut SessionState, update: DiceUpdate) -> Region {
    state.game.dice.value = update.dice;
    state.game.dice.enabled = update.enabled;
    Region::DICE | Region::DICE_ACTION | Region::PASS_ACTION
}

fn set_report(state: &mut SessionState, report: Report) {
    state.report.statistics = report.statistics;
    state.report.points_distribution = report.points_distribution;
}

fn hydrate_setup(state: &mut SessionState, snapshot: SetupHydrate, received_at: DateTime<Utc>) -> Region {
    tracing::info!(
        "hydrating setup snapshot: map {}, {} players",
        snapshot.map_name,
        snapshot.players.len()
    );
    state.room.room.status = snapshot.room_status;
    let game = &mut state.game;
    game.map_name = snapshot.map_name;
    game.board = snapshot.map;
    game.players = snapshot.players;
    game.ports = snapshot.ports;
    game.resource_count = snapshot.resource_count;
    game.dev_hand_count = snapshot.dev_hand_count;

    Region::ROOM
        | Region::MAP
        | Region::PLAYER_LIST
        | set_edges(state, snapshot.edge_update.payload)
        | set_vertices(state, snapshot.vertex_update.payload)
        | set_round_player(state, &snapshot.round_player_update.payload, received_at)
        | set_map(state, snapshot.map_update.payload)
}

fn hydrate_match(state: &mut SessionState, snapshot: MatchHydrate, received_at: DateTime<Utc>) -> Region {
    tracing::info!(
        "hydrating match snapshot: map {}, {} players",
        snapshot.map_name,
        snapshot.players.len()
    );
    state.room.room.status = snapshot.room_status;
    {
        let game = &mut state.game;
        game.map_name = snapshot.map_name;
        game.board = snapshot.map;
        game.players = snapshot.players;
        game.ports = snapshot.ports;
        game.resource_count = snapshot.resource_count;
        game.dev_hand_count = snapshot.dev_hand_count;
    }

    let mut touched = Region::ROOM
        | Region::MAP
        | Region::PLAYER_LIST
        | set_edges(state, snapshot.edge_update.payload)
        | set_vertices(state, snapshot.vertex_update.payload)
        | set_round_player(state, &snapshot.round_player_update.payload, received_at)
        | set_map(state, snapshot.map_update.payload)
        | set_dice(state, snapshot.dice_update.payload);

    // the remaining parts map one-to-one onto single events
    let mut rest = vec![
        InboundEvent::PlayerPorts(snapshot.ports_update.payload),
        InboundEvent::Hand(snapshot.hand_update.payload),
        InboundEvent::DevHand(snapshot.dev_hand_update.payload),
        InboundEvent::DevHandPermissions(snapshot.dev_hand_permissions_update.payload),
        InboundEvent::Pass(snapshot.pass_action_state.payload),
        InboundEvent::Trade(snapshot.trade_action_state.payload),
        InboundEvent::TradeOffers(snapshot.trade_offers_update.payload),
        InboundEvent::Discard(snapshot.discard_update.payload),
        InboundEvent::RobberMovement(snapshot.robber_movement_update.payload),
        InboundEvent::PickRobbed(snapshot.robbable_players_update.payload),
        InboundEvent::BuyDevCard(snapshot.buy_dev_card_update.payload),
        InboundEvent::Points(snapshot.points_update.payload),
        InboundEvent::LongestRoad(snapshot.longest_road_update.payload),
        InboundEvent::KnightUsage(snapshot.knights_usage_update.payload),
        InboundEvent::YearOfPlenty(snapshot.year_of_plenty_update.payload),
    ];
    if let Some(monopoly) = snapshot.monopoly_update {
        rest.push(InboundEvent::Monopoly(monopoly.payload));
    }
    if let Some(round_type) = snapshot.round_type_update {
        rest.push(InboundEvent::RoundType(round_type.payload));
    }
    for event in rest {
        touched |= apply_event(state, event, received_at);
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{HandUpdate, Toggle};
    use chrono::TimeZone;
    use settlers_core::{Building, Resource};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn inbound(event: InboundEvent) -> Inbound {
        Inbound::new(Phase::Match, event)
    }

    #[test]
    fn test_single_event_regions() {
        let mut state = SessionState::new("ana");
        let mut reconciler = Reconciler::new();
        let mut hand = settlers_core::ResourceCollection::new();
        hand.insert(Resource::Ore, 2);
        let touched = reconciler.apply(&mut state, inbound(InboundEvent::Hand(HandUpdate { hand })), at());
        assert_eq!(touched, Region::HAND);
        assert_eq!(state.game.hand[&Resource::Ore], 2);
        assert_eq!(reconciler.drain(), Region::HAND);
        assert_eq!(reconciler.drain(), Region::empty());
    }

    #[test]
    fn test_logs_replace() {
        let mut state = SessionState::new("ana");
        let mut reconciler = Reconciler::new();
        reconciler.apply(&mut state, inbound(InboundEvent::Logs(vec!["a".into(), "b".into()])), at());
        reconciler.apply(&mut state, inbound(InboundEvent::Logs(vec!["c".into()])), at());
        assert_eq!(state.game.logs, vec!["c".to_string()]);
    }

    #[test]
    fn test_map_update_syncs_blocked_tiles() {
        let mut state = SessionState::new("ana");
        state.game.board = settlers_core::demo_board(&settlers_core::base_grid());
        let mut roads = settlers_core::Buildings::new();
        roads.insert(
            5,
            Building {
                id: 5,
                owner: "ana".to_string(),
            },
        );
        let touched = set_map(
            &mut state,
            MapUpdate {
                blocked_tiles: vec![3],
                roads,
                ..MapUpdate::default()
            },
        );
        assert!(touched.contains(Region::ROADS | Region::ROBBERS));
        assert_eq!(state.game.board.iter().filter(|t| t.blocked).count(), 1);
        assert!(state.game.board[2].blocked);
        assert_eq!(state.game.road_owner(5), Some("ana"));
    }

    #[test]
    fn test_unknown_round_type_ignored() {
        let mut state = SessionState::new("ana");
        state.game.round = RoundPhase::Regular;
        let touched = apply_event(
            &mut state,
            InboundEvent::RoundType(crate::protocol::RoundTypeUpdate { round_type: 40 }),
            at(),
        );
        assert!(touched.is_empty());
        assert_eq!(state.game.round, RoundPhase::Regular);
    }

    #[test]
    fn test_batch_records_phase_per_entry() {
        let mut state = SessionState::new("ana");
        let mut reconciler = Reconciler::new();
        let batch = Inbound::new(
            Phase::Match,
            InboundEvent::Batch(vec![
                Inbound::new(Phase::Setup, InboundEvent::Pass(Toggle { enabled: true })),
                Inbound::new(Phase::Match, InboundEvent::Trade(Toggle { enabled: true })),
            ]),
        );
        let drained = reconciler.process(&mut state, batch, at());
        assert_eq!(drained, Region::PASS_ACTION | Region::TRADE);
        assert_eq!(state.phase, Phase::Match);
        assert!(state.game.actions.pass && state.game.actions.trade);
    }
}
