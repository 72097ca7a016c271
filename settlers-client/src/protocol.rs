//! Wire protocol: `{type, payload}` envelopes
//!
//! Inbound types carry a phase prefix (`room.`, `setup.`, `match.`, `over.`).
//! Most board and turn updates exist under both `setup.` and `match.` with
//! identical payloads, so they decode to one [`InboundEvent`] variant and the
//! prefix is kept alongside as [`Phase`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use settlers_core::{
    Board, Buildings, ColorPair, DevHand, DevelopmentCard, EdgeId, Player, Port, Resource,
    ResourceCollection, TileId, VertexId,
};

use crate::error::ProtocolError;

/// Raw message as it travels over the channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

/// Message type prefix
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Room,
    Setup,
    Match,
    Over,
}

impl Phase {
    pub fn from_prefix(prefix: &str) -> Option<Phase> {
        match prefix {
            "room" => Some(Phase::Room),
            "setup" => Some(Phase::Setup),
            "match" => Some(Phase::Match),
            "over" => Some(Phase::Over),
            _ => None,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Phase::Room => "room",
            Phase::Setup => "setup",
            Phase::Match => "match",
            Phase::Over => "over",
        }
    }
}

// ============================================================================
// PAYLOADS
// ============================================================================

/// A lobby seat
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub player: Option<Player>,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub bot: bool,
}

/// Lobby description
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomInfo {
    pub id: String,
    pub capacity: u32,
    pub map: String,
    pub participants: Vec<Participant>,
    pub private: bool,
    pub owner: String,
    pub status: String,
    pub colors: Vec<ColorPair>,
}

/// Tunable room parameter
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomParam {
    pub description: String,
    pub key: String,
    pub label: String,
    pub value: i64,
    pub values: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdate {
    pub room: RoomInfo,
    #[serde(default)]
    pub params: Vec<RoomParam>,
    #[serde(default)]
    pub min_max_players: Option<(u32, u32)>,
}

/// `room.start-game.success`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStart {
    #[serde(default)]
    pub logs: Vec<String>,
    pub map: Board,
    pub map_name: String,
    pub players: Vec<Player>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub resource_count: BTreeMap<String, u32>,
    #[serde(default)]
    pub room_status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapUpdate {
    pub blocked_tiles: Vec<TileId>,
    pub cities: Buildings,
    pub roads: Buildings,
    pub settlements: Buildings,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeUpdate {
    pub available_edges: Vec<EdgeId>,
    pub enabled: bool,
    pub highlight: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VertexUpdate {
    pub available_settlement_vertices: Vec<VertexId>,
    pub available_city_vertices: Vec<VertexId>,
    pub enabled: bool,
    pub highlight: bool,
}

/// Turn change with server timestamps for skew correction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPlayerUpdate {
    pub player: String,
    pub deadline: DateTime<Utc>,
    pub server_now: DateTime<Utc>,
    #[serde(default)]
    pub sub_deadline: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTypeUpdate {
    pub round_type: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerPortsUpdate {
    #[serde(default)]
    pub ports: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsUpdate {
    #[serde(default)]
    pub points: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongestRoadUpdate {
    #[serde(default)]
    pub longest_road_size_by_player: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnightUsageUpdate {
    #[serde(default)]
    pub knight_uses_by_player: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCountUpdate {
    #[serde(default)]
    pub resource_count: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevHandCountUpdate {
    #[serde(default)]
    pub dev_hand_count: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiceUpdate {
    pub dice: [u8; 2],
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandUpdate {
    #[serde(default)]
    pub hand: ResourceCollection,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevHandUpdate {
    #[serde(default)]
    pub dev_hand: DevHand,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevHandPermissionsUpdate {
    #[serde(default)]
    pub dev_hand_permissions: BTreeMap<DevelopmentCard, bool>,
}

/// Payload of the single-flag action toggles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggle {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferStatus {
    Open,
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Open,
    Accepted,
    Declined,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpponentResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub blocked: bool,
}

/// Player-to-player trade offer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeOffer {
    pub id: u32,
    #[serde(default)]
    pub parent: u32,
    pub player: String,
    #[serde(default)]
    pub offer: ResourceCollection,
    #[serde(default)]
    pub request: ResourceCollection,
    #[serde(default)]
    pub opponents: BTreeMap<String, OpponentResponse>,
    pub status: OfferStatus,
    #[serde(default)]
    pub finalized: bool,
    #[serde(default)]
    pub counters: Vec<u32>,
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeOffersUpdate {
    #[serde(default)]
    pub offers: Vec<TradeOffer>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscardUpdate {
    pub discard_amounts: BTreeMap<String, u32>,
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RobberMovementUpdate {
    pub available_tiles: Vec<TileId>,
    pub enabled: bool,
    pub highlight: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickRobbedUpdate {
    pub enabled: bool,
    pub options: Option<Vec<String>>,
}

/// Match statistics as served for charts
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub dice_stats_by_player: BTreeMap<String, BTreeMap<u8, u32>>,
    pub general_dice_stats: BTreeMap<u8, u32>,
    pub longest_road_evolution: BTreeMap<String, Vec<u32>>,
    pub number_of_robberies_by_player: BTreeMap<String, u32>,
    pub points_evolution: Option<BTreeMap<String, Vec<u32>>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    pub statistics: Statistics,
    pub points_distribution: Option<BTreeMap<String, BTreeMap<String, u32>>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportUpdate {
    #[serde(default)]
    pub report: Report,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsUpdate {
    #[serde(default)]
    pub statistics: Statistics,
}

/// `over.data`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverData {
    #[serde(default)]
    pub room_status: String,
    #[serde(default)]
    pub rounds_played: u32,
    #[serde(default)]
    pub report: Report,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
}

/// `over.hydrate`: report plus enough context to show it after a reload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverHydrate {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub map_name: String,
    #[serde(default)]
    pub room_status: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub rounds_played: u32,
    #[serde(default)]
    pub report: Report,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
}

/// A nested `{type, payload}` inside a hydrate snapshot; only the payload is
/// read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Nested<T> {
    pub payload: T,
}

/// `setup.hydrate`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupHydrate {
    #[serde(default)]
    pub room_status: String,
    pub map_name: String,
    pub map: Board,
    pub players: Vec<Player>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub resource_count: BTreeMap<String, u32>,
    #[serde(default)]
    pub dev_hand_count: BTreeMap<String, u32>,
    pub edge_update: Nested<EdgeUpdate>,
    pub vertex_update: Nested<VertexUpdate>,
    pub round_player_update: Nested<RoundPlayerUpdate>,
    pub map_update: Nested<MapUpdate>,
}

/// `match.hydrate`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchHydrate {
    #[serde(default)]
    pub room_status: String,
    pub map_name: String,
    pub map: Board,
    pub players: Vec<Player>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub resource_count: BTreeMap<String, u32>,
    #[serde(default)]
    pub dev_hand_count: BTreeMap<String, u32>,
    pub edge_update: Nested<EdgeUpdate>,
    pub vertex_update: Nested<VertexUpdate>,
    pub round_player_update: Nested<RoundPlayerUpdate>,
    pub map_update: Nested<MapUpdate>,
    pub ports_update: Nested<PlayerPortsUpdate>,
    pub hand_update: Nested<HandUpdate>,
    pub dev_hand_update: Nested<DevHandUpdate>,
    pub dev_hand_permissions_update: Nested<DevHandPermissionsUpdate>,
    pub dice_update: Nested<DiceUpdate>,
    pub pass_action_state: Nested<Toggle>,
    pub trade_action_state: Nested<Toggle>,
    pub trade_offers_update: Nested<TradeOffersUpdate>,
    pub discard_update: Nested<DiscardUpdate>,
    pub robber_movement_update: Nested<RobberMovementUpdate>,
    pub robbable_players_update: Nested<PickRobbedUpdate>,
    pub buy_dev_card_update: Nested<Toggle>,
    pub points_update: Nested<PointsUpdate>,
    pub longest_road_update: Nested<LongestRoadUpdate>,
    pub knights_usage_update: Nested<KnightUsageUpdate>,
    pub year_of_plenty_update: Nested<Toggle>,
    #[serde(default)]
    pub monopoly_update: Option<Nested<Toggle>>,
    #[serde(default)]
    pub round_type_update: Option<Nested<RoundTypeUpdate>>,
}

// ============================================================================
// INBOUND
// ============================================================================

/// A decoded inbound event
#[derive(Clone, Debug, PartialEq)]
pub enum InboundEvent {
    RoomConnected(RoomUpdate),
    RoomUpdated(RoomUpdate),
    GameStarted(Box<GameStart>),

    Logs(Vec<String>),
    Map(MapUpdate),
    Edges(EdgeUpdate),
    Vertices(VertexUpdate),
    RoundPlayer(RoundPlayerUpdate),
    RoundType(RoundTypeUpdate),
    PlayerPorts(PlayerPortsUpdate),
    Points(PointsUpdate),
    LongestRoad(LongestRoadUpdate),

    Dice(DiceUpdate),
    Hand(HandUpdate),
    ResourceCount(ResourceCountUpdate),
    DevHandCount(DevHandCountUpdate),
    KnightUsage(KnightUsageUpdate),
    Pass(Toggle),
    Trade(Toggle),
    TradeOffers(TradeOffersUpdate),
    BuyDevCard(Toggle),
    DevHand(DevHandUpdate),
    DevHandPermissions(DevHandPermissionsUpdate),
    Discard(DiscardUpdate),
    RobberMovement(RobberMovementUpdate),
    PickRobbed(PickRobbedUpdate),
    Monopoly(Toggle),
    YearOfPlenty(Toggle),
    Report(ReportUpdate),
    Statistics(StatisticsUpdate),

    /// Sub-events applied in order before a single drain
    Batch(Vec<Inbound>),
    SetupHydrate(Box<SetupHydrate>),
    MatchHydrate(Box<MatchHydrate>),
    OverData(Box<OverData>),
    OverHydrate(Box<OverHydrate>),
}

/// An inbound event with the phase prefix it arrived under
#[derive(Clone, Debug, PartialEq)]
pub struct Inbound {
    pub phase: Phase,
    pub event: InboundEvent,
}

impl Inbound {
    pub fn new(phase: Phase, event: InboundEvent) -> Self {
        Self { phase, event }
    }

    /// Decode one text frame
    pub fn decode(text: &str) -> Result<Inbound, ProtocolError> {
        let envelope: Envelope = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;
        Self::from_envelope(envelope)
    }

    pub fn from_envelope(envelope: Envelope) -> Result<Inbound, ProtocolError> {
        let Envelope { kind, payload } = envelope;
        let (phase, name) = kind
            .split_once('.')
            .and_then(|(prefix, name)| Phase::from_prefix(prefix).map(|p| (p, name)))
            .ok_or_else(|| ProtocolError::UnknownType(kind.clone()))?;

        let event = match (phase, name) {
            (Phase::Room, "connect.success") => {
                InboundEvent::RoomConnected(payload_as(&kind, payload)?)
            }
            (
                Phase::Room,
                "new-update"
                | "update-capacity.success"
                | "toggle-ready.success"
                | "update-param.success",
            ) => InboundEvent::RoomUpdated(payload_as(&kind, payload)?),
            (Phase::Room, "start-game.success") => {
                InboundEvent::GameStarted(Box::new(payload_as(&kind, payload)?))
            }

            (Phase::Setup | Phase::Match, "bulk-update") => {
                let entries: Vec<Envelope> = payload_as(&kind, payload)?;
                let events = entries
                    .into_iter()
                    .enumerate()
                    .map(|(index, entry)| {
                        Self::from_envelope(entry).map_err(|source| ProtocolError::InBatch {
                            index,
                            source: Box::new(source),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                InboundEvent::Batch(events)
            }
            (Phase::Setup, "hydrate") => {
                InboundEvent::SetupHydrate(Box::new(payload_as(&kind, payload)?))
            }
            (Phase::Match, "hydrate") => {
                InboundEvent::MatchHydrate(Box::new(payload_as(&kind, payload)?))
            }

            (Phase::Setup | Phase::Match, "update-logs") => {
                InboundEvent::Logs(payload_as(&kind, payload)?)
            }
            (Phase::Setup | Phase::Match, "update-map") => {
                InboundEvent::Map(payload_as(&kind, payload)?)
            }
            (Phase::Setup | Phase::Match, "update-edges") => {
                InboundEvent::Edges(payload_as(&kind, payload)?)
            }
            (Phase::Setup | Phase::Match, "update-vertices") => {
                InboundEvent::Vertices(payload_as(&kind, payload)?)
            }
            (Phase::Setup | Phase::Match, "update-round-player") => {
                InboundEvent::RoundPlayer(payload_as(&kind, payload)?)
            }
            (Phase::Setup | Phase::Match, "update-round-type") => {
                InboundEvent::RoundType(payload_as(&kind, payload)?)
            }
            (Phase::Setup | Phase::Match, "update-ports") => {
                InboundEvent::PlayerPorts(payload_as(&kind, payload)?)
            }
            (Phase::Setup | Phase::Match, "update-points") => {
                InboundEvent::Points(payload_as(&kind, payload)?)
            }
            (Phase::Setup | Phase::Match, "update-longest-road-size") => {
                InboundEvent::LongestRoad(payload_as(&kind, payload)?)
            }

            (Phase::Match, "update-dice") => InboundEvent::Dice(payload_as(&kind, payload)?),
            (Phase::Match, "update-hand") => InboundEvent::Hand(payload_as(&kind, payload)?),
            (Phase::Match, "update-resource-count") => {
                InboundEvent::ResourceCount(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-dev-hand-count") => {
                InboundEvent::DevHandCount(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-knight-usage") => {
                InboundEvent::KnightUsage(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-pass") => InboundEvent::Pass(payload_as(&kind, payload)?),
            (Phase::Match, "update-trade") => InboundEvent::Trade(payload_as(&kind, payload)?),
            (Phase::Match, "update-trade-offers") => {
                InboundEvent::TradeOffers(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-buy-dev-card") => {
                InboundEvent::BuyDevCard(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-dev-hand") => {
                InboundEvent::DevHand(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-dev-hand-permissions") => {
                InboundEvent::DevHandPermissions(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-discard-phase") => {
                InboundEvent::Discard(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-robber-movement") => {
                InboundEvent::RobberMovement(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-pick-robbed") => {
                InboundEvent::PickRobbed(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-monopoly") => {
                InboundEvent::Monopoly(payload_as(&kind, payload)?)
            }
            (Phase::Match, "update-year-of-plenty") => {
                InboundEvent::YearOfPlenty(payload_as(&kind, payload)?)
            }
            (Phase::Match, "report.success") => InboundEvent::Report(payload_as(&kind, payload)?),
            (Phase::Match, "statistics.success") => {
                InboundEvent::Statistics(payload_as(&kind, payload)?)
            }

            (Phase::Over, "data") => InboundEvent::OverData(Box::new(payload_as(&kind, payload)?)),
            (Phase::Over, "hydrate") => {
                InboundEvent::OverHydrate(Box::new(payload_as(&kind, payload)?))
            }

            _ => return Err(ProtocolError::UnknownType(kind.clone())),
        };

        Ok(Inbound { phase, event })
    }
}

fn payload_as<T: DeserializeOwned>(kind: &str, payload: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(payload).map_err(|source| ProtocolError::Payload {
        kind: kind.to_string(),
        source,
    })
}

// ============================================================================
// OUTBOUND
// ============================================================================

/// User intent sent to the server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum OutboundAction {
    #[serde(rename = "match.dice-roll")]
    DiceRoll {},
    #[serde(rename = "match.vertex-click")]
    VertexClick { vertex: VertexId },
    #[serde(rename = "match.edge-click")]
    EdgeClick { edge: EdgeId },
    #[serde(rename = "match.tile-click")]
    TileClick { tile: TileId },
    #[serde(rename = "match.pass-click")]
    PassClick {},
    #[serde(rename = "match.end-round")]
    EndRound {},
    #[serde(rename = "match.discard-cards")]
    DiscardCards { resources: ResourceCollection },
    #[serde(rename = "match.buy-dev-card")]
    BuyDevCard {},
    #[serde(rename = "match.dev-card-click")]
    DevCardClick { kind: DevelopmentCard },
    #[serde(rename = "match.create-trade-offer")]
    CreateTradeOffer {
        given: ResourceCollection,
        requested: ResourceCollection,
    },
    #[serde(rename = "match.create-counter-trade-offer")]
    CreateCounterTradeOffer {
        given: ResourceCollection,
        requested: ResourceCollection,
        #[serde(rename = "tradeID")]
        trade_id: u32,
    },
    #[serde(rename = "match.accept-trade-offer")]
    AcceptTradeOffer {
        #[serde(rename = "tradeID")]
        trade_id: u32,
    },
    #[serde(rename = "match.reject-trade-offer")]
    RejectTradeOffer {
        #[serde(rename = "tradeID")]
        trade_id: u32,
    },
    #[serde(rename = "match.cancel-trade-offer")]
    CancelTradeOffer {
        #[serde(rename = "tradeID")]
        trade_id: u32,
    },
    #[serde(rename = "match.finalize-trade-offer")]
    FinalizeTradeOffer {
        accepter: String,
        #[serde(rename = "tradeID")]
        trade_id: u32,
    },
    #[serde(rename = "match.make-bank-trade")]
    BankTrade {
        given: ResourceCollection,
        requested: ResourceCollection,
    },
    #[serde(rename = "match.make-general-port-trade")]
    GeneralPortTrade {
        given: ResourceCollection,
        requested: ResourceCollection,
    },
    #[serde(rename = "match.make-resource-port-trade")]
    ResourcePortTrade {
        given: ResourceCollection,
        requested: ResourceCollection,
    },
    #[serde(rename = "match.rob-player")]
    RobPlayer { player: String },
    #[serde(rename = "match.monopoly")]
    Monopoly { resource: Resource },
    #[serde(rename = "match.year-of-plenty")]
    YearOfPlenty {
        resource1: Resource,
        resource2: Resource,
    },
    #[serde(rename = "match.statistics")]
    RequestStatistics {},

    #[serde(rename = "room.toggle-ready")]
    ToggleReady {
        #[serde(rename = "roomID")]
        room_id: String,
        ready: bool,
    },
    #[serde(rename = "room.start-game")]
    StartGame {},
    #[serde(rename = "room.update-capacity")]
    UpdateCapacity { capacity: u32 },
    #[serde(rename = "room.update-param")]
    UpdateParam { key: String, value: i64 },
    #[serde(rename = "room.player-change-color")]
    ChangeColor { color: String },
}

impl OutboundAction {
    /// Wire type string
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundAction::DiceRoll {} => "match.dice-roll",
            OutboundAction::VertexClick { .. } => "match.vertex-click",
            OutboundAction::EdgeClick { .. } => "match.edge-click",
            OutboundAction::TileClick { .. } => "match.tile-click",
            OutboundAction::PassClick {} => "match.pass-click",
            OutboundAction::EndRound {} => "match.end-round",
            OutboundAction::DiscardCards { .. } => "match.discard-cards",
            OutboundAction::BuyDevCard {} => "match.buy-dev-card",
            OutboundAction::DevCardClick { .. } => "match.dev-card-click",
            OutboundAction::CreateTradeOffer { .. } => "match.create-trade-offer",
            OutboundAction::CreateCounterTradeOffer { .. } => "match.create-counter-trade-offer",
            OutboundAction::AcceptTradeOffer { .. } => "match.accept-trade-offer",
            OutboundAction::RejectTradeOffer { .. } => "match.reject-trade-offer",
            OutboundAction::CancelTradeOffer { .. } => "match.cancel-trade-offer",
            OutboundAction::FinalizeTradeOffer { .. } => "match.finalize-trade-offer",
            OutboundAction::BankTrade { .. } => "match.make-bank-trade",
            OutboundAction::GeneralPortTrade { .. } => "match.make-general-port-trade",
            OutboundAction::ResourcePortTrade { .. } => "match.make-resource-port-trade",
            OutboundAction::RobPlayer { .. } => "match.rob-player",
            OutboundAction::Monopoly { .. } => "match.monopoly",
            OutboundAction::YearOfPlenty { .. } => "match.year-of-plenty",
            OutboundAction::RequestStatistics {} => "match.statistics",
            OutboundAction::ToggleReady { .. } => "room.toggle-ready",
            OutboundAction::StartGame {} => "room.start-game",
            OutboundAction::UpdateCapacity { .. } => "room.update-capacity",
            OutboundAction::UpdateParam { .. } => "room.update-param",
            OutboundAction::ChangeColor { .. } => "room.player-change-color",
        }
    }

    /// Serialise to a text frame
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|source| ProtocolError::Encode {
            kind: self.kind(),
            source,
        })
    }
}
