//! Board and player types as they arrive from the server

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coords::HexCoordinate;

/// Server-assigned tile identifier
pub type TileId = u32;
/// Server-assigned vertex identifier, shared by up to three tiles
pub type VertexId = u32;
/// Server-assigned edge identifier, shared by up to two tiles
pub type EdgeId = u32;

/// Tradeable resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Lumber,
    Brick,
    Sheep,
    Grain,
    Ore,
}

impl Resource {
    /// Display order used by the HUD
    pub const ALL: [Resource; 5] = [
        Resource::Lumber,
        Resource::Brick,
        Resource::Sheep,
        Resource::Grain,
        Resource::Ore,
    ];
}

/// What a tile produces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Lumber,
    Brick,
    Sheep,
    Grain,
    Ore,
    Desert,
}

impl TileKind {
    pub fn is_desert(&self) -> bool {
        *self == TileKind::Desert
    }

    /// The produced resource, `None` for the desert
    pub fn resource(&self) -> Option<Resource> {
        match self {
            TileKind::Lumber => Some(Resource::Lumber),
            TileKind::Brick => Some(Resource::Brick),
            TileKind::Sheep => Some(Resource::Sheep),
            TileKind::Grain => Some(Resource::Grain),
            TileKind::Ore => Some(Resource::Ore),
            TileKind::Desert => None,
        }
    }

    /// Fill colour used by renderers
    pub fn color(&self) -> &'static str {
        match self {
            TileKind::Brick => "#D2691E",
            TileKind::Lumber => "#228B22",
            TileKind::Grain => "#FFD700",
            TileKind::Ore => "#A9A9A9",
            TileKind::Sheep => "#98FB98",
            TileKind::Desert => "#878878",
        }
    }
}

/// Development card kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DevelopmentCard {
    Knight,
    #[serde(rename = "Year of Plenty")]
    YearOfPlenty,
    #[serde(rename = "Road Building")]
    RoadBuilding,
    Monopoly,
    #[serde(rename = "Victory Point")]
    VictoryPoint,
}

/// One board tile. Topology is fixed; only `blocked` changes during a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub resource: TileKind,
    #[serde(default)]
    pub token: u8,
    /// Edge IDs by local side slot
    pub edges: [EdgeId; 6],
    /// Vertex IDs by local corner slot
    pub vertices: [VertexId; 6],
    pub coordinates: HexCoordinate,
    #[serde(default)]
    pub blocked: bool,
}

/// The ordered tile list; index `i` matches grid slot `i`
pub type Board = Vec<Tile>;

/// A trade port attached between two vertices
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Resource name or `"General"`
    #[serde(rename = "type")]
    pub kind: String,
    pub vertices: [VertexId; 2],
}

/// Player colours
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: String,
    pub foreground: String,
}

/// A match participant; `name` is unique
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub color: ColorPair,
}

/// A road, settlement or city keyed by its edge or vertex ID
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: u32,
    pub owner: String,
}

/// Building ID -> building
pub type Buildings = BTreeMap<u32, Building>;

/// Resource quantities
pub type ResourceCollection = BTreeMap<Resource, u32>;

/// Development cards in hand
pub type DevHand = BTreeMap<DevelopmentCard, u32>;

/// Kind of building standing on a vertex
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingKind {
    #[default]
    None,
    Settlement,
    City,
}

/// Sum of all quantities in a collection
pub fn total_resources(collection: &ResourceCollection) -> u32 {
    collection.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tile_from_wire() {
        let tile: Tile = serde_json::from_value(json!({
            "id": 3,
            "resource": "Desert",
            "token": 0,
            "edges": [1, 2, 3, 4, 5, 6],
            "vertices": [7, 8, 9, 10, 11, 12],
            "coordinates": { "q": 0, "r": -2, "s": 2 },
            "blocked": true
        }))
        .unwrap();
        assert!(tile.resource.is_desert());
        assert!(tile.blocked);
        assert!(tile.coordinates.is_valid());

        let tile: Tile = serde_json::from_value(json!({
            "id": 4,
            "resource": "Ore",
            "token": 8,
            "edges": [1, 2, 3, 4, 5, 6],
            "vertices": [7, 8, 9, 10, 11, 12],
            "coordinates": { "q": 1, "r": -2, "s": 1 }
        }))
        .unwrap();
        assert_eq!(tile.resource.resource(), Some(Resource::Ore));
        assert!(!tile.blocked);
    }

    #[test]
    fn test_dev_hand_keys() {
        let hand: DevHand = serde_json::from_value(json!({
            "Knight": 2,
            "Victory Point": 1,
            "Year of Plenty": 0,
            "Road Building": 0,
            "Monopoly": 1
        }))
        .unwrap();
        assert_eq!(hand[&DevelopmentCard::VictoryPoint], 1);
        assert_eq!(hand[&DevelopmentCard::Knight], 2);
    }

    #[test]
    fn test_total_resources() {
        let hand: ResourceCollection = serde_json::from_value(json!({
            "Brick": 1, "Ore": 2, "Grain": 0, "Sheep": 3, "Lumber": 4
        }))
        .unwrap();
        assert_eq!(total_resources(&hand), 10);
    }
}
