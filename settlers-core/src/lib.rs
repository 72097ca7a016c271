//! Settlers Core - Board geometry and topology
//!
//! This crate turns the server's tile list into drawable board primitives:
//! - Cube coordinates and the fixed base grid
//! - Pointy-top pixel projection with inter-tile spacing
//! - Deduplicated vertex/edge topology keyed by server IDs
//! - Trade port anchoring and label orientation
//! - Wire types for tiles, players and buildings

pub mod coords;
pub mod error;
pub mod geometry;
pub mod model;
pub mod ports;
pub mod primitives;
pub mod topology;
pub mod variant;

// Re-exports for convenient access
pub use coords::{base_grid, HexCoordinate, DIRECTIONS};
pub use error::{PortError, TopologyError, VariantError};
pub use geometry::{GeometryParams, Layout, Point, Rect, Viewport};
pub use model::{
    Board, Building, BuildingKind, Buildings, ColorPair, DevHand, DevelopmentCard, EdgeId, Player,
    Port, Resource, ResourceCollection, Tile, TileId, TileKind, VertexId,
};
pub use ports::{locate, PortAnchor, PortPlacement, PortPlacer, PORT_ORIENTATION};
pub use primitives::{board_primitives, Geometry, Primitive, PrimitiveKind};
pub use topology::{BoardTopology, BoardTopologyBuilder};
pub use variant::{demo_board, BoardVariant};
