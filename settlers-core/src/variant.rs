//! Board variants: grid shape plus default geometry per map name

use crate::coords::{base_grid, HexCoordinate};
use crate::error::VariantError;
use crate::geometry::GeometryParams;
use crate::model::{Board, Tile, TileKind};
use crate::topology::number_grid;

/// Hexagon circumradius of the base map
pub const BASE_HEX_SIZE: f64 = 64.0;
/// Margin around the base map
pub const BASE_OUTER_PADDING: f64 = 20.0;

/// A named board layout
#[derive(Clone, Debug)]
pub struct BoardVariant {
    pub name: &'static str,
    grid: fn() -> Vec<HexCoordinate>,
    pub params: GeometryParams,
}

impl BoardVariant {
    /// The 19-tile, four-player map
    pub fn base4() -> Self {
        Self {
            name: "base4",
            grid: base_grid,
            params: GeometryParams::new(BASE_HEX_SIZE, BASE_HEX_SIZE / 8.0)
                .with_outer_padding(BASE_OUTER_PADDING),
        }
    }

    /// Look up a variant by the map name the server sends
    pub fn by_name(name: &str) -> Result<Self, VariantError> {
        match name {
            "base4" => Ok(Self::base4()),
            other => Err(VariantError::Unsupported(other.to_string())),
        }
    }

    /// Every map name [`by_name`](Self::by_name) accepts
    pub fn names() -> &'static [&'static str] {
        &["base4"]
    }

    pub fn grid(&self) -> Vec<HexCoordinate> {
        (self.grid)()
    }
}

/// Resource layout of the demo board, in grid order
const DEMO_KINDS: [TileKind; 19] = [
    TileKind::Ore,
    TileKind::Sheep,
    TileKind::Lumber,
    TileKind::Grain,
    TileKind::Brick,
    TileKind::Sheep,
    TileKind::Brick,
    TileKind::Grain,
    TileKind::Lumber,
    TileKind::Desert,
    TileKind::Lumber,
    TileKind::Ore,
    TileKind::Lumber,
    TileKind::Ore,
    TileKind::Grain,
    TileKind::Sheep,
    TileKind::Brick,
    TileKind::Grain,
    TileKind::Sheep,
];

const DEMO_TOKENS: [u8; 18] = [10, 2, 9, 12, 6, 4, 10, 9, 11, 3, 8, 8, 3, 4, 5, 5, 6, 11];

/// A fully populated board for `grid` with synthetic vertex/edge numbering.
///
/// Used by the CLI preview and by tests; real matches take the tile list
/// from the server.
pub fn demo_board(grid: &[HexCoordinate]) -> Board {
    let mut tokens = DEMO_TOKENS.iter().copied().cycle();
    number_grid(grid)
        .into_iter()
        .zip(grid)
        .enumerate()
        .map(|(i, (ids, &coordinates))| {
            let kind = DEMO_KINDS[i % DEMO_KINDS.len()];
            let token = if kind.is_desert() {
                0
            } else {
                tokens.next().unwrap_or(0)
            };
            Tile {
                id: i as u32 + 1,
                resource: kind,
                token,
                edges: ids.edges,
                vertices: ids.vertices,
                coordinates,
                blocked: kind.is_desert(),
            }
        })
        .collect()
}
