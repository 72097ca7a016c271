//! Board topology: tiles, vertices and edges as drawable primitives
//!
//! Adjacent tiles report the same server ID for a shared vertex (up to three
//! tiles) or edge (two tiles). The builder walks tiles in grid order and the
//! first tile to reference an ID claims it; later references are dropped, so
//! each ID yields exactly one primitive.
//!
//! Local slot `k` of `Tile::vertices` is corner `k` and slot `k` of
//! `Tile::edges` is side `k` of the winding documented in
//! [`crate::geometry`]. A rotated winding silently attaches IDs to the wrong
//! corners, so the numbering helper [`number_grid`] follows the
//! projector's direction table.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::coords::HexCoordinate;
use crate::error::TopologyError;
use crate::geometry::{
    edge_quads, hexagon_corners, vertex_anchors, GeometryParams, Hexagon, Layout, Point, Quad,
};
use crate::model::{EdgeId, Tile, TileId, TileKind, VertexId};

// ============================================================================
// PRIMITIVES
// ============================================================================

/// A tile polygon
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileShape {
    pub id: TileId,
    pub kind: TileKind,
    pub token: u8,
    pub center: Point,
    pub corners: Hexagon,
    pub blocked: bool,
}

/// The single drawable for one vertex ID
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexShape {
    pub id: VertexId,
    pub position: Point,
    /// Tile that claimed the ID and its local corner slot
    pub tile: TileId,
    pub slot: u8,
}

/// The single drawable for one edge ID
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeShape {
    pub id: EdgeId,
    pub quad: Quad,
    pub tile: TileId,
    pub slot: u8,
    /// Vertex IDs at either end of the side
    pub endpoints: [VertexId; 2],
}

/// Deduplicated board geometry, built once per board and viewport
#[derive(Clone, Debug)]
pub struct BoardTopology {
    layout: Layout,
    tiles: Vec<TileShape>,
    vertices: Vec<VertexShape>,
    edges: Vec<EdgeShape>,
    tile_index: FxHashMap<TileId, usize>,
    vertex_index: FxHashMap<VertexId, usize>,
    edge_index: FxHashMap<EdgeId, usize>,
}

impl BoardTopology {
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn tiles(&self) -> &[TileShape] {
        &self.tiles
    }

    pub fn vertices(&self) -> &[VertexShape] {
        &self.vertices
    }

    pub fn edges(&self) -> &[EdgeShape] {
        &self.edges
    }

    pub fn tile(&self, id: TileId) -> Option<&TileShape> {
        self.tile_index.get(&id).map(|&i| &self.tiles[i])
    }

    pub fn vertex(&self, id: VertexId) -> Option<&VertexShape> {
        self.vertex_index.get(&id).map(|&i| &self.vertices[i])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&EdgeShape> {
        self.edge_index.get(&id).map(|&i| &self.edges[i])
    }

    /// Update the robber marker flags; topology itself never changes
    pub fn set_blocked(&mut self, blocked: &[TileId]) {
        for tile in &mut self.tiles {
            tile.blocked = blocked.contains(&tile.id);
        }
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Turns the server's tile list into [`BoardTopology`]
pub struct BoardTopologyBuilder<'a> {
    grid: &'a [HexCoordinate],
    params: GeometryParams,
}

impl<'a> BoardTopologyBuilder<'a> {
    pub fn new(grid: &'a [HexCoordinate], params: GeometryParams) -> Self {
        Self { grid, params }
    }

    /// Build in grid order
    pub fn build(&self, tiles: &[Tile]) -> Result<BoardTopology, TopologyError> {
        let order: Vec<usize> = (0..tiles.len()).collect();
        self.build_in_order(tiles, &order)
    }

    /// Build visiting grid slots in `order`. Which tile claims a shared ID
    /// depends on the order, the number of primitives does not.
    pub fn build_in_order(
        &self,
        tiles: &[Tile],
        order: &[usize],
    ) -> Result<BoardTopology, TopologyError> {
        if tiles.len() != self.grid.len() {
            return Err(TopologyError::TileCountMismatch {
                expected: self.grid.len(),
                actual: tiles.len(),
            });
        }
        validate_order(order, tiles.len())?;

        let layout = Layout::new(self.grid, self.params);
        let mut topology = BoardTopology {
            layout,
            tiles: Vec::with_capacity(tiles.len()),
            vertices: Vec::new(),
            edges: Vec::new(),
            tile_index: FxHashMap::default(),
            vertex_index: FxHashMap::default(),
            edge_index: FxHashMap::default(),
        };
        let mut claimed_vertices: FxHashSet<VertexId> = FxHashSet::default();
        let mut claimed_edges: FxHashSet<EdgeId> = FxHashSet::default();

        for &slot in order {
            let tile = &tiles[slot];
            let coord = self.grid[slot];
            if tile.coordinates != coord {
                tracing::warn!(
                    "tile#{} reports {:?} but sits in grid slot {} ({:?})",
                    tile.id,
                    tile.coordinates,
                    slot,
                    coord
                );
            }

            let center = layout.project(coord);
            topology.tile_index.insert(tile.id, topology.tiles.len());
            topology.tiles.push(TileShape {
                id: tile.id,
                kind: tile.resource,
                token: tile.token,
                center,
                corners: hexagon_corners(center, self.params.hex_size),
                blocked: tile.blocked,
            });

            let anchors = vertex_anchors(center, &self.params);
            for (k, (&id, position)) in tile.vertices.iter().zip(anchors).enumerate() {
                if !claimed_vertices.insert(id) {
                    continue;
                }
                topology.vertex_index.insert(id, topology.vertices.len());
                topology.vertices.push(VertexShape {
                    id,
                    position,
                    tile: tile.id,
                    slot: k as u8,
                });
            }

            let quads = edge_quads(center, &self.params);
            for (k, (&id, quad)) in tile.edges.iter().zip(quads).enumerate() {
                if !claimed_edges.insert(id) {
                    continue;
                }
                topology.edge_index.insert(id, topology.edges.len());
                topology.edges.push(EdgeShape {
                    id,
                    quad,
                    tile: tile.id,
                    slot: k as u8,
                    endpoints: [tile.vertices[k], tile.vertices[(k + 1) % 6]],
                });
            }
        }

        tracing::debug!(
            "built topology: {} tiles, {} vertices, {} edges",
            topology.tiles.len(),
            topology.vertices.len(),
            topology.edges.len()
        );
        Ok(topology)
    }
}

fn validate_order(order: &[usize], len: usize) -> Result<(), TopologyError> {
    let mut seen = vec![false; len];
    for &slot in order {
        if slot >= len || seen[slot] {
            return Err(TopologyError::InvalidOrder(order.to_vec()));
        }
        seen[slot] = true;
    }
    if order.len() != len {
        return Err(TopologyError::InvalidOrder(order.to_vec()));
    }
    Ok(())
}

// ============================================================================
// NUMBERING
// ============================================================================

/// Global vertex and edge IDs for one grid slot
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotIds {
    pub vertices: [VertexId; 6],
    pub edges: [EdgeId; 6],
}

/// Number the vertices and edges of `grid` in first-seen order, starting at 1.
///
/// Corner `k` is shared with the neighbours in directions `k-1` and `k`;
/// side `k` faces direction `k`. This is the same slot convention the map
/// definitions use, which makes it usable for synthetic boards.
pub fn number_grid(grid: &[HexCoordinate]) -> Vec<SlotIds> {
    let mut vertex_ids: FxHashMap<[HexCoordinate; 3], VertexId> = FxHashMap::default();
    let mut edge_ids: FxHashMap<[HexCoordinate; 2], EdgeId> = FxHashMap::default();

    grid.iter()
        .map(|&hex| {
            let vertices = std::array::from_fn(|k| {
                let mut key = [hex, hex.neighbor((k as u8 + 5) % 6), hex.neighbor(k as u8)];
                key.sort_by_key(|h| (h.q, h.r));
                let next = vertex_ids.len() as VertexId + 1;
                *vertex_ids.entry(key).or_insert(next)
            });
            let edges = std::array::from_fn(|k| {
                let mut key = [hex, hex.neighbor(k as u8)];
                key.sort_by_key(|h| (h.q, h.r));
                let next = edge_ids.len() as EdgeId + 1;
                *edge_ids.entry(key).or_insert(next)
            });
            SlotIds { vertices, edges }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::base_grid;
    use crate::variant::demo_board;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params() -> GeometryParams {
        GeometryParams::new(64.0, 8.0).with_outer_padding(20.0)
    }

    #[test]
    fn test_base_board_counts() {
        let grid = base_grid();
        let board = demo_board(&grid);
        let topology = BoardTopologyBuilder::new(&grid, params()).build(&board).unwrap();
        assert_eq!(topology.tiles().len(), 19);
        assert_eq!(topology.vertices().len(), 54);
        assert_eq!(topology.edges().len(), 72);
    }

    #[test]
    fn test_one_primitive_per_id_for_any_order() {
        let grid = base_grid();
        let board = demo_board(&grid);
        let builder = BoardTopologyBuilder::new(&grid, params());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut order: Vec<usize> = (0..grid.len()).collect();

        for _ in 0..50 {
            order.shuffle(&mut rng);
            let topology = builder.build_in_order(&board, &order).unwrap();

            let mut seen = FxHashSet::default();
            for v in topology.vertices() {
                assert!(seen.insert(v.id), "vertex#{} registered twice", v.id);
            }
            let mut seen = FxHashSet::default();
            for e in topology.edges() {
                assert!(seen.insert(e.id), "edge#{} registered twice", e.id);
            }
            assert_eq!(topology.vertices().len(), 54);
            assert_eq!(topology.edges().len(), 72);
        }
    }

    #[test]
    fn test_positions_do_not_depend_on_claiming_tile() {
        let grid = base_grid();
        let board = demo_board(&grid);
        let builder = BoardTopologyBuilder::new(&grid, params());
        let forward = builder.build(&board).unwrap();
        let reversed: Vec<usize> = (0..grid.len()).rev().collect();
        let backward = builder.build_in_order(&board, &reversed).unwrap();

        for v in forward.vertices() {
            let other = backward.vertex(v.id).unwrap();
            assert!(v.position.approx_eq(other.position), "vertex#{}", v.id);
        }
        for e in forward.edges() {
            let other = backward.edge(e.id).unwrap();
            for p in e.quad {
                assert!(other.quad.iter().any(|q| q.approx_eq(p)), "edge#{}", e.id);
            }
        }
    }

    #[test]
    fn test_first_tile_claims_shared_ids() {
        let grid = base_grid();
        let board = demo_board(&grid);
        let topology = BoardTopologyBuilder::new(&grid, params()).build(&board).unwrap();
        for &id in &board[0].vertices {
            assert_eq!(topology.vertex(id).unwrap().tile, board[0].id);
        }
    }

    #[test]
    fn test_tile_count_mismatch() {
        let grid = base_grid();
        let board = demo_board(&grid);
        let err = BoardTopologyBuilder::new(&grid, params())
            .build(&board[..18])
            .unwrap_err();
        assert!(matches!(
            err,
            TopologyError::TileCountMismatch { expected: 19, actual: 18 }
        ));
    }

    #[test]
    fn test_invalid_order_rejected() {
        let grid = base_grid();
        let board = demo_board(&grid);
        let builder = BoardTopologyBuilder::new(&grid, params());
        let mut order: Vec<usize> = (0..grid.len()).collect();
        order[3] = 4;
        assert!(matches!(
            builder.build_in_order(&board, &order),
            Err(TopologyError::InvalidOrder(_))
        ));
    }

    #[test]
    fn test_number_grid_sharing() {
        let grid = base_grid();
        let slots = number_grid(&grid);
        let mut vertex_refs: FxHashMap<VertexId, usize> = FxHashMap::default();
        let mut edge_refs: FxHashMap<EdgeId, usize> = FxHashMap::default();
        for s in &slots {
            for v in s.vertices {
                *vertex_refs.entry(v).or_default() += 1;
            }
            for e in s.edges {
                *edge_refs.entry(e).or_default() += 1;
            }
        }
        assert!(vertex_refs.values().all(|&n| (1..=3).contains(&n)));
        assert!(edge_refs.values().all(|&n| (1..=2).contains(&n)));
        // centre tile: all six corners shared by three tiles
        let center = &slots[9];
        assert!(center.vertices.iter().all(|v| vertex_refs[v] == 3));
        assert!(center.edges.iter().all(|e| edge_refs[e] == 2));
    }

    #[test]
    fn test_set_blocked() {
        let grid = base_grid();
        let board = demo_board(&grid);
        let mut topology = BoardTopologyBuilder::new(&grid, params()).build(&board).unwrap();
        topology.set_blocked(&[board[4].id]);
        assert_eq!(topology.tiles().iter().filter(|t| t.blocked).count(), 1);
        assert!(topology.tile(board[4].id).unwrap().blocked);
    }
}
