//! Cached board geometry for the current match
//!
//! Built once per board and viewport. Flag composition (which primitives
//! are clickable, owned or greyed out) is recomputed from [`MatchState`] on
//! every paint, the geometry is not.

use settlers_core::{
    board_primitives, BoardTopology, BoardTopologyBuilder, BoardVariant, BuildingKind,
    PortPlacement, PortPlacer, Primitive, PrimitiveKind, TileId, Viewport,
};

use crate::error::SceneError;
use crate::state::MatchState;

/// Topology, placed ports and their unflagged primitives
#[derive(Clone, Debug)]
pub struct BoardScene {
    variant: BoardVariant,
    topology: BoardTopology,
    ports: Vec<PortPlacement>,
    base: Vec<Primitive>,
}

impl BoardScene {
    /// Build from the match's board. The variant comes from the match's map
    /// name, or `fallback_map` before the server named one.
    pub fn build(
        game: &MatchState,
        fallback_map: &str,
        viewport: Option<Viewport>,
    ) -> Result<Self, SceneError> {
        if game.board.is_empty() {
            return Err(SceneError::EmptyBoard);
        }
        let name = if game.map_name.is_empty() {
            fallback_map
        } else {
            game.map_name.as_str()
        };
        let variant = BoardVariant::by_name(name)?;
        let grid = variant.grid();
        let params = match viewport {
            Some(viewport) => variant.params.fit(viewport, &grid),
            None => variant.params,
        };

        let topology = BoardTopologyBuilder::new(&grid, params).build(&game.board)?;
        let ports = PortPlacer::new(&game.board, &topology, params.spacing).place_all(&game.ports);
        let base = board_primitives(&topology, &ports);

        tracing::debug!(
            "built {} scene: {} primitives, {} of {} ports placed",
            variant.name,
            base.len(),
            ports.len(),
            game.ports.len()
        );
        Ok(Self {
            variant,
            topology,
            ports,
            base,
        })
    }

    pub fn variant(&self) -> &BoardVariant {
        &self.variant
    }

    pub fn topology(&self) -> &BoardTopology {
        &self.topology
    }

    pub fn ports(&self) -> &[PortPlacement] {
        &self.ports
    }

    /// Move robber markers; geometry is untouched
    pub fn set_blocked(&mut self, blocked: &[TileId]) {
        self.topology.set_blocked(blocked);
    }

    fn base_of(&self, kind: PrimitiveKind) -> impl Iterator<Item = &Primitive> {
        self.base.iter().filter(move |p| p.kind == kind)
    }

    /// Tiles with robber targets enabled and robber tiles marked owned
    pub fn tile_primitives(&self, game: &MatchState) -> Vec<Primitive> {
        self.base_of(PrimitiveKind::Tile)
            .map(|p| self.decorate(p.clone(), game))
            .collect()
    }

    pub fn port_primitives(&self) -> Vec<Primitive> {
        self.base_of(PrimitiveKind::Port).cloned().collect()
    }

    /// Every edge with availability and road ownership applied
    pub fn edge_primitives(&self, game: &MatchState) -> Vec<Primitive> {
        self.base_of(PrimitiveKind::Edge)
            .map(|p| self.decorate(p.clone(), game))
            .collect()
    }

    /// Every vertex with availability and building ownership applied
    pub fn vertex_primitives(&self, game: &MatchState) -> Vec<Primitive> {
        self.base_of(PrimitiveKind::Vertex)
            .map(|p| self.decorate(p.clone(), game))
            .collect()
    }

    /// Edges carrying a road. IDs without a primitive are logged and skipped.
    pub fn road_primitives(&self, game: &MatchState) -> Vec<Primitive> {
        game.roads
            .keys()
            .filter_map(|&id| self.lookup(game, PrimitiveKind::Edge, id))
            .collect()
    }

    /// Vertices carrying a building of `kind`
    pub fn building_primitives(&self, game: &MatchState, kind: BuildingKind) -> Vec<Primitive> {
        let buildings = match kind {
            BuildingKind::Settlement => &game.settlements,
            BuildingKind::City => &game.cities,
            BuildingKind::None => return Vec::new(),
        };
        buildings
            .keys()
            .filter(|&&id| game.building_at(id) == kind)
            .filter_map(|&id| self.lookup(game, PrimitiveKind::Vertex, id))
            .collect()
    }

    /// One flagged primitive, `None` when the ID has none
    pub fn primitive(&self, game: &MatchState, kind: PrimitiveKind, id: u32) -> Option<Primitive> {
        self.base
            .iter()
            .find(|p| p.kind == kind && p.id == id)
            .map(|p| self.decorate(p.clone(), game))
    }

    fn lookup(&self, game: &MatchState, kind: PrimitiveKind, id: u32) -> Option<Primitive> {
        let found = self.primitive(game, kind, id);
        if found.is_none() {
            tracing::error!("no {} primitive registered for id {}", kind.as_str(), id);
        }
        found
    }

    fn decorate(&self, primitive: Primitive, game: &MatchState) -> Primitive {
        let id = primitive.id;
        let (enabled, owner) = match primitive.kind {
            PrimitiveKind::Tile => {
                let blocked = self.topology.tile(id).map(|t| t.blocked).unwrap_or(false);
                return primitive.with_state(game.robber.is_selectable(id), blocked);
            }
            PrimitiveKind::Edge => (game.edges.is_selectable(id), game.road_owner(id)),
            PrimitiveKind::Vertex => (game.vertices.is_selectable(id), game.vertex_owner(id)),
            PrimitiveKind::Port => return primitive,
        };

        let primitive = primitive.with_state(enabled, owner.is_some());
        match owner.map(|name| (name, game.color_of(name))) {
            Some((_, Some(color))) => primitive.with_fill(color.background.clone()),
            Some((name, None)) => {
                tracing::warn!("{} owns {}#{} but is not a player", name, primitive.kind.as_str(), id);
                primitive
            }
            None => primitive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settlers_core::{base_grid, demo_board, Building, ColorPair, Player, Port};

    fn game() -> MatchState {
        let board = demo_board(&base_grid());
        let last = &board[18];
        let ports = vec![Port {
            kind: "Ore".to_string(),
            vertices: [last.vertices[2], last.vertices[3]],
        }];
        MatchState {
            map_name: "base4".to_string(),
            board,
            ports,
            players: vec![Player {
                name: "ana".to_string(),
                color: ColorPair {
                    background: "#f00".to_string(),
                    foreground: "#fff".to_string(),
                },
            }],
            ..MatchState::default()
        }
    }

    fn building(id: u32, owner: &str) -> Building {
        Building {
            id,
            owner: owner.to_string(),
        }
    }

    #[test]
    fn test_build_counts() {
        let scene = BoardScene::build(&game(), "base4", None).unwrap();
        assert_eq!(scene.tile_primitives(&game()).len(), 19);
        assert_eq!(scene.edge_primitives(&game()).len(), 72);
        assert_eq!(scene.vertex_primitives(&game()).len(), 54);
        assert_eq!(scene.port_primitives().len(), 1);
    }

    #[test]
    fn test_empty_board_rejected() {
        let err = BoardScene::build(&MatchState::default(), "base4", None).unwrap_err();
        assert!(matches!(err, SceneError::EmptyBoard));
    }

    #[test]
    fn test_unknown_map_rejected() {
        let mut game = game();
        game.map_name = "seafarers".to_string();
        assert!(matches!(
            BoardScene::build(&game, "base4", None),
            Err(SceneError::Variant(_))
        ));
    }

    #[test]
    fn test_flags_follow_state() {
        let mut game = game();
        let scene = BoardScene::build(&game, "base4", None).unwrap();
        let edge = game.board[0].edges[0];
        let vertex = game.board[0].vertices[0];

        game.edges.available = vec![edge];
        game.edges.enabled = true;
        let p = scene.primitive(&game, PrimitiveKind::Edge, edge).unwrap();
        assert!(p.enabled && !p.disabled && !p.owned);

        game.roads.insert(edge, building(edge, "ana"));
        game.edges.enabled = false;
        let p = scene.primitive(&game, PrimitiveKind::Edge, edge).unwrap();
        assert!(p.owned && !p.enabled);
        assert_eq!(p.fill.as_deref(), Some("#f00"));

        let p = scene.primitive(&game, PrimitiveKind::Vertex, vertex).unwrap();
        assert!(p.disabled);
    }

    #[test]
    fn test_missing_ids_skipped() {
        let mut game = game();
        let scene = BoardScene::build(&game, "base4", None).unwrap();
        let vertex = game.board[4].vertices[1];
        game.settlements.insert(vertex, building(vertex, "ana"));
        game.settlements.insert(9_999, building(9_999, "ana"));
        game.cities.insert(vertex, building(vertex, "ana"));

        assert!(scene.building_primitives(&game, BuildingKind::Settlement).is_empty());
        assert_eq!(scene.building_primitives(&game, BuildingKind::City).len(), 1);
        assert!(scene.primitive(&game, PrimitiveKind::Vertex, 9_999).is_none());
    }

    #[test]
    fn test_viewport_fit() {
        let viewport = Viewport {
            width: 300.0,
            height: 300.0,
        };
        let scene = BoardScene::build(&game(), "base4", Some(viewport)).unwrap();
        let layout = scene.topology().layout();
        assert!(layout.surface_width() <= 300.0 + 1e-9);
        assert!(layout.surface_height() <= 300.0 + 1e-9);
    }
}
