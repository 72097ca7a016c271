//! Render boundary
//!
//! A renderer is a capability, not a base class: anything implementing
//! [`MapRenderer`] can paint a board. Board layouts register a constructor in
//! a [`RendererRegistry`] under their map name.

use rustc_hash::FxHashMap;

use settlers_core::{BuildingKind, Primitive, TileId, VariantError};

use crate::dirty::Region;
use crate::scene::BoardScene;
use crate::state::SessionState;

/// Paints primitives and HUD regions
pub trait MapRenderer: Send {
    /// Draw a fresh board: tiles and ports
    fn render(&mut self, tiles: &[Primitive], ports: &[Primitive]);

    /// Edge availability changed
    fn update_edges(&mut self, edges: &[Primitive]);

    /// Vertex availability changed
    fn update_vertices(&mut self, vertices: &[Primitive]);

    /// Tile click targets changed
    fn update_tiles(&mut self, tiles: &[Primitive]);

    fn update_roads(&mut self, roads: &[Primitive]);

    fn update_settlements(&mut self, settlements: &[Primitive]);

    fn update_cities(&mut self, cities: &[Primitive]);

    fn update_robbers(&mut self, blocked: &[TileId]);

    /// Repaint one non-board region
    fn paint_hud(&mut self, region: Region, state: &SessionState);
}

/// Constructor stored in the registry
pub type RendererFactory = Box<dyn Fn() -> Box<dyn MapRenderer> + Send + Sync>;

/// Map name -> renderer constructor
#[derive(Default)]
pub struct RendererRegistry {
    factories: FxHashMap<String, RendererFactory>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor; a later registration for the same name wins
    pub fn register<F>(&mut self, map_name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn MapRenderer> + Send + Sync + 'static,
    {
        self.factories.insert(map_name.into(), Box::new(factory));
    }

    pub fn with<F>(mut self, map_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn MapRenderer> + Send + Sync + 'static,
    {
        self.register(map_name, factory);
        self
    }

    pub fn create(&self, map_name: &str) -> Result<Box<dyn MapRenderer>, VariantError> {
        self.factories
            .get(map_name)
            .map(|factory| factory())
            .ok_or_else(|| VariantError::Unsupported(map_name.to_string()))
    }

    pub fn contains(&self, map_name: &str) -> bool {
        self.factories.contains_key(map_name)
    }

    /// Registered map names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("maps", &self.names())
            .finish()
    }
}

/// Hand a drained region set to a renderer.
///
/// Board regions become primitive updates, everything else goes to
/// `paint_hud` one region at a time. `MAP` implies a full board repaint.
pub fn paint(
    renderer: &mut dyn MapRenderer,
    scene: &BoardScene,
    state: &SessionState,
    regions: Region,
) {
    let game = &state.game;
    let regions = if regions.contains(Region::MAP) {
        renderer.render(&scene.tile_primitives(game), &scene.port_primitives());
        regions | Region::BOARD | Region::ROBBER_MOVEMENT
    } else {
        regions
    };

    if regions.intersects(Region::ROBBERS | Region::ROBBER_MOVEMENT) {
        renderer.update_tiles(&scene.tile_primitives(game));
    }
    if regions.contains(Region::ROBBERS) {
        renderer.update_robbers(&game.blocked_tiles);
    }
    if regions.intersects(Region::EDGES | Region::ROADS) {
        renderer.update_edges(&scene.edge_primitives(game));
    }
    if regions.contains(Region::ROADS) {
        renderer.update_roads(&scene.road_primitives(game));
    }
    if regions.intersects(Region::VERTICES | Region::SETTLEMENTS | Region::CITIES) {
        renderer.update_vertices(&scene.vertex_primitives(game));
    }
    if regions.contains(Region::SETTLEMENTS) {
        renderer.update_settlements(&scene.building_primitives(game, BuildingKind::Settlement));
    }
    if regions.contains(Region::CITIES) {
        renderer.update_cities(&scene.building_primitives(game, BuildingKind::City));
    }

    for region in (regions - Region::BOARD - Region::ROBBER_MOVEMENT).regions() {
        renderer.paint_hud(region, state);
    }
}

/// Paint HUD regions only, for when no board exists yet
pub fn paint_hud_only(renderer: &mut dyn MapRenderer, state: &SessionState, regions: Region) {
    for region in (regions - Region::BOARD - Region::ROBBER_MOVEMENT).regions() {
        renderer.paint_hud(region, state);
    }
}

/// Renderer that records every call; used by the CLI replay and tests
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, call: impl Into<String>) {
        let call = call.into();
        tracing::debug!("render: {}", call);
        self.calls.push(call);
    }
}

impl MapRenderer for RecordingRenderer {
    fn render(&mut self, tiles: &[Primitive], ports: &[Primitive]) {
        self.record(format!("render tiles={} ports={}", tiles.len(), ports.len()));
    }

    fn update_edges(&mut self, edges: &[Primitive]) {
        let enabled = edges.iter().filter(|e| e.enabled).count();
        self.record(format!("edges enabled={}", enabled));
    }

    fn update_vertices(&mut self, vertices: &[Primitive]) {
        let enabled = vertices.iter().filter(|v| v.enabled).count();
        self.record(format!("vertices enabled={}", enabled));
    }

    fn update_tiles(&mut self, tiles: &[Primitive]) {
        let enabled = tiles.iter().filter(|t| t.enabled).count();
        self.record(format!("tiles enabled={}", enabled));
    }

    fn update_roads(&mut self, roads: &[Primitive]) {
        self.record(format!("roads {}", roads.len()));
    }

    fn update_settlements(&mut self, settlements: &[Primitive]) {
        self.record(format!("settlements {}", settlements.len()));
    }

    fn update_cities(&mut self, cities: &[Primitive]) {
        self.record(format!("cities {}", cities.len()));
    }

    fn update_robbers(&mut self, blocked: &[TileId]) {
        self.record(format!("robbers {:?}", blocked));
    }

    fn paint_hud(&mut self, region: Region, _state: &SessionState) {
        self.record(format!("hud {}", region.names().join(",")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MatchState;
    use settlers_core::{base_grid, demo_board};

    fn scene_and_state() -> (BoardScene, SessionState) {
        let mut state = SessionState::new("ana");
        state.game = MatchState {
            map_name: "base4".to_string(),
            board: demo_board(&base_grid()),
            ..MatchState::default()
        };
        let scene = BoardScene::build(&state.game, "base4", None).unwrap();
        (scene, state)
    }

    #[test]
    fn test_registry_lookup() {
        let registry = RendererRegistry::new().with("base4", || Box::new(RecordingRenderer::new()));
        assert!(registry.create("base4").is_ok());
        assert!(matches!(
            registry.create("seafarers"),
            Err(VariantError::Unsupported(name)) if name == "seafarers"
        ));
        assert_eq!(registry.names(), vec!["base4"]);
    }

    #[test]
    fn test_map_region_repaints_board() {
        let (scene, state) = scene_and_state();
        let mut renderer = RecordingRenderer::new();
        paint(&mut renderer, &scene, &state, Region::MAP);
        assert_eq!(renderer.calls[0], "render tiles=19 ports=0");
        assert!(renderer.calls.iter().any(|c| c.starts_with("edges")));
        assert!(renderer.calls.iter().any(|c| c.starts_with("robbers")));
        assert!(!renderer.calls.iter().any(|c| c.starts_with("hud")));
    }

    #[test]
    fn test_hud_regions_painted_once_each() {
        let (scene, state) = scene_and_state();
        let mut renderer = RecordingRenderer::new();
        paint(&mut renderer, &scene, &state, Region::HAND | Region::DICE | Region::ROADS);
        assert_eq!(
            renderer.calls,
            vec![
                "edges enabled=0".to_string(),
                "roads 0".to_string(),
                "hud hand".to_string(),
                "hud dice".to_string(),
            ]
        );
    }
}
