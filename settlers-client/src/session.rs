//! The client session: one writer, three suspension points
//!
//! A [`Session`] owns the state, the reconciler, the cached board scene, the
//! turn countdown and a renderer. It is driven either step by step
//! (`handle_text`, `on_tick`, `resize`, `select`) or by [`Session::run`],
//! which multiplexes inbound messages, resize notifications, pointer
//! selections and the one-second countdown tick.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;

use settlers_core::{PrimitiveKind, VariantError, Viewport};

use crate::clock::{Clock, SystemClock, TurnClock};
use crate::config::ClientConfig;
use crate::dirty::Region;
use crate::error::SceneError;
use crate::protocol::{Inbound, OutboundAction};
use crate::reconciler::Reconciler;
use crate::render::{paint, paint_hud_only, MapRenderer, RendererRegistry};
use crate::scene::BoardScene;
use crate::state::SessionState;

/// Receiving and sending halves a running session is wired to
#[derive(Debug)]
pub struct SessionChannels {
    /// Raw text frames from the transport
    pub inbound: mpsc::Receiver<String>,
    pub resizes: mpsc::Receiver<Viewport>,
    /// Pointer clicks on primitives
    pub selections: mpsc::Receiver<(PrimitiveKind, u32)>,
    pub outbound: mpsc::Sender<OutboundAction>,
}

pub struct Session<C: Clock = SystemClock> {
    config: ClientConfig,
    clock: C,
    state: SessionState,
    reconciler: Reconciler,
    scene: Option<BoardScene>,
    turn_clock: TurnClock,
    turn_revision: u64,
    renderer: Box<dyn MapRenderer>,
    /// Where a new renderer comes from when the match's map changes
    renderers: Option<Arc<RendererRegistry>>,
    renderer_map: Option<String>,
}

impl Session<SystemClock> {
    pub fn new(config: ClientConfig, user: impl Into<String>, renderer: Box<dyn MapRenderer>) -> Self {
        Self::with_clock(config, user, renderer, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(
        config: ClientConfig,
        user: impl Into<String>,
        renderer: Box<dyn MapRenderer>,
        clock: C,
    ) -> Self {
        Self {
            config,
            clock,
            state: SessionState::new(user),
            reconciler: Reconciler::new(),
            scene: None,
            turn_clock: TurnClock::new(),
            turn_revision: 0,
            renderer,
            renderers: None,
            renderer_map: None,
        }
    }

    /// Session whose renderer is picked by map name.
    ///
    /// Starts with the renderer for the configured map and swaps it whenever
    /// a start-game or hydrate names a different one.
    pub fn from_registry(
        config: ClientConfig,
        user: impl Into<String>,
        renderers: Arc<RendererRegistry>,
        clock: C,
    ) -> Result<Self, VariantError> {
        let renderer = renderers.create(&config.map_name)?;
        let map_name = config.map_name.clone();
        let mut session = Self::with_clock(config, user, renderer, clock);
        session.renderers = Some(renderers);
        session.renderer_map = Some(map_name);
        Ok(session)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn scene(&self) -> Option<&BoardScene> {
        self.scene.as_ref()
    }

    pub fn turn_clock(&self) -> &TurnClock {
        &self.turn_clock
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn renderer(&self) -> &dyn MapRenderer {
        self.renderer.as_ref()
    }

    /// Map the current renderer was created for, when it came from a registry
    pub fn renderer_map(&self) -> Option<&str> {
        self.renderer_map.as_deref()
    }

    /// Decode and apply one raw message. Malformed or unknown messages are
    /// logged and dropped without touching state.
    pub fn handle_text(&mut self, text: &str) -> Region {
        match Inbound::decode(text) {
            Ok(inbound) => self.handle(inbound),
            Err(e) => {
                tracing::warn!("dropping inbound message: {}", e);
                Region::empty()
            }
        }
    }

    /// Apply one decoded unit, then paint everything it made stale
    pub fn handle(&mut self, inbound: Inbound) -> Region {
        let now = self.clock.now();
        self.reconciler.apply(&mut self.state, inbound, now);

        let turn = &self.state.game.turn;
        if turn.revision != self.turn_revision {
            self.turn_revision = turn.revision;
            self.turn_clock.sync(turn.local_deadline, now);
            self.state.game.turn.seconds_left = self.turn_clock.displayed();
        }
        self.flush()
    }

    /// Countdown tick scheduled under `generation`; stale ticks do nothing
    pub fn on_tick(&mut self, generation: u64) -> Region {
        if generation != self.turn_clock.generation() {
            return Region::empty();
        }
        if self.turn_clock.tick(self.clock.now()) {
            self.state.game.turn.seconds_left = self.turn_clock.displayed();
            self.reconciler.mark(Region::TURN);
        }
        self.flush()
    }

    /// Delay to the next countdown tick, `None` when nothing is counting
    pub fn next_tick_delay(&self) -> Option<Duration> {
        self.turn_clock.next_tick_delay(self.clock.now())
    }

    /// Drop cached geometry for a new surface size and repaint everything
    pub fn resize(&mut self, viewport: Viewport) -> Region {
        self.config.viewport = Some(viewport);
        self.scene = None;
        self.reconciler.mark(Region::ALL);
        self.flush()
    }

    /// Turn a click on an enabled primitive into the matching action
    pub fn select(&self, kind: PrimitiveKind, id: u32) -> Option<OutboundAction> {
        let Some(scene) = &self.scene else {
            tracing::debug!("ignoring {} click before the board exists", kind.as_str());
            return None;
        };
        let Some(primitive) = scene.primitive(&self.state.game, kind, id) else {
            tracing::debug!("ignoring click on unknown {}#{}", kind.as_str(), id);
            return None;
        };
        if !primitive.enabled {
            tracing::debug!("ignoring click on disabled {}#{}", kind.as_str(), id);
            return None;
        }
        match kind {
            PrimitiveKind::Tile => Some(OutboundAction::TileClick { tile: id }),
            PrimitiveKind::Edge => Some(OutboundAction::EdgeClick { edge: id }),
            PrimitiveKind::Vertex => Some(OutboundAction::VertexClick { vertex: id }),
            PrimitiveKind::Port => None,
        }
    }

    /// Drain pending regions into the renderer, rebuilding the scene when the
    /// board itself changed
    fn flush(&mut self) -> Region {
        let regions = self.reconciler.drain();
        if regions.is_empty() {
            return regions;
        }

        if regions.contains(Region::MAP) || self.scene.is_none() {
            self.rebuild_scene();
        } else if regions.contains(Region::ROBBERS) {
            if let Some(scene) = &mut self.scene {
                scene.set_blocked(&self.state.game.blocked_tiles);
            }
        }

        match &self.scene {
            Some(scene) => paint(self.renderer.as_mut(), scene, &self.state, regions),
            None => paint_hud_only(self.renderer.as_mut(), &self.state, regions),
        }
        regions
    }

    fn rebuild_scene(&mut self) {
        if let Err(e) = self.switch_renderer() {
            tracing::warn!("cannot paint board: {}", e);
            self.scene = None;
            return;
        }
        self.scene = match BoardScene::build(&self.state.game, &self.config.map_name, self.config.viewport) {
            Ok(scene) => Some(scene),
            Err(SceneError::EmptyBoard) => None,
            Err(e) => {
                tracing::warn!("cannot build board: {}", e);
                None
            }
        };
    }

    /// Swap in the registered renderer for the match's map, if it changed
    fn switch_renderer(&mut self) -> Result<(), VariantError> {
        let Some(renderers) = &self.renderers else {
            return Ok(());
        };
        let map_name = if self.state.game.map_name.is_empty() {
            &self.config.map_name
        } else {
            &self.state.game.map_name
        };
        if self.renderer_map.as_deref() == Some(map_name.as_str()) {
            return Ok(());
        }
        self.renderer = renderers.create(map_name)?;
        tracing::debug!("switched renderer to {}", map_name);
        self.renderer_map = Some(map_name.clone());
        Ok(())
    }

    /// Run until the inbound channel closes or the outbound receiver is gone
    pub async fn run(&mut self, mut channels: SessionChannels) -> Result<()> {
        loop {
            let generation = self.turn_clock.generation();
            let tick = self.next_tick_delay();

            tokio::select! {
                message = channels.inbound.recv() => match message {
                    Some(text) => {
                        self.handle_text(&text);
                    }
                    None => {
                        tracing::info!("inbound channel closed");
                        break;
                    }
                },
                Some(viewport) = channels.resizes.recv() => {
                    self.resize(viewport);
                }
                Some((kind, id)) = channels.selections.recv() => {
                    if let Some(action) = self.select(kind, id) {
                        tracing::debug!("sending {}", action.kind());
                        if channels.outbound.send(action).await.is_err() {
                            tracing::info!("outbound channel closed");
                            break;
                        }
                    }
                }
                _ = sleep_or_pending(tick) => {
                    self.on_tick(generation);
                }
            }
        }
        Ok(())
    }
}

async fn sleep_or_pending(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending().await,
    }
}

impl<C: Clock> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.state.user)
            .field("phase", &self.state.phase)
            .field("scene", &self.scene.is_some())
            .field("turn_clock", &self.turn_clock)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::render::RecordingRenderer;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use settlers_core::{base_grid, demo_board};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session() -> (Session<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        let session = Session::with_clock(
            ClientConfig::default(),
            "ana",
            Box::new(RecordingRenderer::new()),
            clock.clone(),
        );
        (session, clock)
    }

    fn start_game() -> String {
        json!({
            "type": "room.start-game.success",
            "payload": {
                "roomStatus": "playing",
                "mapName": "base4",
                "map": demo_board(&base_grid()),
                "players": [{"name": "ana", "color": {"background": "#f00", "foreground": "#fff"}}],
                "ports": [],
                "resourceCount": {"ana": 0},
                "logs": []
            }
        })
        .to_string()
    }

    #[test]
    fn test_malformed_dropped() {
        let (mut session, _) = session();
        assert!(session.handle_text("{not json").is_empty());
        assert!(session.handle_text(r#"{"type":"match.update-weather","payload":{}}"#).is_empty());
        assert_eq!(
            serde_json::to_value(session.state()).unwrap(),
            serde_json::to_value(SessionState::new("ana")).unwrap()
        );
    }

    #[test]
    fn test_start_builds_scene() {
        let (mut session, _) = session();
        let regions = session.handle_text(&start_game());
        assert!(regions.contains(Region::MAP));
        assert!(session.scene().is_some());
    }

    #[test]
    fn test_select_requires_enabled() {
        let (mut session, _) = session();
        session.handle_text(&start_game());
        let edge = session.state().game.board[0].edges[0];
        assert!(session.select(PrimitiveKind::Edge, edge).is_none());

        session.handle_text(
            &json!({
                "type": "match.update-edges",
                "payload": {"availableEdges": [edge], "enabled": true, "highlight": true}
            })
            .to_string(),
        );
        assert_eq!(
            session.select(PrimitiveKind::Edge, edge),
            Some(OutboundAction::EdgeClick { edge })
        );
        assert!(session.select(PrimitiveKind::Edge, 99_999).is_none());
    }

    #[test]
    fn test_resize_marks_everything() {
        let (mut session, _) = session();
        session.handle_text(&start_game());
        let regions = session.resize(Viewport {
            width: 320.0,
            height: 240.0,
        });
        assert_eq!(regions, Region::ALL);
        let layout = session.scene().unwrap().topology().layout();
        assert!(layout.surface_width() <= 320.0 + 1e-9);
    }

    #[test]
    fn test_stale_tick_ignored() {
        let (mut session, clock) = session();
        let now = clock.now();
        session.handle_text(
            &json!({
                "type": "match.update-round-player",
                "payload": {
                    "player": "ana",
                    "deadline": now + chrono::Duration::seconds(30),
                    "serverNow": now
                }
            })
            .to_string(),
        );
        assert_eq!(session.turn_clock().displayed(), Some(30));

        let stale = session.turn_clock().generation() - 1;
        clock.advance(chrono::Duration::seconds(1));
        assert!(session.on_tick(stale).is_empty());
        let current = session.turn_clock().generation();
        assert_eq!(session.on_tick(current), Region::TURN);
        assert_eq!(session.turn_clock().displayed(), Some(29));
    }

    #[test]
    fn test_tick_changes_painted_turn() {
        let (mut session, clock) = session();
        let now = clock.now();
        session.handle_text(
            &json!({
                "type": "match.update-round-player",
                "payload": {
                    "player": "ana",
                    "deadline": now + chrono::Duration::seconds(30),
                    "serverNow": now
                }
            })
            .to_string(),
        );
        let before = serde_json::to_value(&session.state().game.turn).unwrap();
        assert_eq!(before["seconds_left"], 30);

        clock.advance(chrono::Duration::seconds(1));
        let generation = session.turn_clock().generation();
        assert_eq!(session.on_tick(generation), Region::TURN);
        let after = serde_json::to_value(&session.state().game.turn).unwrap();
        assert_ne!(before, after);
        assert_eq!(after["seconds_left"], 29);
    }

    fn registry(created: Arc<AtomicUsize>) -> Arc<RendererRegistry> {
        let factory = move || -> Box<dyn MapRenderer> {
            created.fetch_add(1, Ordering::SeqCst);
            Box::new(RecordingRenderer::new())
        };
        Arc::new(
            RendererRegistry::new()
                .with("base4", factory.clone())
                .with("lobby", factory),
        )
    }

    #[test]
    fn test_registry_rejects_unknown_map() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        let err = Session::from_registry(
            ClientConfig::default().with_map_name("seafarers"),
            "ana",
            registry(Arc::default()),
            clock,
        )
        .unwrap_err();
        assert!(matches!(err, VariantError::Unsupported(name) if name == "seafarers"));
    }

    #[test]
    fn test_renderer_follows_start_map() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        let created = Arc::new(AtomicUsize::new(0));
        let mut session = Session::from_registry(
            ClientConfig::default().with_map_name("lobby"),
            "ana",
            registry(created.clone()),
            clock,
        )
        .unwrap();
        assert_eq!(session.renderer_map(), Some("lobby"));

        session.handle_text(&start_game());
        assert_eq!(session.renderer_map(), Some("base4"));
        assert_eq!(created.load(Ordering::SeqCst), 2);
        assert!(session.scene().is_some());

        // same map again keeps the renderer
        session.handle_text(&start_game());
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unregistered_start_map_paints_no_board() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());
        let mut session =
            Session::from_registry(ClientConfig::default(), "ana", registry(Arc::default()), clock)
                .unwrap();

        let mut start: serde_json::Value = serde_json::from_str(&start_game()).unwrap();
        start["payload"]["mapName"] = json!("seafarers");
        let regions = session.handle_text(&start.to_string());
        assert!(regions.contains(Region::MAP));
        assert!(session.scene().is_none());
        assert_eq!(session.renderer_map(), Some("base4"));
    }

    #[tokio::test]
    async fn test_run_until_closed() {
        let (mut session, _) = session();
        let (in_tx, inbound) = mpsc::channel(8);
        let (_resize_tx, resizes) = mpsc::channel(1);
        let (_select_tx, selections) = mpsc::channel(1);
        let (outbound, _out_rx) = mpsc::channel(1);

        in_tx.send(start_game()).await.unwrap();
        drop(in_tx);
        session
            .run(SessionChannels {
                inbound,
                resizes,
                selections,
                outbound,
            })
            .await
            .unwrap();
        assert_eq!(session.state().game.board.len(), 19);
    }
}
