//! Viewer state
//!
//! A replay drives one client [`Session`] over a recorded log; its renderer
//! paints into the shared [`Frame`] the HTTP handlers read. The session clock
//! follows the times recorded in the log, so countdowns run as they did live.

use std::sync::{Arc, Mutex, MutexGuard, RwLockReadGuard};

use chrono::Utc;

use settlers_client::{
    Clock, ClientConfig, ManualClock, MapRenderer, Region, RendererRegistry, ReplayLog, Session,
};
use settlers_core::{BoardVariant, VariantError};

use crate::renderer::{Frame, FrameRenderer, SharedFrame};

/// A log being stepped through
pub struct Replay {
    log: ReplayLog,
    position: usize,
    user: String,
    config: ClientConfig,
    renderers: Arc<RendererRegistry>,
    clock: ManualClock,
    session: Session<ManualClock>,
    frame: SharedFrame,
}

impl Replay {
    pub fn new(
        log: ReplayLog,
        user: impl Into<String>,
        config: ClientConfig,
        renderers: Arc<RendererRegistry>,
        frame: SharedFrame,
    ) -> Result<Self, VariantError> {
        let user = user.into();
        let clock = start_clock(&log);
        let session =
            Session::from_registry(config.clone(), user.clone(), renderers.clone(), clock.clone())?;
        Ok(Self {
            log,
            position: 0,
            user,
            config,
            renderers,
            clock,
            session,
            frame,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.log.len()
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.log.len()
    }

    pub fn session(&self) -> &Session<ManualClock> {
        &self.session
    }

    /// Apply the next message; `None` at the end of the log.
    ///
    /// A recorded time moves the clock forward first and ticks the countdown.
    pub fn step(&mut self) -> Option<Region> {
        let message = self.log.messages().get(self.position)?;
        let mut regions = Region::empty();
        if let Some(at) = self.log.received_at(self.position) {
            if at > self.clock.now() {
                self.clock.set(at);
            }
            let generation = self.session.turn_clock().generation();
            regions |= self.session.on_tick(generation);
        }
        regions |= self.session.handle_text(message);
        self.position += 1;
        Some(regions)
    }

    /// Move to `target` messages applied, replaying from the start when
    /// going backwards
    pub fn seek(&mut self, target: usize) -> Result<(), VariantError> {
        let target = target.min(self.log.len());
        if target < self.position {
            self.rewind()?;
        }
        while self.position < target && self.step().is_some() {}
        Ok(())
    }

    pub fn rewind(&mut self) -> Result<(), VariantError> {
        clear(&self.frame);
        self.clock = start_clock(&self.log);
        self.session = Session::from_registry(
            self.config.clone(),
            self.user.clone(),
            self.renderers.clone(),
            self.clock.clone(),
        )?;
        self.position = 0;
        Ok(())
    }
}

/// Clock at the first recorded time, or now for logs without times
fn start_clock(log: &ReplayLog) -> ManualClock {
    ManualClock::new(log.started_at().unwrap_or_else(Utc::now))
}

fn clear(frame: &SharedFrame) {
    *frame.write().unwrap_or_else(|e| e.into_inner()) = Frame::default();
}

/// A frame renderer for every known board variant
fn frame_renderers(frame: &SharedFrame) -> RendererRegistry {
    BoardVariant::names()
        .iter()
        .fold(RendererRegistry::new(), |registry, &name| {
            let frame = frame.clone();
            registry.with(name, move || -> Box<dyn MapRenderer> {
                Box::new(FrameRenderer::new(frame.clone()))
            })
        })
}

/// Server-wide shared state
pub struct ViewerState {
    pub config: ClientConfig,
    pub frame: SharedFrame,
    pub renderers: Arc<RendererRegistry>,
    pub replay: Mutex<Option<Replay>>,
}

impl ViewerState {
    pub fn new(config: ClientConfig) -> Self {
        let frame = SharedFrame::default();
        let renderers = Arc::new(frame_renderers(&frame));
        Self {
            config,
            frame,
            renderers,
            replay: Mutex::new(None),
        }
    }

    /// Start replaying `log` as `user`, discarding any previous replay
    pub fn load(&self, log: ReplayLog, user: &str) -> Result<usize, VariantError> {
        let replay = Replay::new(
            log,
            user,
            self.config.clone(),
            self.renderers.clone(),
            self.frame.clone(),
        )?;
        clear(&self.frame);
        let total = replay.total();
        *self.replay() = Some(replay);
        Ok(total)
    }

    /// Drop the replay and blank the frame
    pub fn stop(&self) {
        self.replay().take();
        clear(&self.frame);
    }

    pub fn replay(&self) -> MutexGuard<'_, Option<Replay>> {
        self.replay.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn frame(&self) -> RwLockReadGuard<'_, Frame> {
        self.frame.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use settlers_core::{base_grid, demo_board};

    fn start() -> serde_json::Value {
        json!({
            "type": "room.start-game.success",
            "payload": {
                "mapName": "base4",
                "map": demo_board(&base_grid()),
                "players": [{"name": "ana", "color": {"background": "#f00", "foreground": "#fff"}}]
            }
        })
    }

    fn log() -> ReplayLog {
        let logs = json!({"type": "match.update-logs", "payload": ["ana built a road"]});
        let dice = json!({"type": "match.update-dice", "payload": {"dice": [2, 5]}});
        ReplayLog::from_messages(vec![start().to_string(), logs.to_string(), dice.to_string()])
    }

    #[test]
    fn test_step_and_seek() {
        let state = ViewerState::default();
        assert_eq!(state.load(log(), "ana").unwrap(), 3);

        let mut guard = state.replay();
        let replay = guard.as_mut().unwrap();
        assert!(replay.step().unwrap().contains(Region::MAP));
        assert_eq!(state.frame().tiles.len(), 19);

        replay.seek(3).unwrap();
        assert!(replay.at_end());
        assert!(replay.step().is_none());
        assert_eq!(state.frame().hud["dice"], json!([2, 5]));

        replay.seek(1).unwrap();
        assert_eq!(replay.position(), 1);
        assert!(!state.frame().hud.contains_key("dice"));
    }

    #[test]
    fn test_unknown_map_rejected() {
        let state = ViewerState::new(ClientConfig::default().with_map_name("seafarers"));
        assert!(matches!(
            state.load(log(), "ana"),
            Err(VariantError::Unsupported(name)) if name == "seafarers"
        ));
        assert!(state.replay().is_none());
    }

    #[test]
    fn test_countdown_follows_recorded_time() {
        let turn = json!({
            "type": "match.update-round-player",
            "payload": {
                "player": "ana",
                "deadline": "2024-05-01T10:00:30Z",
                "serverNow": "2024-05-01T10:00:00Z"
            }
        });
        let later = json!({
            "type": "match.update-logs",
            "payload": ["bo rolled 8"],
            "receivedAt": "2024-05-01T10:00:05Z"
        });
        let log = ReplayLog::from_messages(vec![start().to_string(), turn.to_string(), later.to_string()]);

        let state = ViewerState::default();
        state.load(log, "ana").unwrap();
        let mut guard = state.replay();
        let replay = guard.as_mut().unwrap();

        replay.seek(2).unwrap();
        assert_eq!(replay.session().state().game.turn.seconds_left, Some(30));
        assert_eq!(state.frame().hud["turn"]["secondsLeft"], 30);

        let regions = replay.step().unwrap();
        assert!(regions.contains(Region::TURN | Region::LOGS));
        assert_eq!(replay.session().state().game.turn.seconds_left, Some(25));
        assert_eq!(state.frame().hud["turn"]["secondsLeft"], 25);

        replay.seek(2).unwrap();
        assert_eq!(replay.session().state().game.turn.seconds_left, Some(30));
    }
}
