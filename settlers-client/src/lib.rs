//! Settlers client session
//!
//! Decodes the server's event stream, reconciles it into a canonical
//! [`SessionState`], tracks which UI regions went stale and hands them to a
//! [`MapRenderer`] once per inbound unit.
//!
//! # Modules
//!
//! - [`protocol`]: inbound events and outbound actions on the `{type, payload}` envelope
//! - [`reconciler`]: the single writer of session state
//! - [`dirty`]: region flags and the drain-once scheduler
//! - [`clock`]: skew-corrected turn countdown
//! - [`scene`] / [`render`]: cached board geometry and the renderer capability
//! - [`session`]: the event loop tying it all together

pub mod clock;
pub mod config;
pub mod dirty;
pub mod error;
pub mod identity;
pub mod phase;
pub mod protocol;
pub mod reconciler;
pub mod render;
pub mod replay;
pub mod scene;
pub mod session;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock, TurnClock};
pub use config::ClientConfig;
pub use dirty::{DirtyScheduler, Region};
pub use error::{ProtocolError, SceneError, SessionError};
pub use identity::SessionIdentity;
pub use phase::RoundPhase;
pub use protocol::{Envelope, Inbound, InboundEvent, OutboundAction, Phase};
pub use reconciler::Reconciler;
pub use render::{paint, MapRenderer, RecordingRenderer, RendererRegistry};
pub use replay::ReplayLog;
pub use scene::BoardScene;
pub use session::{Session, SessionChannels};
pub use state::{MatchReport, MatchState, SessionState};
