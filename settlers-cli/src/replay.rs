//! Replay command - feed a recorded log through a client session
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: replay_log(), report()
//! - Level 3: message_type()
//! - Level 4: formatting

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use serde::Serialize;

use settlers_client::{
    ClientConfig, Envelope, ManualClock, MapRenderer, RecordingRenderer, RendererRegistry,
    ReplayLog, Session,
};
use settlers_core::BoardVariant;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON-lines message log
    #[arg(long, value_name = "FILE")]
    pub log: PathBuf,

    /// Name of the local player
    #[arg(long, default_value = "")]
    pub user: String,

    /// Output one JSON object per message
    #[arg(long)]
    pub json: bool,
}

/// What one message did
#[derive(Clone, Debug, Serialize)]
struct Step {
    index: usize,
    #[serde(rename = "type")]
    kind: String,
    regions: Vec<&'static str>,
}

/// Whole-run summary
#[derive(Clone, Debug, Serialize)]
struct Summary {
    messages: usize,
    ignored: usize,
    phase: String,
    round: String,
    players: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run replay command
///
/// 1. Load the log
/// 2. Apply every message, recording the regions each one repainted
/// 3. Report steps and summary
pub fn run(args: ReplayArgs, config: ClientConfig) -> Result<()> {
    let log = ReplayLog::load(&args.log)?;
    tracing::info!("Replaying {} messages from {}", log.len(), args.log.display());

    let (steps, summary) = replay_log(&log, &args.user, config)?;
    report(&steps, &summary, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn replay_log(log: &ReplayLog, user: &str, config: ClientConfig) -> Result<(Vec<Step>, Summary)> {
    let clock = ManualClock::new(log.started_at().unwrap_or_else(Utc::now));
    let mut session = Session::from_registry(config, user, Arc::new(recording_renderers()), clock)?;

    let steps: Vec<Step> = log
        .messages()
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let regions = session.handle_text(message);
            Step {
                index,
                kind: message_type(message),
                regions: regions.names(),
            }
        })
        .collect();

    let state = session.state();
    let summary = Summary {
        messages: steps.len(),
        ignored: steps.iter().filter(|s| s.regions.is_empty()).count(),
        phase: format!("{:?}", state.phase),
        round: state.game.round.name().to_string(),
        players: state.game.players.len(),
    };
    Ok((steps, summary))
}

fn report(steps: &[Step], summary: &Summary, json: bool) -> Result<()> {
    if json {
        for step in steps {
            println!("{}", serde_json::to_string(step)?);
        }
        println!("{}", serde_json::to_string(summary)?);
        return Ok(());
    }

    for step in steps {
        println!(
            "{:>5}  {:<36} {}",
            step.index,
            step.kind,
            format_regions(&step.regions)
        );
    }
    println!();
    println!(
        "{} messages, {} ignored; phase {}, round {}, {} players",
        summary.messages, summary.ignored, summary.phase, summary.round, summary.players
    );
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// A tracing renderer for every known board variant
fn recording_renderers() -> RendererRegistry {
    BoardVariant::names()
        .iter()
        .fold(RendererRegistry::new(), |registry, &name| {
            registry.with(name, || -> Box<dyn MapRenderer> { Box::new(RecordingRenderer::new()) })
        })
}

/// The envelope type, or a marker for undecodable lines
fn message_type(message: &str) -> String {
    serde_json::from_str::<Envelope>(message)
        .map(|envelope| envelope.kind)
        .unwrap_or_else(|_| "<malformed>".to_string())
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn format_regions(regions: &[&str]) -> String {
    if regions.is_empty() {
        "-".to_string()
    } else {
        regions.join(",")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type() {
        assert_eq!(message_type(r#"{"type":"match.update-pass","payload":{}}"#), "match.update-pass");
        assert_eq!(message_type("nope"), "<malformed>");
    }

    #[test]
    fn test_replay_counts_ignored() {
        let log = ReplayLog::parse(
            "{\"type\":\"match.update-pass\",\"payload\":{\"enabled\":true}}\nnot json\n{\"type\":\"match.update-weather\",\"payload\":{}}\n",
        );
        let (steps, summary) = replay_log(&log, "ana", ClientConfig::default()).unwrap();
        assert_eq!(steps[0].regions, vec!["passAction"]);
        assert_eq!(summary.messages, 3);
        assert_eq!(summary.ignored, 2);
        assert_eq!(summary.phase, "Match");
    }

    #[test]
    fn test_unknown_configured_map_fails() {
        let log = ReplayLog::parse("{\"type\":\"match.update-pass\",\"payload\":{}}");
        let config = ClientConfig::default().with_map_name("seafarers");
        let err = replay_log(&log, "ana", config).unwrap_err();
        assert!(err.to_string().contains("seafarers"));
    }

    #[test]
    fn test_format_regions() {
        assert_eq!(format_regions(&[]), "-");
        assert_eq!(format_regions(&["dice", "hand"]), "dice,hand");
    }
}
