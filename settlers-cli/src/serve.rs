//! Serve command - start the viewer server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), load_preload(), start_server()
//! - Level 3: (delegated to settlers-viewer crate)
//! - Level 4: path checks

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use settlers_client::{ClientConfig, ReplayLog};
use settlers_viewer::{run_server, ServerConfig, ViewerState};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServeArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Directory containing static files for the front-end
    #[arg(long, default_value = "viewer/static")]
    pub static_dir: PathBuf,

    /// Message log to preload into the replay
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Local player name for the preloaded replay
    #[arg(long, default_value = "")]
    pub user: String,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run serve command
///
/// 1. Check paths and configure the server
/// 2. Load the replay log, if any
/// 3. Start server (blocking)
pub fn run(args: ServeArgs, config: ClientConfig) -> Result<()> {
    let server = configure_server(&args)?;
    let preload = load_preload(args.log.as_deref(), &args.user)?;

    tracing::info!(
        "Starting settlers viewer on port {} ({})",
        server.port,
        if preload.is_some() { "log preloaded" } else { "no log" }
    );

    start_server(server, Arc::new(ViewerState::new(config)), preload)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn configure_server(args: &ServeArgs) -> Result<ServerConfig> {
    check_front_end(&args.static_dir)?;
    if let Some(log) = &args.log {
        check_log_file(log)?;
    }

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
    })
}

fn load_preload(log: Option<&Path>, user: &str) -> Result<Option<(ReplayLog, String)>> {
    log.map(|path| ReplayLog::load(path).map(|log| (log, user.to_string())))
        .transpose()
}

/// Start the server (blocking)
fn start_server(
    config: ServerConfig,
    state: Arc<ViewerState>,
    preload: Option<(ReplayLog, String)>,
) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config, state, preload).await })
}

// ============================================================================
// LEVEL 4 - PATH CHECKS
// ============================================================================

/// The API works without a front-end, so a missing directory only warns
fn check_front_end(dir: &Path) -> Result<()> {
    if !dir.exists() {
        tracing::warn!("No front-end at {}; only /api routes will answer", dir.display());
    } else if !dir.is_dir() {
        anyhow::bail!("--static-dir must be a directory: {}", dir.display());
    }
    Ok(())
}

/// A preload has to be a readable file before the server binds
fn check_log_file(log: &Path) -> Result<()> {
    if !log.is_file() {
        anyhow::bail!("--log must point to a message log file: {}", log.display());
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("settlers-serve-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn args(static_dir: PathBuf, log: Option<PathBuf>) -> ServeArgs {
        ServeArgs {
            port: 9103,
            static_dir,
            log,
            user: "ana".to_string(),
        }
    }

    #[test]
    fn test_missing_front_end_still_serves() {
        let config = configure_server(&args(PathBuf::from("/nonexistent/web"), None)).unwrap();
        assert_eq!(config.port, 9103);
        assert_eq!(config.static_dir, "/nonexistent/web");
    }

    #[test]
    fn test_front_end_must_be_directory() {
        let file = scratch_dir().join("index.html");
        std::fs::write(&file, "<html></html>").unwrap();
        let err = configure_server(&args(file, None)).unwrap_err();
        assert!(err.to_string().contains("--static-dir"));
    }

    #[test]
    fn test_log_must_be_file() {
        let dir = scratch_dir();
        let err = configure_server(&args(dir.clone(), Some(dir))).unwrap_err();
        assert!(err.to_string().contains("--log"));

        let missing = Some(PathBuf::from("/nonexistent/game.jsonl"));
        assert!(configure_server(&args(PathBuf::from("web"), missing)).is_err());
    }

    #[test]
    fn test_preload_pairs_log_with_user() {
        let log = scratch_dir().join("preload.jsonl");
        std::fs::write(&log, "{\"type\":\"match.update-logs\",\"payload\":[]}\n").unwrap();

        let (replay, user) = load_preload(Some(&log), "ana").unwrap().unwrap();
        assert_eq!(replay.len(), 1);
        assert_eq!(user, "ana");
        assert!(load_preload(None, "ana").unwrap().is_none());
    }
}
