//! Board command - build the drawable board for a map payload
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_payload(), build_primitives(), report()
//! - Level 3: geometry_params()
//! - Level 4: counting

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use settlers_client::ClientConfig;
use settlers_core::{
    board_primitives, Board, BoardTopologyBuilder, BoardVariant, GeometryParams, Layout, Port,
    PortPlacer, Primitive,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BoardArgs {
    /// start-game or hydrate message (or its bare payload)
    #[arg(long, value_name = "FILE")]
    pub map: PathBuf,

    /// Hexagon size in pixels; defaults to the variant's
    #[arg(long)]
    pub size: Option<f64>,

    /// Gap between tiles; defaults to size / 8
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Print the full primitive list as JSON
    #[arg(long)]
    pub json: bool,
}

/// The fields of a start-game or hydrate payload this command reads
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapPayload {
    #[serde(default)]
    map_name: Option<String>,
    map: Board,
    #[serde(default)]
    ports: Vec<Port>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run board command
///
/// 1. Load the payload
/// 2. Build topology, ports and primitives
/// 3. Report counts or the primitive list
pub fn run(args: BoardArgs, config: ClientConfig) -> Result<()> {
    let payload = load_payload(&args.map)?;
    let map_name = payload.map_name.clone().unwrap_or(config.map_name);
    let variant = BoardVariant::by_name(&map_name)?;
    let params = geometry_params(&variant, args.size, args.spacing);

    let (layout, primitives) = build_primitives(&variant, params, &payload)?;
    report(&variant, &layout, &primitives, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_payload(path: &Path) -> Result<MapPayload> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read map payload: {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;

    // accept a full {type, payload} message as well as the bare payload
    let payload = match value.get("payload") {
        Some(inner) if value.get("type").is_some() => inner.clone(),
        _ => value,
    };
    serde_json::from_value(payload).context("Payload has no usable `map`")
}

fn build_primitives(
    variant: &BoardVariant,
    params: GeometryParams,
    payload: &MapPayload,
) -> Result<(Layout, Vec<Primitive>)> {
    let grid = variant.grid();
    let topology = BoardTopologyBuilder::new(&grid, params).build(&payload.map)?;
    let ports = PortPlacer::new(&payload.map, &topology, params.spacing).place_all(&payload.ports);
    tracing::debug!("placed {} of {} ports", ports.len(), payload.ports.len());

    Ok((*topology.layout(), board_primitives(&topology, &ports)))
}

fn report(variant: &BoardVariant, layout: &Layout, primitives: &[Primitive], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(primitives)?);
        return Ok(());
    }

    println!("Variant: {}", variant.name);
    println!(
        "Surface: {:.1} x {:.1} (hex size {:.1}, spacing {:.1})",
        layout.surface_width(),
        layout.surface_height(),
        layout.params.hex_size,
        layout.params.spacing
    );
    for (kind, count) in count_by_kind(primitives) {
        println!("  {:<8} {}", kind, count);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Variant parameters with CLI overrides; padding scales with the size
fn geometry_params(variant: &BoardVariant, size: Option<f64>, spacing: Option<f64>) -> GeometryParams {
    let base = variant.params;
    match (size, spacing) {
        (None, None) => base,
        (size, spacing) => {
            let hex_size = size.unwrap_or(base.hex_size);
            let scale = hex_size / base.hex_size;
            GeometryParams::new(hex_size, spacing.unwrap_or(hex_size / 8.0))
                .with_outer_padding(base.outer_padding * scale)
                .with_edge_padding(base.edge_padding * scale)
        }
    }
}

// ============================================================================
// LEVEL 4 - COUNTING
// ============================================================================

fn count_by_kind(primitives: &[Primitive]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for primitive in primitives {
        *counts.entry(primitive.kind.as_str()).or_insert(0) += 1;
    }
    counts
}

// ============================================================================
// TESTS
// ============================================================================
