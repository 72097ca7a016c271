//! Tagged drawables handed to a renderer
//!
//! The topology and port placer produce geometry; the client decides which
//! primitives are clickable or owned and fills in the flags before painting.

use serde::{Deserialize, Serialize};

use crate::geometry::{Hexagon, Point, Quad};
use crate::model::TileKind;
use crate::ports::PortPlacement;
use crate::topology::BoardTopology;

/// What a primitive represents on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Tile,
    Vertex,
    Edge,
    Port,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Tile => "tile",
            PrimitiveKind::Vertex => "vertex",
            PrimitiveKind::Edge => "edge",
            PrimitiveKind::Port => "port",
        }
    }
}

/// Pixel geometry of a primitive
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Geometry {
    Hexagon {
        center: Point,
        corners: Hexagon,
        resource: TileKind,
        token: u8,
        blocked: bool,
    },
    Point {
        position: Point,
    },
    Quad {
        corners: Quad,
    },
    Arc {
        start: Point,
        end: Point,
        radius: f64,
        label: Point,
        angle: f64,
        port: String,
    },
}

/// One drawable with its interaction state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub id: u32,
    pub geometry: Geometry,
    /// Clickable right now
    pub enabled: bool,
    /// Carries a building (or, for tiles, the robber)
    pub owned: bool,
    /// Drawn greyed out: neither clickable nor owned
    pub disabled: bool,
    /// Owner colour, when owned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl Primitive {
    pub fn new(kind: PrimitiveKind, id: u32, geometry: Geometry) -> Self {
        Self {
            kind,
            id,
            geometry,
            enabled: false,
            owned: false,
            disabled: true,
            fill: None,
        }
    }

    /// Set interaction flags; `disabled` follows from the other two
    pub fn with_state(mut self, enabled: bool, owned: bool) -> Self {
        self.enabled = enabled;
        self.owned = owned;
        self.disabled = !enabled && !owned;
        self
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }
}

/// Every primitive of a board with default (inactive) flags, in paint order:
/// tiles, edges, vertices, ports.
pub fn board_primitives(topology: &BoardTopology, ports: &[PortPlacement]) -> Vec<Primitive> {
    let mut out = Vec::with_capacity(
        topology.tiles().len() + topology.edges().len() + topology.vertices().len() + ports.len(),
    );

    out.extend(topology.tiles().iter().map(|t| {
        Primitive::new(
            PrimitiveKind::Tile,
            t.id,
            Geometry::Hexagon {
                center: t.center,
                corners: t.corners,
                resource: t.kind,
                token: t.token,
                blocked: t.blocked,
            },
        )
        .with_fill(t.kind.color())
    }));
    out.extend(topology.edges().iter().map(|e| {
        Primitive::new(PrimitiveKind::Edge, e.id, Geometry::Quad { corners: e.quad })
    }));
    out.extend(topology.vertices().iter().map(|v| {
        Primitive::new(
            PrimitiveKind::Vertex,
            v.id,
            Geometry::Point {
                position: v.position,
            },
        )
    }));
    out.extend(ports.iter().map(|p| {
        Primitive::new(
            PrimitiveKind::Port,
            p.index,
            Geometry::Arc {
                start: p.start,
                end: p.end,
                radius: p.radius,
                label: p.label,
                angle: p.angle,
                port: p.kind.clone(),
            },
        )
        .with_state(false, true)
    }));
    out
}
