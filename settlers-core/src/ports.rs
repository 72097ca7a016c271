//! Trade port placement
//!
//! A port is given only as two vertex IDs. Its drawing position comes from
//! finding the tile side those vertices bound and looking the side's local
//! index up in [`PORT_ORIENTATION`].

use serde::{Deserialize, Serialize};

use crate::error::PortError;
use crate::geometry::Point;
use crate::model::{Port, Tile, TileId, VertexId};
use crate::topology::BoardTopology;

/// Direction the connecting arc is drawn in, relative to tile winding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcOrder {
    /// From the first corner to the second
    Forward,
    /// From the second corner to the first
    Reversed,
}

/// Arc direction and label rotation for one local side index
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeOrientation {
    pub order: ArcOrder,
    /// Label rotation in degrees
    pub angle: f64,
}

/// Orientation by local side index (0 = N→NE, clockwise).
///
/// Tied to the corner winding in `geometry`: with clockwise corners,
/// reversing the arc puts the label apex on the sea side, and each label runs
/// parallel to its side. Re-derive this table if the winding ever changes.
pub const PORT_ORIENTATION: [EdgeOrientation; 6] = [
    EdgeOrientation { order: ArcOrder::Reversed, angle: 30.0 },
    EdgeOrientation { order: ArcOrder::Reversed, angle: 0.0 },
    EdgeOrientation { order: ArcOrder::Reversed, angle: -30.0 },
    EdgeOrientation { order: ArcOrder::Reversed, angle: 30.0 },
    EdgeOrientation { order: ArcOrder::Reversed, angle: 0.0 },
    EdgeOrientation { order: ArcOrder::Reversed, angle: -30.0 },
];

/// Where on the board a port's vertex pair was found
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortAnchor {
    pub tile: TileId,
    /// Local side index on `tile`
    pub edge_slot: u8,
    /// The pair in the tile's winding order
    pub first: VertexId,
    pub second: VertexId,
}

impl PortAnchor {
    pub fn orientation(&self) -> EdgeOrientation {
        PORT_ORIENTATION[self.edge_slot as usize]
    }

    /// Arc start and end vertices
    pub fn arc_endpoints(&self) -> (VertexId, VertexId) {
        match self.orientation().order {
            ArcOrder::Forward => (self.first, self.second),
            ArcOrder::Reversed => (self.second, self.first),
        }
    }
}

/// Find the first tile (in board order) with `a` and `b` adjacent on its
/// boundary, in either direction.
pub fn locate(board: &[Tile], a: VertexId, b: VertexId) -> Result<PortAnchor, PortError> {
    for tile in board {
        for k in 0..6 {
            let current = tile.vertices[k];
            let next = tile.vertices[(k + 1) % 6];
            if (current == a && next == b) || (current == b && next == a) {
                return Ok(PortAnchor {
                    tile: tile.id,
                    edge_slot: k as u8,
                    first: current,
                    second: next,
                });
            }
        }
    }
    Err(PortError::NotFound(a, b))
}

/// Resolved port drawing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortPlacement {
    /// Position in the server's port list; assigned by `place_all`
    pub index: u32,
    pub kind: String,
    pub vertices: [VertexId; 2],
    pub anchor: PortAnchor,
    /// Arc endpoints, pulled towards each other by the inset
    pub start: Point,
    pub end: Point,
    pub radius: f64,
    /// Label position: apex of the isosceles triangle over the pair
    pub label: Point,
    pub angle: f64,
}

/// Places ports against a built topology
pub struct PortPlacer<'a> {
    board: &'a [Tile],
    topology: &'a BoardTopology,
    inset: f64,
}

impl<'a> PortPlacer<'a> {
    pub fn new(board: &'a [Tile], topology: &'a BoardTopology, inset: f64) -> Self {
        Self {
            board,
            topology,
            inset,
        }
    }

    pub fn place(&self, port: &Port) -> Result<PortPlacement, PortError> {
        let [a, b] = port.vertices;
        let anchor = locate(self.board, a, b)?;
        let (from, to) = anchor.arc_endpoints();
        let start = self.position(from)?;
        let end = self.position(to)?;

        let distance = start.distance_to(end);
        if distance == 0.0 || self.inset * 2.0 >= distance {
            return Err(PortError::Degenerate {
                distance,
                inset: self.inset,
            });
        }

        let ux = (end.x - start.x) / distance;
        let uy = (end.y - start.y) / distance;
        let padded_start = Point::new(start.x + ux * self.inset, start.y + uy * self.inset);
        let padded_end = Point::new(end.x - ux * self.inset, end.y - uy * self.inset);

        // apex: perpendicular (-dy, dx) from the midpoint, half the length away
        let half = distance / 2.0;
        let label = Point::new(
            (start.x + end.x) / 2.0 - uy * half,
            (start.y + end.y) / 2.0 + ux * half,
        );

        Ok(PortPlacement {
            index: 0,
            kind: port.kind.clone(),
            vertices: port.vertices,
            anchor,
            start: padded_start,
            end: padded_end,
            radius: padded_start.distance_to(padded_end),
            label,
            angle: anchor.orientation().angle,
        })
    }

    /// Place every port; failures are logged and the port is skipped.
    ///
    /// Each placement keeps its index in `ports`, so a skipped port never
    /// shifts the ones after it.
    pub fn place_all(&self, ports: &[Port]) -> Vec<PortPlacement> {
        ports
            .iter()
            .enumerate()
            .filter_map(|(index, port)| match self.place(port) {
                Ok(placement) => Some(PortPlacement {
                    index: index as u32,
                    ..placement
                }),
                Err(err) => {
                    tracing::warn!("skipping {} port {:?}: {}", port.kind, port.vertices, err);
                    None
                }
            })
            .collect()
    }

    fn position(&self, id: VertexId) -> Result<Point, PortError> {
        self.topology
            .vertex(id)
            .map(|v| v.position)
            .ok_or(PortError::MissingVertex(id))
    }
}
