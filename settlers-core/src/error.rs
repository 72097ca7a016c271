//! Error types for board construction

use crate::model::VertexId;

/// Failure while building board topology
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("map has {actual} tiles but the grid has {expected} slots")]
    TileCountMismatch { expected: usize, actual: usize },

    #[error("tile order is not a permutation of the grid slots: {0:?}")]
    InvalidOrder(Vec<usize>),
}

/// Failure while placing a trade port
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("no tile has vertices {0} and {1} on a common side")]
    NotFound(VertexId, VertexId),

    #[error("vertex#{0} has no drawable primitive")]
    MissingVertex(VertexId),

    #[error("port endpoints are {distance} apart, inset {inset} leaves no arc")]
    Degenerate { distance: f64, inset: f64 },
}

/// Unknown board layout
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    #[error("unsupported map: {0}")]
    Unsupported(String),
}
