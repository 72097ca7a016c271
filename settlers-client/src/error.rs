//! Error types for the client session

/// Failure decoding an inbound message
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("bad payload for {kind}: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("bulk update entry {index} rejected: {source}")]
    InBatch {
        index: usize,
        #[source]
        source: Box<ProtocolError>,
    },

    #[error("could not encode {kind}: {source}")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reading the session identity at startup
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session cookie `{0}` not present")]
    MissingCookie(String),

    #[error("no room id in path `{0}`")]
    MissingRoom(String),
}

/// Failure building the drawable board for the current match
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Variant(#[from] settlers_core::VariantError),

    #[error(transparent)]
    Topology(#[from] settlers_core::TopologyError),

    #[error("no board received yet")]
    EmptyBoard,
}
