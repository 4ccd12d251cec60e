use thiserror::Error;

use crate::OsmNodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No path between the requested nodes")]
    NoPath,
    #[error("Unknown road node {0}")]
    UnknownNode(OsmNodeId),
    #[error("Invalid node index")]
    InvalidNodeIndex,
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("Computation was cancelled")]
    Cancelled,
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
