use thiserror::Error;

use crate::chart::AxisError;
use crate::layout::GridError;

/// Unified result type for the trellis crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by the layout and axis engines.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout `{0}` is not registered")]
    UnknownLayout(String),
    #[error("malformed layout data: {0}")]
    Malformed(String),
    #[error("grid layout error: {0}")]
    Grid(#[from] GridError),
    #[error("axis error: {0}")]
    Axis(#[from] AxisError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
