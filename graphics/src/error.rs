//! Graphics error types.

use strata_core::data::DataError;
use thiserror::Error;

/// Errors that can occur while describing pipelines and draws.
#[derive(Error, Debug)]
pub enum GraphicsError {
    /// A vertex input state is inconsistent.
    #[error("invalid vertex input: {0}")]
    InvalidVertexInput(String),
    /// A buffer cannot be used as an index buffer.
    #[error("invalid index buffer: {0}")]
    InvalidIndexBuffer(String),
    /// A data buffer operation failed.
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Result alias for graphics operations.
pub type GraphicsResult<T> = Result<T, GraphicsError>;
