//! Data buffer error types.

use thiserror::Error;

/// Errors raised by [`Data`](super::Data) buffers and their adapters.
#[derive(Error, Debug)]
pub enum DataError {
    /// The layout cannot describe the buffer (zero block dims, too many mip levels, ...).
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    /// A mip level outside `[0, level_count)` was requested.
    #[error("mip level {level} out of range (buffer has {level_count} levels)")]
    MipLevelOutOfRange {
        /// Requested level.
        level: usize,
        /// Number of levels held by the buffer.
        level_count: usize,
    },
    /// A strided view would read past the end of its source.
    #[error("range ends at byte {end} but source holds {size} bytes")]
    OutOfBounds {
        /// One past the last byte the view would read.
        end: usize,
        /// Size of the source in bytes.
        size: usize,
    },
    /// A stride of zero was given for more than one element.
    #[error("stride of 0 with {count} elements would alias every element")]
    ZeroStride {
        /// Requested element count.
        count: usize,
    },
    /// The buffer's memory was handed out by `data_release`.
    #[error("buffer data has been released")]
    Released,
    /// Supplied storage does not match what the extents and layout require.
    #[error("storage holds {actual} values but layout requires {expected}")]
    StorageMismatch {
        /// Values required by extents and mip chain.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },
    /// A stream contained a format code this crate does not know.
    #[error("unknown format code {0}")]
    UnknownFormat(u32),
    /// Reading or writing a stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for data operations.
pub type DataResult<T> = Result<T, DataError>;
