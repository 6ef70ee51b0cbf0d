use crate::fdc::transport::TransportError;
use thiserror::Error;

/// Result type alias for image and transfer operations
pub type Result<T> = std::result::Result<T, FdmError>;

/// Errors that can occur when working with D88 images or the floppy drive
#[derive(Debug, Error)]
pub enum FdmError {
    /// I/O error occurred while reading or writing the container file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The device transport reported a failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Invalid or unrecognized D88 image content
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Parse error at specific offset
    #[error("Parse error at offset {offset}: {message}")]
    ParseError {
        /// Byte offset where error occurred
        offset: u64,
        /// Error message
        message: String,
    },

    /// Track index outside the container's offset table
    #[error("Invalid track {track} (max: {max})")]
    InvalidTrack {
        /// Track index
        track: usize,
        /// Maximum allowed track index
        max: usize,
    },

    /// Run parameters that cannot be mapped onto the container or drive
    #[error("Invalid run parameters: {0}")]
    InvalidParameters(String),
}

impl FdmError {
    /// Create a parse error with context
    pub fn parse<S: Into<String>>(offset: u64, message: S) -> Self {
        FdmError::ParseError {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid image error
    pub fn invalid_image<S: Into<String>>(message: S) -> Self {
        FdmError::InvalidImage(message.into())
    }

    /// Create an invalid parameters error
    pub fn parameters<S: Into<String>>(message: S) -> Self {
        FdmError::InvalidParameters(message.into())
    }
}
