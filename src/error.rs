//! # Error Types
//!
//! This module defines error types used throughout the tspl library.

use thiserror::Error;

/// Main error type for tspl operations
#[derive(Debug, Error)]
pub enum TsplError {
    /// The image source could not be decoded
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// A packed raster blob did not match the expected P4 layout
    #[error("Malformed packed raster: {0}")]
    MalformedPackedRaster(String),

    /// Decoder or worker pool limits were exceeded
    #[error("Resource limit: {0}")]
    ResourceLimit(String),

    /// Transport-level errors (connection, session state)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Label setup could not be parsed
    #[error("Invalid label setup: {0}")]
    Setup(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for TsplError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => TsplError::Io(e),
            image::ImageError::Limits(e) => TsplError::ResourceLimit(e.to_string()),
            other => TsplError::UnsupportedFormat(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_io_error_stays_io() {
        let err = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert!(matches!(TsplError::from(err), TsplError::Io(_)));
    }

    #[test]
    fn test_limit_error_maps_to_resource_limit() {
        let err = image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::InsufficientMemory,
        ));
        assert!(matches!(TsplError::from(err), TsplError::ResourceLimit(_)));
    }
}
