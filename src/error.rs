//! Error types.
//!
//! The simulation itself is infallible by design - edge cases degrade to
//! safe defaults instead of surfacing errors to the host. The only
//! fallible operations are host-facing exports from the raster backend.

use std::fmt;

/// Errors that can occur when exporting a rendered frame.
#[derive(Debug)]
pub enum ExportError {
    /// The surface has no pixels to export.
    EmptySurface,
    /// Failed to encode or write the image file.
    Image(image::ImageError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::EmptySurface => {
                write!(f, "Cannot export a surface with zero dimensions")
            }
            ExportError::Image(e) => write!(f, "Failed to write image: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Image(e) => Some(e),
            ExportError::EmptySurface => None,
        }
    }
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::Image(e)
    }
}
