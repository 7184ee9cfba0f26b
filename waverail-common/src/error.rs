//! Common error types for Waverail

use thiserror::Error;

/// Common result type for Waverail operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the curve and peak utilities
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Fade shape name not recognized
    #[error("Unsupported fade shape: {0}")]
    UnsupportedShape(String),

    /// Fade direction sign other than +1/-1
    #[error("Unsupported fade direction: {0}")]
    UnsupportedDirection(i32),

    /// Peak bit depth other than 8, 16 or 32
    #[error("Invalid number of bits specified for peaks: {0}")]
    InvalidBitDepth(u32),
}
