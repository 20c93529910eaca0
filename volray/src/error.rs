//! Error types for the library.

use thiserror::Error;

/// Library-wide error type.
///
/// The rendering core itself never fails; errors come from loading volumes
/// and from validating configuration.
#[derive(Error, Debug)]
pub enum VolrayError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed header or metadata
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data does not match its description
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Render options rejected by [`crate::render::RenderOptionsBuilder::build`]
    #[error("Invalid render options: {0}")]
    InvalidOptions(String),
}

/// Result type alias using [`VolrayError`].
pub type Result<T> = std::result::Result<T, VolrayError>;
