//! Error types for mica operations.

use thiserror::Error;

/// Result type alias using the mica Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during mica operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid run configuration or initialization state.
    #[error("config error: {0}")]
    Config(String),

    /// Malformed or mis-sized input data.
    #[error("input error: {0}")]
    Input(String),

    /// Mesh-related errors.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Element-related errors (degenerate geometry, bad DOF counts).
    #[error("element error: {0}")]
    Element(String),

    /// Assembly errors.
    #[error("assembly error: {0}")]
    Assembly(String),

    /// Solver errors.
    #[error("solver error: {0}")]
    Solver(String),

    /// Matrix singularity or conditioning issues.
    #[error("singular matrix: {0}")]
    SingularMatrix(String),

    /// Invalid material properties.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// I/O errors (position files, figure output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
