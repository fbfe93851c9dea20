//! Common error types for DentScan

use thiserror::Error;

/// Common result type for DentScan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across DentScan crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image could not be opened or decoded (wraps image::ImageError)
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
