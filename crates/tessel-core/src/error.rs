//! Error types for tessel

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TesselError>;

/// Main error type for tessel
#[derive(Debug, Error)]
pub enum TesselError {
    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("No shape is open; call begin_shape first")]
    NoActiveShape,

    #[error("Shape {0} is still open; finish it before starting another")]
    ShapeAlreadyOpen(u32),

    #[error("Shape handle mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: u32, got: u32 },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Format not supported: {0}")]
    FormatNotSupported(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),
}
