// ppe-report-service/src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

/// User-facing message for any failed generation, regardless of cause.
pub const GENERATION_FAILED_MESSAGE: &str = "Không thể tạo file PDF";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Font error: {0}")]
    FontError(String),

    #[error("Raster error: {0}")]
    RasterError(String),

    #[error("PDF assembly error: {0}")]
    PdfError(String),

    #[error("Offscreen host is {actual}, expected {expected}")]
    InvalidHostState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("{0}")]
    GenerationFailed(String),
}

impl ReportError {
    /// Collapse any internal failure into the single error the caller sees.
    pub fn into_generation_failed(self) -> ReportError {
        match self {
            ReportError::GenerationFailed(_) => self,
            _ => ReportError::GenerationFailed(GENERATION_FAILED_MESSAGE.to_string()),
        }
    }
}
