//! Error types for the lv-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// provides a unified error interface for both CLI and GUI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected form input. Reported synchronously, never reaches the kernel.
    #[error("Validation error: {0}")]
    Validation(#[from] lv_core::ValidationError),

    /// Kernel failure or unusable kernel response.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Store failure, or nothing to save/load. Never fatal.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for lv-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<lv_kernel::KernelError> for AppError {
    fn from(err: lv_kernel::KernelError) -> Self {
        AppError::Evaluation(err.to_string())
    }
}

impl From<lv_core::SeriesError> for AppError {
    fn from(err: lv_core::SeriesError) -> Self {
        AppError::Evaluation(err.to_string())
    }
}

impl From<lv_results::ResultsError> for AppError {
    fn from(err: lv_results::ResultsError) -> Self {
        AppError::Persistence(err.to_string())
    }
}
