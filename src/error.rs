use crate::layout::FaceSide;
use thiserror::Error;

/// Failure taxonomy for the preview/export pipeline.
///
/// Everything raised inside an export run is caught at the orchestrator
/// boundary and converted into a single user-facing notification; the
/// orchestrator always returns to idle afterwards.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No employee data found. Please fill the form before previewing the ID card")]
    DataUnavailable,
    #[error("Invalid employee data: {0}")]
    DataCorrupt(String),
    #[error("Card face not found: {0}")]
    ElementNotFound(FaceSide),
    #[error("Capture failed: {0}")]
    CaptureFailure(String),
    #[error("PDF assembly failed: {0}")]
    AssemblyFailure(String),
    #[error("Failed to load asset: {0}")]
    AssetError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
