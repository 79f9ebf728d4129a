//! Error types shared by the loader, the wrappers and the comparators.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, DetectorError>;

/// Everything that can stop a detection run.
///
/// Findings are never errors: a breaking change is reported through the
/// `FindingContainer`. These variants cover bad input and malformed annotations.
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("The directory `{}` does not exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Invalid option `{option}`: {message}")]
    InvalidOption { option: String, message: String },

    #[error("protoc failed to load the descriptor set: {command}\n{stderr}")]
    Protoc { command: String, stderr: String },

    #[error("Failed to decode the descriptor set: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error(
        "Method `{method}` returns google.longrunning.Operation but its operation_info \
         annotation is missing the response_type or metadata_type"
    )]
    IncompleteLroAnnotation { method: String },

    #[error(
        "The resource_reference annotation of field `{field}` defines neither `type` \
         nor `child_type`"
    )]
    EmptyResourceReference { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectorError {
    /// Create an invalid option error.
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }
}
