//! Error types for the CLI

use std::path::PathBuf;

use thiserror::Error;

use crate::inference::InferenceError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Invalid config file {0}: {1}")]
    ConfigError(PathBuf, String),

    #[error("Inference failed: {0}")]
    InferenceError(#[from] InferenceError),

    #[error("Failed to render output: {0}")]
    OutputError(String),
}
