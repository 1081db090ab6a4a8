//! Error types for schema inference

use thiserror::Error;

/// Errors that can occur during schema inference
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// The root value was absent
    #[error("Invalid argument: no value provided for `{0}`")]
    InvalidArgument(String),

    /// Maximum depth exceeded, typically a cyclic object graph
    #[error("Maximum nesting depth exceeded: {depth} > {max}")]
    MaxDepthExceeded { depth: usize, max: usize },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::JsonParse(e.to_string())
    }
}
