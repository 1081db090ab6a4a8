//! Schema Infer - JSON Schema inference from values
//!
//! Provides:
//! - Schema inference for parsed JSON documents and Rust values
//! - String format classification (dates, durations, identifiers, addresses)
//! - Draft-04 JSON Schema output
//! - A command-line front end (feature `cli`)

pub mod cli;
pub mod inference;

// Re-export commonly used types
pub use inference::{
    Describe, Describer, InferenceConfig, InferenceError, SchemaInferrer, SchemaKind, SchemaNode,
    StringFormat, classify, infer_schema,
};
