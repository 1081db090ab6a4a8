//! Schema inference engine for JSON data and in-memory values
//!
//! This module infers JSON Schema descriptions from a single value, either
//! a parsed JSON document or any Rust value implementing [`Describe`].
//!
//! ## Features
//!
//! - **Type inference** - Map values onto JSON Schema types (null, boolean,
//!   integer, number, string, array, object)
//! - **Numeric sizing** - `int32`/`int64` by magnitude, `float`/`double` by precision
//! - **Format detection** - Classify strings (date, date-time, time-span, guid,
//!   email, ipv4, ipv6, uri, ...) with an ordered first-match chain
//! - **Type-only inference** - Describe a type when no value is available
//!
//! ## Example
//!
//! ```rust
//! use schema_infer::inference::{SchemaInferrer, SchemaNode};
//! use serde_json::json;
//!
//! let inferrer = SchemaInferrer::new();
//! let schema = inferrer.infer_json(&json!({"name": "Alice", "email": "alice@example.com"}))?;
//!
//! assert_eq!(schema.property("email").and_then(SchemaNode::format), Some("email"));
//! println!("{}", serde_json::to_string_pretty(&schema.to_json_schema())?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod describe;
mod error;
mod formats;
mod inferrer;
mod types;

pub use config::{DEFAULT_MAX_DEPTH, InferenceConfig, InferenceConfigBuilder};
pub use describe::{Describe, Describer, ObjectDescriber};
pub use error::InferenceError;
pub use formats::{FormatValidator, SourceKind, classify, format_validators};
pub use inferrer::{SchemaInferrer, infer_schema};
pub use types::{
    DRAFT_04_SCHEMA_URI, IntegerFormat, NumberFormat, Properties, SchemaKind, SchemaNode,
    StringFormat,
};
