//! Schema inference engine

use serde_json::Value;

use super::config::InferenceConfig;
use super::describe::{Describe, Describer};
use super::error::InferenceError;
use super::types::SchemaNode;

/// Schema inference engine
///
/// Holds only configuration, so one inferrer can serve any number of
/// calls, including concurrent ones.
#[derive(Debug, Clone, Default)]
pub struct SchemaInferrer {
    config: InferenceConfig,
}

impl SchemaInferrer {
    /// Create a new schema inferrer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new schema inferrer with custom configuration
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer the schema of a root value
    ///
    /// `None` means no value was given at all and is rejected with
    /// [`InferenceError::InvalidArgument`]. A present null value
    /// (`Value::Null`, `()`, an `Option` holding `None`) yields a null node.
    pub fn infer<T: Describe + ?Sized>(
        &self,
        value: Option<&T>,
    ) -> Result<SchemaNode, InferenceError> {
        let value = value.ok_or_else(|| InferenceError::InvalidArgument("value".to_string()))?;
        let _span = tracing::debug_span!("infer_schema", type_name = std::any::type_name::<T>())
            .entered();

        value.describe(&mut Describer::new(&self.config))
    }

    /// Infer the schema of a parsed JSON value
    pub fn infer_json(&self, value: &Value) -> Result<SchemaNode, InferenceError> {
        self.infer(Some(value))
    }

    /// Parse a JSON document and infer its schema
    pub fn infer_json_str(&self, json: &str) -> Result<SchemaNode, InferenceError> {
        let value: Value = serde_json::from_str(json)?;
        self.infer_json(&value)
    }

    /// Infer the schema of a type without a value
    pub fn infer_type<T: Describe + ?Sized>(&self) -> SchemaNode {
        Describer::new(&self.config).describe_type::<T>()
    }
}

/// Infer the schema of a root value with the default configuration
pub fn infer_schema<T: Describe + ?Sized>(value: Option<&T>) -> Result<SchemaNode, InferenceError> {
    SchemaInferrer::new().infer(value)
}
