//! Configuration for schema inference

use serde::{Deserialize, Serialize};

/// Default nesting bound, matching serde_json's parser recursion limit
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for schema inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Resolve a format for string values from their content
    /// (date, guid, email, ...). When disabled every string is a plain string.
    pub resolve_format_for_strings: bool,

    /// Maximum nesting depth below the root value
    pub max_depth: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            resolve_format_for_strings: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Enable or disable string format resolution
    pub fn resolve_format_for_strings(mut self, resolve: bool) -> Self {
        self.config.resolve_format_for_strings = resolve;
        self
    }

    /// Set the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert!(config.resolve_format_for_strings);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_builder() {
        let config = InferenceConfig::builder()
            .resolve_format_for_strings(false)
            .max_depth(5)
            .build();

        assert!(!config.resolve_format_for_strings);
        assert_eq!(config.max_depth, 5);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: InferenceConfig =
            serde_json::from_str(r#"{"resolveFormatForStrings": false}"#).unwrap();

        assert!(!config.resolve_format_for_strings);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }
}
