//! Output formatting for CLI

use clap::ValueEnum;

use crate::cli::error::CliError;
use crate::inference::{SchemaNode, StringFormat};

/// Serialization format for inferred schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Render a schema as a draft-04 document
pub fn format_schema(
    schema: &SchemaNode,
    format: OutputFormat,
    compact: bool,
) -> Result<String, CliError> {
    let document = schema.to_json_schema();
    let rendered = match format {
        OutputFormat::Json if compact => serde_json::to_string(&document).map_err(|e| e.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(&document).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(&document).map_err(|e| e.to_string()),
    };
    rendered.map_err(CliError::OutputError)
}

/// One `value<TAB>format` line per classified value
pub fn format_classifications(results: &[(String, Option<StringFormat>)]) -> String {
    let mut output = String::new();
    for (value, format) in results {
        let tag = format.map_or("none", |f| f.as_str());
        output.push_str(&format!("{}\t{}\n", value, tag));
    }
    output
}
