//! Infer command implementation

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::cli::output::{OutputFormat, format_schema};
use crate::inference::{InferenceConfig, SchemaInferrer};

/// Arguments for the infer command
#[derive(Debug, Clone, Default)]
pub struct InferArgs {
    /// Input file, or `-` for stdin
    pub input: String,
    /// Optional TOML file holding an [`InferenceConfig`]
    pub config: Option<PathBuf>,
    pub no_string_formats: bool,
    pub max_depth: Option<usize>,
    pub format: OutputFormat,
    pub compact: bool,
    /// Write here instead of stdout
    pub output: Option<PathBuf>,
}

/// Load input content from file or stdin
fn load_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| CliError::InvalidArgument(format!("Failed to read stdin: {}", e)))?;
        Ok(content)
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))
    }
}

/// Load an inference config from a TOML file
pub fn load_config(path: &Path) -> Result<InferenceConfig, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;
    toml::from_str(&content).map_err(|e| CliError::ConfigError(path.to_path_buf(), e.to_string()))
}

/// Build the effective config: file first, then command-line overrides
fn resolve_config(args: &InferArgs) -> Result<InferenceConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => InferenceConfig::default(),
    };
    if args.no_string_formats {
        config.resolve_format_for_strings = false;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if config.max_depth == 0 {
        return Err(CliError::InvalidArgument(
            "max depth must be at least 1".to_string(),
        ));
    }
    Ok(config)
}

/// Infer a schema from JSON text and render it
pub fn run_infer(content: &str, args: &InferArgs) -> Result<String, CliError> {
    let config = resolve_config(args)?;
    tracing::debug!(?config, "Resolved inference config");

    let schema = SchemaInferrer::with_config(config).infer_json_str(content)?;
    format_schema(&schema, args.format, args.compact)
}

/// Handle the infer command
pub fn handle_infer(args: &InferArgs) -> Result<(), CliError> {
    let content = load_input(&args.input)?;
    let rendered = run_infer(&content, args)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", rendered))
                .map_err(|e| CliError::FileWriteError(path.clone(), e.to_string()))?;
            tracing::info!(path = %path.display(), "Schema written");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
