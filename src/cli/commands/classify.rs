//! Classify command implementation

use crate::cli::error::CliError;
use crate::cli::output::format_classifications;
use crate::inference::{SourceKind, StringFormat, classify};

/// Run each value through the format classifier chain
pub fn classify_values(values: &[String]) -> Vec<(String, Option<StringFormat>)> {
    values
        .iter()
        .map(|value| (value.clone(), classify(value, SourceKind::JsonToken)))
        .collect()
}

/// Handle the classify command
pub fn handle_classify(values: &[String]) -> Result<(), CliError> {
    if values.is_empty() {
        return Err(CliError::InvalidArgument(
            "at least one value is required".to_string(),
        ));
    }
    print!("{}", format_classifications(&classify_values(values)));
    Ok(())
}
