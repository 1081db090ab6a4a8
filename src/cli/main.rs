//! schema-infer command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use schema_infer::cli::commands::classify::handle_classify;
use schema_infer::cli::commands::infer::{InferArgs, handle_infer};
use schema_infer::cli::logging;
use schema_infer::cli::output::OutputFormat;

#[derive(Parser)]
#[command(name = "schema-infer")]
#[command(about = "Infer JSON Schema documents from JSON values", long_about = None)]
#[command(version)]
struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer a schema from a JSON document
    Infer {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// TOML file with inference settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Leave string nodes without a format
        #[arg(long)]
        no_string_formats: bool,

        /// Maximum nesting depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Emit JSON on a single line
        #[arg(long)]
        compact: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report the format each string would be tagged with
    Classify {
        /// Values to classify
        #[arg(required = true)]
        values: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Infer {
            input,
            config,
            no_string_formats,
            max_depth,
            format,
            compact,
            output,
        } => {
            let args = InferArgs {
                input,
                config,
                no_string_formats,
                max_depth,
                format,
                compact,
                output,
            };
            handle_infer(&args)?;
        }
        Commands::Classify { values } => {
            handle_classify(&values)?;
        }
    }

    Ok(())
}
