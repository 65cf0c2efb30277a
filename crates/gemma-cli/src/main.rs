//! # gemma-cli
//!
//! Command-line driver for schema-driven mapping of JSON and XML documents
//! into JSON.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{InputFormat, MappingInputs};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "gemma")]
#[command(about = "Map JSON or XML documents to JSON with a declarative schema")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a document through a schema and write the JSON result
    Map {
        /// Mapping schema file (JSON or YAML)
        schema: PathBuf,

        /// Response document (JSON or XML)
        input: PathBuf,

        /// Output file path; stdout when omitted
        output: Option<PathBuf>,

        /// Response format; guessed from the extension when omitted
        #[arg(long, value_enum)]
        input_format: Option<InputFormat>,

        /// Top-level key holding the schema tree
        #[arg(long)]
        schema_root: Option<String>,

        /// Spaces per indentation level
        #[arg(long)]
        indent: Option<usize>,
    },

    /// Print the flattened [path, value] entries without nesting them
    Flatten {
        /// Mapping schema file (JSON or YAML)
        schema: PathBuf,

        /// Response document (JSON or XML)
        input: PathBuf,

        /// Response format; guessed from the extension when omitted
        #[arg(long, value_enum)]
        input_format: Option<InputFormat>,

        /// Top-level key holding the schema tree
        #[arg(long)]
        schema_root: Option<String>,
    },

    /// Validate a schema and list its fields
    Check {
        /// Mapping schema file (JSON or YAML)
        schema: PathBuf,

        /// Top-level key holding the schema tree
        #[arg(long)]
        schema_root: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Map {
            schema,
            input,
            output,
            input_format,
            schema_root,
            indent,
        } => {
            let config = config.with_overrides(schema_root, indent);
            let inputs = MappingInputs {
                schema,
                input,
                input_format,
            };
            commands::run_map(&inputs, output.as_deref(), &config)
        }
        Commands::Flatten {
            schema,
            input,
            input_format,
            schema_root,
        } => {
            let config = config.with_overrides(schema_root, None);
            let inputs = MappingInputs {
                schema,
                input,
                input_format,
            };
            commands::run_flatten(&inputs, &config)
        }
        Commands::Check {
            schema,
            schema_root,
        } => {
            let config = config.with_overrides(schema_root, None);
            commands::run_check(&schema, &config)
        }
    }
}
