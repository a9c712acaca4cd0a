//! CLI commands and argument parsing

use crate::openapi::DocumentFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Directory the capture proxy writes transactions to
pub const DEFAULT_DATA_DIR: &str = "./swagdoc-data";

/// Infer OpenAPI documentation from captured HTTP traffic
#[derive(Parser, Debug)]
#[command(name = "swagdoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Inference configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an OpenAPI document from captured transactions
    Generate(GenerateArgs),

    /// Infer a schema from a single JSON document
    Infer {
        /// JSON file to read
        file: PathBuf,

        /// Treat a top-level array as a set of samples and refine across them
        #[arg(long)]
        samples: bool,
    },

    /// Print merged request/response schemas per endpoint
    Endpoints {
        /// Directory to read transactions from
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
}

/// Arguments of `generate`; unset flags keep the configured values
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Directory to read transactions from
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "swagger.json")]
    pub output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: DocumentFormat,

    /// Document title
    #[arg(long)]
    pub title: Option<String>,

    /// Document description
    #[arg(long)]
    pub description: Option<String>,

    /// API version written to the document
    #[arg(long)]
    pub api_version: Option<String>,

    /// Server URL of the documented API
    #[arg(long)]
    pub base_path: Option<String>,

    /// Tag mapping in the form `prefix:tag` (repeatable)
    #[arg(long = "tag-mapping", value_name = "PREFIX:TAG")]
    pub tag_mappings: Vec<String>,

    /// Extra path segment skipped when deriving tags (repeatable)
    #[arg(long = "version-prefix", value_name = "SEGMENT")]
    pub version_prefixes: Vec<String>,

    /// Samples kept per field
    #[arg(long)]
    pub max_samples: Option<usize>,

    /// Skip sample-based refinement
    #[arg(long)]
    pub no_refine: bool,

    /// Delete the transaction files after writing the document
    #[arg(long)]
    pub cleanup: bool,
}
