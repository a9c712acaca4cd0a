//! CLI module
//!
//! Command-line interface for generating documentation from captured traffic.
//!
//! # Commands
//!
//! - `generate` - Write an OpenAPI document for a data directory
//! - `infer` - Print the schema of a single JSON document
//! - `endpoints` - Print merged schemas per endpoint

mod commands;
mod runner;

pub use commands::{Cli, Commands, GenerateArgs, DEFAULT_DATA_DIR};
pub use runner::Runner;
