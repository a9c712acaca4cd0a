//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, GenerateArgs};
use crate::config::{InferenceConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::openapi::{OpenApiGenerator, SchemaObject};
use crate::schema::{apply_type_inference, infer_schema, merge_schema, Schema};
use crate::traffic::TransactionStore;
use crate::types::JsonValue;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Generate(args) => self.generate(args),
            Commands::Infer { file, samples } => self.infer(file, *samples),
            Commands::Endpoints { data_dir } => self.endpoints(data_dir),
        }
    }

    /// Configuration file, or defaults when none was given
    fn load_config(&self) -> Result<InferenceConfig> {
        match &self.cli.config {
            Some(path) => InferenceConfig::from_file(path),
            None => Ok(InferenceConfig::default()),
        }
    }

    /// Generate a document and write it to disk
    fn generate(&self, args: &GenerateArgs) -> Result<()> {
        let mut config = self.load_config()?;
        apply_generate_args(&mut config, args)?;

        info!("Reading transactions from {}", args.data_dir.display());
        let store = TransactionStore::new(&args.data_dir);
        let transactions = store.load_all()?;
        if transactions.is_empty() {
            warn!("No transactions found in {}", args.data_dir.display());
        }

        let document = OpenApiGenerator::new(config).generate(&transactions);
        let rendered = document.render(args.format)?;
        write_output(&args.output, &rendered)?;
        info!(
            "Wrote {} operations to {}",
            document.operation_count(),
            args.output.display()
        );

        if args.cleanup {
            store.clear()?;
        }

        Ok(())
    }

    /// Print the schema inferred from one JSON file
    fn infer(&self, file: &Path, samples: bool) -> Result<()> {
        let config = self.load_config()?;
        let content = fs::read_to_string(file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(file.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;
        let value: JsonValue = serde_json::from_str(&content)?;

        let schema = match value {
            JsonValue::Array(items) if samples => {
                infer_from_samples(&items, config.effective_max_samples())
            }
            value => infer_schema(&value),
        };

        print_json(&SchemaObject::from(&schema))
    }

    /// Print endpoint-level merged schemas
    fn endpoints(&self, data_dir: &Path) -> Result<()> {
        let config = self.load_config()?;
        let transactions = TransactionStore::new(data_dir).load_all()?;
        let report = OpenApiGenerator::new(config).infer(&transactions);

        let endpoints: Vec<JsonValue> = report
            .endpoints
            .iter()
            .map(|endpoint| {
                serde_json::json!({
                    "path": endpoint.path,
                    "method": endpoint.method,
                    "observations": endpoint.observations,
                    "request": SchemaObject::from(&endpoint.request_schema),
                    "response": SchemaObject::from(&endpoint.response_schema),
                })
            })
            .collect();

        print_json(&endpoints)
    }
}

/// Merge every sample's schema, then refine across the samples
fn infer_from_samples(items: &[JsonValue], max_samples: usize) -> Schema {
    let merged = items
        .iter()
        .map(infer_schema)
        .fold(Schema::placeholder(), |acc, schema| merge_schema(&acc, &schema));
    apply_type_inference(merged, items, max_samples)
}

/// Layer `generate` flags over the loaded configuration
fn apply_generate_args(config: &mut InferenceConfig, args: &GenerateArgs) -> Result<()> {
    let document = &mut config.document;

    if let Some(title) = &args.title {
        document.title.clone_from(title);
    }
    if let Some(description) = &args.description {
        document.description.clone_from(description);
    }
    if let Some(version) = &args.api_version {
        document.version.clone_from(version);
    }
    if let Some(url) = &args.base_path {
        document
            .servers
            .insert(0, ServerConfig::new(url).with_description("API Server"));
    }
    for mapping in &args.tag_mappings {
        let (prefix, tag) = mapping.split_once(':').ok_or_else(|| {
            Error::invalid_value("tag-mapping", format!("expected PREFIX:TAG, got '{mapping}'"))
        })?;
        document
            .tag_mappings
            .insert(prefix.to_string(), tag.to_string());
    }
    document
        .version_prefixes
        .extend(args.version_prefixes.iter().cloned());

    if let Some(max_samples) = args.max_samples {
        config.max_samples = max_samples;
    }
    if args.no_refine {
        config.refine = false;
    }

    config.validate()
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::output(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    fs::write(path, content)
        .map_err(|e| Error::output(format!("Failed to write {}: {}", path.display(), e)))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
