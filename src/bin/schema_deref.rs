//! schema-deref - resolve `$ref` pointers in a schema document
//!
//! Usage:
//!   schema-deref pet.json
//!   schema-deref openapi.yaml --definitions /components/schemas --format yaml
//!   schema-deref pet.json --definitions-file defs.json --summary

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use schema_deref::config::CONFIG_ENV_VAR;
use schema_deref::{document, ConfigLoader, Dereferencer, OutputFormat, ResolutionSummary};

#[derive(Parser, Debug)]
#[command(name = "schema-deref")]
#[command(about = "Resolve $ref pointers in a JSON Schema document")]
#[command(version)]
struct Args {
    /// Schema document to resolve (JSON or YAML)
    schema: PathBuf,

    /// Resolve references against this document instead of the schema itself
    #[arg(long)]
    definitions_file: Option<PathBuf>,

    /// JSON pointer selecting the lookup table, e.g. /components/schemas
    #[arg(long)]
    definitions: Option<String>,

    /// Do not annotate resolved nodes with __inheritedFrom
    #[arg(long)]
    hide_inherited_from: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Options file (YAML)
    #[arg(long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Print a resolution summary to stderr
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let options = ConfigLoader::from_arg_or_env(args.config.clone())
        .load()
        .context("Failed to load options")?
        .with_overrides(args.hide_inherited_from, args.definitions.clone());

    let schema = document::load(&args.schema)
        .with_context(|| format!("Failed to load schema {}", args.schema.display()))?;
    let definitions = match &args.definitions_file {
        Some(path) => Some(
            document::load(path)
                .with_context(|| format!("Failed to load definitions {}", path.display()))?,
        ),
        None => None,
    };

    let deref = Dereferencer::new(options);
    let table = deref.lookup_table(definitions.as_ref().unwrap_or(&schema))?;
    info!("Resolving {}", args.schema.display());
    let resolved = deref.dereference(&schema, table);

    println!("{}", document::render(&resolved, args.format)?);

    if args.summary {
        let summary = ResolutionSummary::from_value(&resolved);
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
