use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use provdoc_docs::DocBundle;
use provdoc_schema_gen::Layout;
use provdoc_util::{GeneratorConfig, expand_tilde, resolve_against};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod generate;

use generate::GenerateOptions;

/// Convert provider schema exports into multi-language YAML.
#[derive(Parser, Debug)]
#[command(name = "provdoc", version, about)]
struct Cli {
    /// Log filter, e.g. `debug` or `provdoc_docs=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate YAML artifacts from the provider schema JSON
    Generate {
        /// Provider schema JSON (defaults to PROVDOC_SCHEMA_PATH)
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Documentation root holding one directory per provider
        #[arg(long)]
        docs_dir: Option<PathBuf>,

        /// Output directory for generated YAML
        #[arg(long)]
        output: Option<PathBuf>,

        /// Enrich the schema from markdown documentation
        #[arg(long)]
        with_docs: bool,

        /// Overwrite existing artifacts instead of merging with them
        #[arg(long)]
        no_diff: bool,

        /// Write one file per resource instead of one file per provider
        #[arg(long)]
        split: bool,
    },
    /// Show the resolved configuration
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print what the extractors find in one documentation page
    InspectDoc {
        /// Markdown page to inspect
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = GeneratorConfig::load();
    init_tracing(cli.log_level.as_deref(), &config.log_level);

    match cli.command {
        Command::Generate {
            schema,
            docs_dir,
            output,
            with_docs,
            no_diff,
            split,
        } => {
            let options = GenerateOptions {
                config: GeneratorConfig {
                    schema_path: override_path(&config.project_root, schema, &config.schema_path),
                    docs_dir: override_path(&config.project_root, docs_dir, &config.docs_dir),
                    output_dir: override_path(&config.project_root, output, &config.output_dir),
                    ..config
                },
                with_docs,
                differential: !no_diff,
                layout: if split { Layout::Split } else { Layout::Single },
            };
            info!(
                schema = %options.config.schema_path.display(),
                output = %options.config.output_dir.display(),
                with_docs = options.with_docs,
                differential = options.differential,
                "starting generation"
            );

            let report = generate::run(&options)?;
            println!(
                "Processed {} provider(s), wrote {} file(s), {} provider failure(s), {} file failure(s)",
                report.providers,
                report.files.len(),
                report.failed.len(),
                report.failed_files.len()
            );
            for path in &report.files {
                println!("  {}", path.display());
            }
            for name in &report.failed {
                eprintln!("  failed: {name}");
            }
            for path in &report.failed_files {
                eprintln!("  not written: {}", path.display());
            }
            Ok(())
        }
        Command::Info { json } => print_info(&config, json),
        Command::InspectDoc { file } => {
            let bundle = DocBundle::parse_file(&expand_tilde(&file.to_string_lossy()))
                .with_context(|| format!("inspect {}", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&bundle)?);
            Ok(())
        }
    }
}

/// Flag beats `RUST_LOG`, which beats the configured level.
fn init_tracing(flag: Option<&str>, configured: &str) {
    let filter = match flag {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured)),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn override_path(project_root: &Path, flag: Option<PathBuf>, configured: &Path) -> PathBuf {
    match flag {
        Some(path) => resolve_against(project_root, &path.to_string_lossy()),
        None => configured.to_path_buf(),
    }
}

fn print_info(config: &GeneratorConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }
    println!("project root: {}", config.project_root.display());
    println!("schema:       {} ({})", config.schema_path.display(), presence(&config.schema_path));
    println!("docs:         {} ({})", config.docs_dir.display(), presence(&config.docs_dir));
    println!("output:       {}", config.output_dir.display());
    println!("log level:    {}", config.log_level);
    Ok(())
}

fn presence(path: &Path) -> &'static str {
    if path.exists() { "found" } else { "missing" }
}
