//! The `generate` command: schema export in, YAML artifacts out.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use provdoc_docs::{DocumentCorrelator, enrich_provider_schema};
use provdoc_schema_gen::{
    ArtifactWriter, Layout, WriteOutcome, parse_provider, parse_schema_document, provider_names,
};
use provdoc_util::{GeneratorConfig, find_lock_file, read_lock_versions};
use tracing::{error, info, warn};

/// Resolved inputs of one generation run: configuration with command-line
/// overrides applied, plus the run flags.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub config: GeneratorConfig,
    pub with_docs: bool,
    pub differential: bool,
    pub layout: Layout,
}

/// Outcome of a run: what was written, which providers failed and which
/// single files could not be written.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub providers: usize,
    pub files: Vec<PathBuf>,
    pub failed: Vec<String>,
    pub failed_files: Vec<PathBuf>,
}

/// Converts every provider in the schema export. A provider that fails is
/// logged and skipped; only an unreadable or invalid export aborts the run.
pub fn run(options: &GenerateOptions) -> Result<GenerateReport> {
    let config = &options.config;
    config.ensure_directories().context("prepare configured directories")?;

    let content = fs::read_to_string(&config.schema_path)
        .with_context(|| format!("read provider schema {}", config.schema_path.display()))?;
    let root = parse_schema_document(&content)
        .with_context(|| format!("parse provider schema {}", config.schema_path.display()))?;
    let names = provider_names(&root).with_context(|| format!("inspect {}", config.schema_path.display()))?;

    let versions = lock_versions(config);
    let writer = ArtifactWriter::new(&config.output_dir, options.differential);
    let mut report = GenerateReport {
        providers: names.len(),
        ..GenerateReport::default()
    };

    for full_name in &names {
        match generate_provider(&root, full_name, &versions, &writer, options) {
            Ok(outcome) => {
                report.files.extend(outcome.written);
                report.failed_files.extend(outcome.failed.into_iter().map(|(path, _)| path));
            }
            Err(error) => {
                error!(provider = %full_name, error = %format!("{error:#}"), "provider generation failed");
                report.failed.push(full_name.clone());
            }
        }
    }

    info!(
        providers = report.providers,
        files = report.files.len(),
        failed = report.failed.len(),
        failed_files = report.failed_files.len(),
        "generation finished"
    );
    Ok(report)
}

fn generate_provider(
    root: &serde_json::Value,
    full_name: &str,
    versions: &IndexMap<String, String>,
    writer: &ArtifactWriter,
    options: &GenerateOptions,
) -> Result<WriteOutcome> {
    let mut schema = parse_provider(root, full_name).with_context(|| format!("parse provider {full_name}"))?;
    if let Some(version) = versions.get(&schema.provider_info.name) {
        schema.provider_info.version = version.clone();
    }

    if options.with_docs {
        let correlator = DocumentCorrelator::new(
            options.config.docs_dir.join(&schema.provider_info.name),
            schema.provider_info.name.clone(),
        );
        if correlator.is_available() {
            enrich_provider_schema(&mut schema, &correlator);
        } else {
            warn!(
                provider = %schema.provider_info.name,
                path = %correlator.docs_dir().display(),
                "documentation directory not found; skipping enrichment"
            );
        }
    }

    writer
        .write(&schema, options.layout)
        .with_context(|| format!("write artifacts for {full_name}"))
}

fn lock_versions(config: &GeneratorConfig) -> IndexMap<String, String> {
    let start = config.schema_path.parent().unwrap_or(config.project_root.as_path());
    match find_lock_file(start).or_else(|| find_lock_file(&config.project_root)) {
        Some(path) => {
            info!(path = %path.display(), "using provider versions from lock file");
            read_lock_versions(&path)
        }
        None => IndexMap::new(),
    }
}
