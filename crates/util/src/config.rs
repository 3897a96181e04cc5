//! Generator configuration.
//!
//! Paths come from environment variables with project-relative defaults. The
//! project root is the nearest ancestor of the working directory holding a
//! `.git` entry; relative values resolve against it. Command-line flags are
//! applied by the caller on top of the loaded values.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{find_project_root, resolve_against};

/// Environment variable overriding the provider schema JSON path.
pub const SCHEMA_PATH_ENV: &str = "PROVDOC_SCHEMA_PATH";
/// Environment variable overriding the documentation root directory.
pub const DOCS_DIR_ENV: &str = "PROVDOC_DOCS_DIR";
/// Environment variable overriding the YAML output directory.
pub const OUTPUT_DIR_ENV: &str = "PROVDOC_OUTPUT_DIR";
/// Environment variable holding the default log filter.
pub const LOG_LEVEL_ENV: &str = "PROVDOC_LOG_LEVEL";

pub const DEFAULT_SCHEMA_PATH: &str = "etc/providers/providers.json";
pub const DEFAULT_DOCS_DIR: &str = "etc/docs/providers";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Error surfaced when preparing configured directories fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolved locations and defaults for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorConfig {
    pub project_root: PathBuf,
    /// Provider schema JSON (`terraform providers schema -json` output).
    pub schema_path: PathBuf,
    /// Root of the per-provider documentation directories.
    pub docs_dir: PathBuf,
    /// Directory receiving generated YAML.
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl GeneratorConfig {
    /// Loads configuration relative to the current working directory.
    pub fn load() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from(&cwd)
    }

    /// Loads configuration as if the working directory were `start`.
    pub fn load_from(start: &Path) -> Self {
        let project_root = find_project_root(start).unwrap_or_else(|| start.to_path_buf());
        debug!(project_root = %project_root.display(), "resolved project root");

        let schema_path = resolve_against(&project_root, &env_or(SCHEMA_PATH_ENV, DEFAULT_SCHEMA_PATH));
        let docs_dir = resolve_against(&project_root, &env_or(DOCS_DIR_ENV, DEFAULT_DOCS_DIR));
        let output_dir = resolve_against(&project_root, &env_or(OUTPUT_DIR_ENV, DEFAULT_OUTPUT_DIR));
        let log_level = env_or(LOG_LEVEL_ENV, DEFAULT_LOG_LEVEL);

        Self {
            project_root,
            schema_path,
            docs_dir,
            output_dir,
            log_level,
        }
    }

    /// Creates the documentation and output directories when missing.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        for dir in [&self.docs_dir, &self.output_dir] {
            fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}
