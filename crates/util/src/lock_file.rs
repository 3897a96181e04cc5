//! Provider version lookup from a dependency lock file.
//!
//! `terraform init` pins provider versions in `.terraform.lock.hcl`:
//!
//! ```text
//! provider "registry.terraform.io/hashicorp/aws" {
//!   version     = "6.19.0"
//!   constraints = ">= 5.0.0"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// File name of the dependency lock file.
pub const LOCK_FILE_NAME: &str = ".terraform.lock.hcl";

static PROVIDER_STANZA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"provider\s+"(?:[\w.-]+/)?[\w-]+/([\w-]+)"\s+\{[^}]*?version\s+=\s+"([^"]+)""#)
        .expect("provider stanza regex should compile")
});

/// Walks up from `start` looking for the lock file.
///
/// Each level is checked directly and under `etc/terraform/`.
pub fn find_lock_file(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let direct = dir.join(LOCK_FILE_NAME);
        if direct.is_file() {
            return Some(direct);
        }
        let nested = dir.join("etc").join("terraform").join(LOCK_FILE_NAME);
        if nested.is_file() {
            return Some(nested);
        }
    }
    None
}

/// Maps provider short names (`aws`) to their pinned versions.
pub fn parse_lock_versions(content: &str) -> IndexMap<String, String> {
    PROVIDER_STANZA_REGEX
        .captures_iter(content)
        .map(|captures| (captures[1].to_string(), captures[2].to_string()))
        .collect()
}

/// Reads a lock file; a missing or unreadable file yields no versions.
pub fn read_lock_versions(path: &Path) -> IndexMap<String, String> {
    match fs::read_to_string(path) {
        Ok(content) => parse_lock_versions(&content),
        Err(error) => {
            debug!(path = %path.display(), error = %error, "lock file not readable");
            IndexMap::new()
        }
    }
}
