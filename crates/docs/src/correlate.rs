//! Matching schema nodes to documentation pages by file naming convention.

use std::path::{Path, PathBuf};

use provdoc_types::ResourceKind;
use tracing::{debug, warn};

use crate::bundle::DocBundle;

/// Anything that can hand out a parsed documentation page for a schema node.
pub trait DocumentSource {
    /// The bundle documenting `name`, or `None` when no page exists.
    fn bundle_for(&self, name: &str, kind: ResourceKind) -> Option<DocBundle>;
}

/// Pre-parsed pages keyed by node name, regardless of kind.
#[cfg(test)]
impl DocumentSource for indexmap::IndexMap<String, DocBundle> {
    fn bundle_for(&self, name: &str, _kind: ResourceKind) -> Option<DocBundle> {
        self.get(name).cloned()
    }
}

/// Looks up pages in one provider's documentation directory.
///
/// Layouts produced by registry downloads and by hand-maintained trees are
/// both accepted: flat `<name>.md` files, or one subdirectory per category
/// with file names that may or may not repeat the provider prefix.
#[derive(Debug, Clone)]
pub struct DocumentCorrelator {
    docs_dir: PathBuf,
    provider: String,
}

impl DocumentCorrelator {
    pub fn new(docs_dir: impl Into<PathBuf>, provider: impl Into<String>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            provider: provider.into(),
        }
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    /// Whether the documentation directory exists at all.
    pub fn is_available(&self) -> bool {
        self.docs_dir.is_dir()
    }

    /// Candidate page locations for a node, in lookup order.
    pub fn candidate_paths(&self, name: &str, kind: ResourceKind) -> Vec<PathBuf> {
        let file_name = format!("{name}.md");

        if kind == ResourceKind::Provider {
            return vec![
                self.docs_dir.join(format!("{}.md", self.provider)),
                self.docs_dir.join("index.md"),
            ];
        }

        let mut candidates = vec![self.docs_dir.join(&file_name)];
        let prefix = format!("{}_", self.provider);
        let short_name = name.strip_prefix(&prefix).filter(|short| !short.is_empty());
        for category in category_dirs(kind) {
            let category_dir = self.docs_dir.join(category);
            candidates.push(category_dir.join(&file_name));
            if let Some(short_name) = short_name {
                candidates.push(category_dir.join(format!("{short_name}.md")));
            }
        }
        candidates
    }

    /// The first existing candidate page.
    pub fn locate(&self, name: &str, kind: ResourceKind) -> Option<PathBuf> {
        self.candidate_paths(name, kind).into_iter().find(|path| path.is_file())
    }
}

impl DocumentSource for DocumentCorrelator {
    fn bundle_for(&self, name: &str, kind: ResourceKind) -> Option<DocBundle> {
        let Some(path) = self.locate(name, kind) else {
            debug!(name = %name, kind = %kind, "no documentation page found");
            return None;
        };
        match DocBundle::parse_file(&path) {
            Ok(bundle) => {
                debug!(name = %name, path = %path.display(), "correlated documentation page");
                Some(bundle)
            }
            Err(error) => {
                warn!(name = %name, error = %error, "skipping unreadable documentation page");
                None
            }
        }
    }
}

fn category_dirs(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Resource => &["resources"],
        ResourceKind::DataSource => &["data_sources", "data-sources"],
        ResourceKind::EphemeralResource => &["ephemeral_resources", "ephemeral-resources"],
        ResourceKind::Provider => &[],
    }
}
