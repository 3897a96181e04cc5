use std::fs;
use std::path::{Path, PathBuf};

use provdoc_types::{ProviderInfo, ProviderSchema, Resource, ResourceKind};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::merge::{merge_provider_schema, merge_resource};

/// File holding the provider configuration in split layout.
pub const PROVIDER_FILE_NAME: &str = "provider.yaml";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How a provider's artifact is laid out on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// `<output>/<provider>.yaml` holding the whole provider.
    #[default]
    Single,
    /// `<output>/<provider>/` with one file per node.
    Split,
}

/// One file of the split layout: provider identity plus exactly one node
/// under the key naming its kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub provider_info: ProviderInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral_resource: Option<Resource>,
}

impl NodeDocument {
    pub fn new(provider_info: ProviderInfo, node: Resource) -> Self {
        let mut document = Self {
            provider_info,
            ..Self::default()
        };
        let kind = node.kind;
        *document.slot_mut(kind) = Some(node);
        document
    }

    /// The node stored under `kind`'s key.
    pub fn node(&self, kind: ResourceKind) -> Option<&Resource> {
        match kind {
            ResourceKind::Provider => self.provider_config.as_ref(),
            ResourceKind::Resource => self.resource.as_ref(),
            ResourceKind::DataSource => self.data_source.as_ref(),
            ResourceKind::EphemeralResource => self.ephemeral_resource.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut Option<Resource> {
        match kind {
            ResourceKind::Provider => &mut self.provider_config,
            ResourceKind::Resource => &mut self.resource,
            ResourceKind::DataSource => &mut self.data_source,
            ResourceKind::EphemeralResource => &mut self.ephemeral_resource,
        }
    }
}

/// Files produced by one provider write. A node file that cannot be written
/// is recorded in `failed` and the remaining nodes are still written.
#[derive(Debug, Default)]
pub struct WriteOutcome {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, ArtifactError)>,
}

impl WriteOutcome {
    fn record(&mut self, path: PathBuf, result: Result<PathBuf, ArtifactError>) {
        match result {
            Ok(written) => self.written.push(written),
            Err(failure) => {
                error!(path = %path.display(), error = %failure, "failed to write node artifact");
                self.failed.push((path, failure));
            }
        }
    }
}

/// Directory of split-layout files for nodes of `kind`.
pub fn category_dir(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Provider => "",
        ResourceKind::Resource => "resources",
        ResourceKind::DataSource => "data_sources",
        ResourceKind::EphemeralResource => "ephemeral_resources",
    }
}

/// Reads a previously written artifact. A missing file is no baseline; so is
/// a file that cannot be read or parsed, which is logged.
pub fn load_existing<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.is_file() {
        return None;
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "failed to read existing artifact");
            return None;
        }
    };
    match serde_yaml::from_str(&content) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(path = %path.display(), error = %error, "failed to parse existing artifact");
            None
        }
    }
}

/// Writes provider artifacts, merging with what is already on disk unless
/// differential mode is off.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
    differential: bool,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>, differential: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            differential,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `schema` in `layout`. An error means nothing could be written
    /// for the provider; per-node failures are in the outcome.
    pub fn write(&self, schema: &ProviderSchema, layout: Layout) -> Result<WriteOutcome, ArtifactError> {
        match layout {
            Layout::Single => self.write_single(schema).map(|path| WriteOutcome {
                written: vec![path],
                failed: Vec::new(),
            }),
            Layout::Split => self.write_split(schema),
        }
    }

    /// Writes `<output>/<provider>.yaml`.
    pub fn write_single(&self, schema: &ProviderSchema) -> Result<PathBuf, ArtifactError> {
        create_dir(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.yaml", schema.provider_info.name));

        let baseline = self.baseline::<ProviderSchema>(&path);
        let merged;
        let document = match &baseline {
            Some(existing) => {
                info!(provider = %schema.provider_info.name, "merging with existing artifact");
                merged = merge_provider_schema(existing, schema);
                &merged
            }
            None => schema,
        };

        write_yaml(&path, document)?;
        info!(provider = %schema.provider_info.name, path = %path.display(), "wrote provider artifact");
        Ok(path)
    }

    /// Writes `<output>/<provider>/provider.yaml` and one file per resource,
    /// data source and ephemeral resource. Only a missing provider directory
    /// fails the whole call.
    pub fn write_split(&self, schema: &ProviderSchema) -> Result<WriteOutcome, ArtifactError> {
        let provider_dir = self.output_dir.join(&schema.provider_info.name);
        create_dir(&provider_dir)?;
        let mut outcome = WriteOutcome::default();

        if let Some(config) = &schema.provider_config {
            let path = provider_dir.join(PROVIDER_FILE_NAME);
            let result = self.write_node(&path, &schema.provider_info, config);
            outcome.record(path, result);
        }

        for kind in [ResourceKind::Resource, ResourceKind::DataSource, ResourceKind::EphemeralResource] {
            let Some(nodes) = schema.collection(kind).filter(|nodes| !nodes.is_empty()) else {
                continue;
            };
            let dir = provider_dir.join(category_dir(kind));
            if let Err(failure) = create_dir(&dir) {
                outcome.record(dir, Err(failure));
                continue;
            }
            for (name, node) in nodes {
                let path = dir.join(format!("{name}.yaml"));
                let result = self.write_node(&path, &schema.provider_info, node);
                outcome.record(path, result);
            }
            debug!(provider = %schema.provider_info.name, kind = %kind, count = nodes.len(), "wrote node artifacts");
        }

        info!(
            provider = %schema.provider_info.name,
            files = outcome.written.len(),
            failed = outcome.failed.len(),
            "wrote split provider artifacts"
        );
        Ok(outcome)
    }

    fn write_node(&self, path: &Path, provider_info: &ProviderInfo, node: &Resource) -> Result<PathBuf, ArtifactError> {
        let merged = self
            .baseline::<NodeDocument>(path)
            .and_then(|existing| existing.node(node.kind).map(|previous| merge_resource(previous, node)));
        let document = NodeDocument::new(provider_info.clone(), merged.unwrap_or_else(|| node.clone()));
        write_yaml(path, &document)?;
        Ok(path.to_path_buf())
    }

    fn baseline<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        if self.differential { load_existing(path) } else { None }
    }
}

fn create_dir(path: &Path) -> Result<(), ArtifactError> {
    fs::create_dir_all(path).map_err(|source| ArtifactError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn write_yaml<T: Serialize>(path: &Path, document: &T) -> Result<(), ArtifactError> {
    let yaml = serde_yaml::to_string(document).map_err(|source| ArtifactError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, yaml).map_err(|source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    })
}
