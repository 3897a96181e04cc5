//! Schema tree for one provider.
//!
//! The tree is built once from the provider schema JSON, enriched in place
//! from documentation, and persisted as YAML. Node-to-child maps are
//! [`IndexMap`]s so the artifact keeps schema order between runs.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::LocalizedText;

/// Registry host used when deriving a provider's fully-qualified name.
pub const DEFAULT_REGISTRY_HOST: &str = "registry.terraform.io";

/// Attribute name → attribute.
pub type AttributeMap = IndexMap<String, Attribute>;

/// Block name → nested block.
pub type BlockMap = IndexMap<String, Block>;

/// A single argument or attribute of a resource or block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// Scalar type tag (`"string"`) or a structural descriptor (`["list", "string"]`).
    #[serde(default)]
    pub r#type: Value,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub sensitive: bool,
    /// Default recovered from documentation prose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Allowed values recovered from documentation prose, first-seen order.
    #[serde(default)]
    pub possible_values: Vec<Value>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, r#type: Value) -> Self {
        Self {
            name: name.into(),
            r#type,
            ..Self::default()
        }
    }

    /// Replaces the possible values, dropping duplicates but keeping first-seen order.
    pub fn set_possible_values<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for value in values.into_iter().map(Into::into) {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        self.possible_values = unique;
    }
}

/// How repeated instances of a nested block are collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingMode {
    #[default]
    Single,
    Group,
    List,
    Set,
    Map,
}

impl NestingMode {
    /// Parses the nesting mode label used by provider schema JSON.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "single" => Some(Self::Single),
            "group" => Some(Self::Group),
            "list" => Some(Self::List),
            "set" => Some(Self::Set),
            "map" => Some(Self::Map),
            _ => None,
        }
    }
}

/// A nested block. Blocks nest to arbitrary depth through `block_types`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    #[serde(default)]
    pub nesting_mode: NestingMode,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub block_types: BlockMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Block {
    pub fn new(name: impl Into<String>, nesting_mode: NestingMode) -> Self {
        Self {
            name: name.into(),
            nesting_mode,
            ..Self::default()
        }
    }
}

/// What a [`Resource`] node describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    #[default]
    Resource,
    DataSource,
    EphemeralResource,
    Provider,
}

impl ResourceKind {
    /// Snake-case label, also used as the artifact key in split layout.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::DataSource => "data_source",
            Self::EphemeralResource => "ephemeral_resource",
            Self::Provider => "provider",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource, data source, ephemeral resource, or the provider's own
/// configuration block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ResourceKind,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub block_types: BlockMap,
    #[serde(default)]
    pub timeouts_configurable: bool,
    #[serde(default)]
    pub deprecated: bool,
}

impl Resource {
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }
}

/// Identity of a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl ProviderInfo {
    /// Splits `<host>/<namespace>/<name>` (host optional) into its parts.
    ///
    /// A bare name yields the namespace `unknown`.
    pub fn from_full_name(full_name: &str) -> Self {
        let segments: Vec<&str> = full_name.trim().split('/').filter(|segment| !segment.is_empty()).collect();
        let (namespace, name) = match segments.as_slice() {
            [] => ("unknown", "unknown"),
            [name] => ("unknown", *name),
            [.., namespace, name] => (*namespace, *name),
        };
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            version: String::new(),
        }
    }

    /// Fully-qualified lookup name, `registry.terraform.io/<namespace>/<name>`.
    pub fn full_name(&self) -> String {
        format!("{}/{}/{}", DEFAULT_REGISTRY_HOST, self.namespace, self.name)
    }
}

/// Every schema a single provider exposes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSchema {
    pub provider_info: ProviderInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<Resource>,
    #[serde(default)]
    pub resources: IndexMap<String, Resource>,
    #[serde(default)]
    pub data_sources: IndexMap<String, Resource>,
    #[serde(default)]
    pub ephemeral_resources: IndexMap<String, Resource>,
    /// Provider functions, passed through without interpretation.
    #[serde(default)]
    pub functions: IndexMap<String, Value>,
}

impl ProviderSchema {
    pub fn new(provider_info: ProviderInfo) -> Self {
        Self {
            provider_info,
            ..Self::default()
        }
    }

    /// The resource map holding nodes of `kind`. The provider kind has no map.
    pub fn collection(&self, kind: ResourceKind) -> Option<&IndexMap<String, Resource>> {
        match kind {
            ResourceKind::Resource => Some(&self.resources),
            ResourceKind::DataSource => Some(&self.data_sources),
            ResourceKind::EphemeralResource => Some(&self.ephemeral_resources),
            ResourceKind::Provider => None,
        }
    }

    pub fn collection_mut(&mut self, kind: ResourceKind) -> Option<&mut IndexMap<String, Resource>> {
        match kind {
            ResourceKind::Resource => Some(&mut self.resources),
            ResourceKind::DataSource => Some(&mut self.data_sources),
            ResourceKind::EphemeralResource => Some(&mut self.ephemeral_resources),
            ResourceKind::Provider => None,
        }
    }
}
