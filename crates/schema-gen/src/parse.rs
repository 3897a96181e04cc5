//! Provider schema JSON (`terraform providers schema -json`) to schema tree.

use indexmap::IndexMap;
use provdoc_types::{
    Attribute, AttributeMap, Block, BlockMap, LocalizedText, NestingMode, ProviderInfo, ProviderSchema, Resource,
    ResourceKind,
};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

type Object = Map<String, Value>;

/// Nested block name that marks a resource as having configurable timeouts.
const TIMEOUTS_BLOCK: &str = "timeouts";

#[derive(Debug, Error)]
pub enum SchemaParseError {
    #[error("provider schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("provider schema has no `provider_schemas` object")]
    MissingProviderSchemas,
    #[error("provider `{0}` is not present in the schema")]
    UnknownProvider(String),
    #[error("{path}: expected {expected}")]
    Malformed { path: String, expected: &'static str },
    #[error("{path}: unknown nesting mode `{mode}`")]
    UnknownNestingMode { path: String, mode: String },
}

/// Parses the raw JSON text of a schema export.
pub fn parse_schema_document(content: &str) -> Result<Value, SchemaParseError> {
    Ok(serde_json::from_str(content)?)
}

fn provider_schemas(root: &Value) -> Result<&Object, SchemaParseError> {
    root.get("provider_schemas")
        .and_then(Value::as_object)
        .ok_or(SchemaParseError::MissingProviderSchemas)
}

/// Full provider names (`registry.terraform.io/<namespace>/<name>`) in file order.
pub fn provider_names(root: &Value) -> Result<Vec<String>, SchemaParseError> {
    Ok(provider_schemas(root)?.keys().cloned().collect())
}

/// Parses every provider in the export; the first malformed provider fails the call.
pub fn parse_provider_schemas(root: &Value) -> Result<Vec<ProviderSchema>, SchemaParseError> {
    provider_names(root)?
        .iter()
        .map(|full_name| parse_provider(root, full_name))
        .collect()
}

/// Parses one provider of the export.
pub fn parse_provider(root: &Value, full_name: &str) -> Result<ProviderSchema, SchemaParseError> {
    let entry = provider_schemas(root)?
        .get(full_name)
        .ok_or_else(|| SchemaParseError::UnknownProvider(full_name.to_string()))?;
    let entry = as_object(entry, full_name)?;

    let mut schema = ProviderSchema::new(ProviderInfo::from_full_name(full_name));
    let provider_name = schema.provider_info.name.clone();

    if let Some(config) = entry.get("provider") {
        let path = format!("{full_name}.provider");
        schema.provider_config = Some(parse_resource(&provider_name, ResourceKind::Provider, config, &path)?);
    }

    for (key, kind) in [
        ("resource_schemas", ResourceKind::Resource),
        ("data_source_schemas", ResourceKind::DataSource),
        ("ephemeral_resource_schemas", ResourceKind::EphemeralResource),
    ] {
        let Some(nodes) = entry.get(key) else {
            continue;
        };
        let nodes = as_object(nodes, &format!("{full_name}.{key}"))?;
        let mut parsed = IndexMap::with_capacity(nodes.len());
        for (name, node) in nodes {
            let path = format!("{full_name}.{key}.{name}");
            parsed.insert(name.clone(), parse_resource(name, kind, node, &path)?);
        }
        if let Some(collection) = schema.collection_mut(kind) {
            *collection = parsed;
        }
    }

    if let Some(functions) = entry.get("functions") {
        schema.functions = as_object(functions, &format!("{full_name}.functions"))?
            .iter()
            .map(|(name, function)| (name.clone(), function.clone()))
            .collect();
    }

    debug!(
        provider = %full_name,
        resources = schema.resources.len(),
        data_sources = schema.data_sources.len(),
        ephemeral_resources = schema.ephemeral_resources.len(),
        "parsed provider schema"
    );
    Ok(schema)
}

fn parse_resource(name: &str, kind: ResourceKind, value: &Value, path: &str) -> Result<Resource, SchemaParseError> {
    let node = as_object(value, path)?;
    let empty = Object::new();
    let block = match node.get("block") {
        Some(block) => as_object(block, &format!("{path}.block"))?,
        None => &empty,
    };

    let (attributes, block_types) = parse_block_body(block, path)?;
    Ok(Resource {
        name: name.to_string(),
        kind,
        version: node.get("version").and_then(Value::as_i64).unwrap_or_default(),
        description: description_of(block),
        timeouts_configurable: block_types.contains_key(TIMEOUTS_BLOCK),
        deprecated: flag(block, "deprecated"),
        attributes,
        block_types,
    })
}

fn parse_block_body(block: &Object, path: &str) -> Result<(AttributeMap, BlockMap), SchemaParseError> {
    let mut attributes = AttributeMap::new();
    if let Some(raw) = block.get("attributes") {
        for (name, value) in as_object(raw, &format!("{path}.attributes"))? {
            let attribute_path = format!("{path}.attributes.{name}");
            attributes.insert(name.clone(), parse_attribute(name, value, &attribute_path)?);
        }
    }

    let mut block_types = BlockMap::new();
    if let Some(raw) = block.get("block_types") {
        for (name, value) in as_object(raw, &format!("{path}.block_types"))? {
            let block_path = format!("{path}.block_types.{name}");
            block_types.insert(name.clone(), parse_block_type(name, value, &block_path)?);
        }
    }
    Ok((attributes, block_types))
}

fn parse_attribute(name: &str, value: &Value, path: &str) -> Result<Attribute, SchemaParseError> {
    let node = as_object(value, path)?;
    let r#type = node
        .get("type")
        .or_else(|| node.get("nested_type"))
        .cloned()
        .unwrap_or_else(|| Value::String("string".into()));

    let mut attribute = Attribute::new(name, r#type);
    attribute.description = description_of(node);
    attribute.required = flag(node, "required");
    attribute.optional = flag(node, "optional");
    attribute.computed = flag(node, "computed");
    attribute.sensitive = flag(node, "sensitive");
    attribute.deprecated = flag(node, "deprecated");
    attribute.deprecation_message = node
        .get("deprecation_message")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(attribute)
}

fn parse_block_type(name: &str, value: &Value, path: &str) -> Result<Block, SchemaParseError> {
    let node = as_object(value, path)?;
    let nesting_mode = match node.get("nesting_mode").and_then(Value::as_str) {
        None => NestingMode::default(),
        Some(label) => NestingMode::parse(label).ok_or_else(|| SchemaParseError::UnknownNestingMode {
            path: path.to_string(),
            mode: label.to_string(),
        })?,
    };
    let empty = Object::new();
    let inner = match node.get("block") {
        Some(inner) => as_object(inner, &format!("{path}.block"))?,
        None => &empty,
    };

    let (attributes, block_types) = parse_block_body(inner, path)?;
    let mut description = description_of(inner);
    if description.is_empty() {
        description = description_of(node);
    }

    let mut block = Block::new(name, nesting_mode);
    block.description = description;
    block.attributes = attributes;
    block.block_types = block_types;
    block.min_items = node.get("min_items").and_then(Value::as_u64);
    block.max_items = node.get("max_items").and_then(Value::as_u64);
    Ok(block)
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Object, SchemaParseError> {
    value.as_object().ok_or_else(|| SchemaParseError::Malformed {
        path: path.to_string(),
        expected: "a JSON object",
    })
}

fn description_of(node: &Object) -> LocalizedText {
    node.get("description").map(LocalizedText::from_value).unwrap_or_default()
}

fn flag(node: &Object, key: &str) -> bool {
    node.get(key).and_then(Value::as_bool).unwrap_or(false)
}
