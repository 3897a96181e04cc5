//! In-place enrichment of schema nodes with documentation facts.
//!
//! All lookups are best effort. The only rule for competing prose is "longer
//! text wins", a heuristic stand-in for "more detailed" that is kept as is.
//! Missing documentation for a nested block's attribute is flagged with a
//! warning; missing documentation for a top-level attribute is not.

use provdoc_types::{Attribute, BlockMap, LocalizedText, ProviderSchema, Resource, ResourceKind};
use tracing::{debug, info};

use crate::bundle::DocBundle;
use crate::correlate::DocumentSource;
use crate::extract::{AttributeFacts, text_len};

pub const UNDOCUMENTED_ATTRIBUTE_WARNING: &str = "No documentation found for this attribute";
pub const MISSING_BLOCK_LINK_WARNING: &str = "No documentation link found in Argument Reference";

/// Warning for an attribute absent from its block's dedicated section.
pub fn missing_in_block_section_warning(block_name: &str) -> String {
    format!("No documentation found in '{block_name}' section")
}

/// Warning for a block whose linked section yielded no attributes.
pub fn unresolved_block_link_warning(anchor: &str) -> String {
    format!("Documentation link found (#{anchor}) but could not extract attributes")
}

/// Counts reported after enriching a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    /// Nodes for which a documentation page was found and applied.
    pub documented: usize,
    /// Nodes left untouched because no page exists.
    pub undocumented: usize,
}

/// Enriches every node of `schema` with the page `source` returns for it.
/// Nodes without a page are left exactly as they are.
pub fn enrich_provider_schema<S>(schema: &mut ProviderSchema, source: &S) -> EnrichmentSummary
where
    S: DocumentSource + ?Sized,
{
    let mut summary = EnrichmentSummary::default();
    let provider = schema.provider_info.name.clone();

    let mut visit = |name: &str, resource: &mut Resource| match source.bundle_for(name, resource.kind) {
        Some(bundle) => {
            enrich_resource(resource, &bundle);
            summary.documented += 1;
        }
        None => summary.undocumented += 1,
    };

    if let Some(config) = schema.provider_config.as_mut() {
        visit(provider.as_str(), config);
    }
    for kind in [ResourceKind::Resource, ResourceKind::DataSource, ResourceKind::EphemeralResource] {
        if let Some(collection) = schema.collection_mut(kind) {
            for (name, resource) in collection.iter_mut() {
                visit(name.as_str(), resource);
            }
        }
    }

    info!(
        provider = %provider,
        documented = summary.documented,
        undocumented = summary.undocumented,
        "enriched provider with documentation"
    );
    summary
}

/// Applies one documentation page to a resource and its nested blocks.
pub fn enrich_resource(resource: &mut Resource, bundle: &DocBundle) {
    if let Some(description) = bundle.description.as_deref() {
        replace_if_longer(&mut resource.description, description);
    }

    for (name, attribute) in resource.attributes.iter_mut() {
        enrich_from_reference(name, attribute, bundle, false);
    }

    for (name, attribute) in resource.attributes.iter_mut() {
        if let Some(facts) = bundle.attributes.get(name) {
            replace_if_longer(&mut attribute.description, &facts.description);
        }
    }

    enrich_blocks(&mut resource.block_types, bundle);
}

fn enrich_blocks(blocks: &mut BlockMap, bundle: &DocBundle) {
    for (block_name, block) in blocks.iter_mut() {
        if let Some(section_facts) = bundle.block_attributes.get(block_name) {
            debug!(block = %block_name, "using block section documentation");
            for (name, attribute) in block.attributes.iter_mut() {
                match section_facts.get(name) {
                    Some(facts) => apply_facts(attribute, facts),
                    None => attribute.warning = Some(missing_in_block_section_warning(block_name)),
                }
            }
        } else {
            block.warning = Some(match bundle.block_references.get(block_name) {
                Some(anchor) => unresolved_block_link_warning(anchor),
                None => MISSING_BLOCK_LINK_WARNING.to_string(),
            });
            for (name, attribute) in block.attributes.iter_mut() {
                enrich_from_reference(name, attribute, bundle, true);
            }
        }

        enrich_blocks(&mut block.block_types, bundle);
    }
}

// Argument Reference first, then any bullet in the page.
fn enrich_from_reference(name: &str, attribute: &mut Attribute, bundle: &DocBundle, in_block: bool) {
    match bundle.arguments.get(name).or_else(|| bundle.all_attributes.get(name)) {
        Some(facts) => apply_facts(attribute, facts),
        None if in_block => attribute.warning = Some(UNDOCUMENTED_ATTRIBUTE_WARNING.to_string()),
        None => {}
    }
}

fn apply_facts(attribute: &mut Attribute, facts: &AttributeFacts) {
    replace_if_longer(&mut attribute.description, &facts.description);
    if let Some(default_value) = &facts.default_value {
        attribute.default_value = Some(default_value.clone());
    }
    if !facts.possible_values.is_empty() {
        attribute.set_possible_values(facts.possible_values.iter().cloned());
    }
}

fn replace_if_longer(description: &mut LocalizedText, candidate: &str) {
    if text_len(candidate) > text_len(&description.en_us) {
        description.en_us = candidate.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use provdoc_types::{Block, NestingMode, ProviderInfo};
    use serde_json::json;

    const WIDGET_PAGE: &str = "\
## Argument Reference

* `size` - (Optional) The size. Defaults to `medium`. Valid values are `small`, `medium`, `large`.
";

    const INSTANCE_PAGE: &str = "\
---
description: |-
  Provides an EC2 instance resource with many options.
---

## Argument Reference

* `ami` - (Required) AMI to use for the instance.
* `ebs_block_device` - (Optional) See [Block Devices](#block-devices) below.
* `network_interface` - (Optional) See [Network Interfaces](#network-interfaces) below.
* `volume_tags` - (Optional) Map of tags.

## Attributes Reference

* `arn` - ARN of the instance, computed by the provider.

### Block Devices

Each `ebs_block_device` block supports the following:

* `volume_size` - (Optional) Size of the volume in gibibytes. Defaults to 8.

### Network Interfaces

Network interfaces are described on another page.

* `device_index` - (Required) Integer index of the network interface attachment.
";

    fn string_attribute(name: &str) -> Attribute {
        Attribute::new(name, json!("string"))
    }

    fn instance() -> Resource {
        let mut resource = Resource::new("aws_instance", ResourceKind::Resource);
        resource.description = LocalizedText::english("EC2 instance");
        for name in ["ami", "arn", "undocumented_top_level"] {
            resource.attributes.insert(name.into(), string_attribute(name));
        }

        let mut ebs = Block::new("ebs_block_device", NestingMode::Set);
        ebs.attributes.insert("volume_size".into(), string_attribute("volume_size"));
        ebs.attributes.insert("iops".into(), string_attribute("iops"));

        let mut network = Block::new("network_interface", NestingMode::Set);
        network.attributes.insert("device_index".into(), string_attribute("device_index"));

        let mut credit = Block::new("credit_specification", NestingMode::List);
        credit.attributes.insert("cpu_credits".into(), string_attribute("cpu_credits"));
        let mut nested = Block::new("inner", NestingMode::Single);
        nested.attributes.insert("ami".into(), string_attribute("ami"));
        credit.block_types.insert("inner".into(), nested);

        resource.block_types.insert("ebs_block_device".into(), ebs);
        resource.block_types.insert("network_interface".into(), network);
        resource.block_types.insert("credit_specification".into(), credit);
        resource
    }

    #[test]
    fn widget_size_is_enriched_from_argument_reference() {
        let mut widget = Resource::new("widget", ResourceKind::Resource);
        widget.attributes.insert("size".into(), string_attribute("size"));

        enrich_resource(&mut widget, &DocBundle::parse(WIDGET_PAGE));

        let size = &widget.attributes["size"];
        assert_eq!(
            size.description.en_us,
            "(Optional) The size. Defaults to `medium`. Valid values are `small`, `medium`, `large`."
        );
        assert_eq!(size.default_value, Some(json!("medium")));
        assert_eq!(size.possible_values, vec![json!("small"), json!("medium"), json!("large")]);
        assert!(size.warning.is_none());
    }

    #[test]
    fn resource_description_and_computed_attributes_use_longer_text() {
        let mut resource = instance();
        enrich_resource(&mut resource, &DocBundle::parse(INSTANCE_PAGE));

        assert_eq!(resource.description.en_us, "Provides an EC2 instance resource with many options.");
        assert_eq!(resource.attributes["ami"].description.en_us, "(Required) AMI to use for the instance.");
        assert_eq!(resource.attributes["arn"].description.en_us, "ARN of the instance, computed by the provider.");
    }

    #[test]
    fn top_level_misses_stay_silent() {
        let mut resource = instance();
        enrich_resource(&mut resource, &DocBundle::parse(INSTANCE_PAGE));
        let missing = &resource.attributes["undocumented_top_level"];
        assert!(missing.warning.is_none());
        assert!(missing.description.en_us.is_empty());
    }

    #[test]
    fn block_section_documentation_is_authoritative() {
        let mut resource = instance();
        enrich_resource(&mut resource, &DocBundle::parse(INSTANCE_PAGE));

        let ebs = &resource.block_types["ebs_block_device"];
        assert!(ebs.warning.is_none());
        assert_eq!(ebs.attributes["volume_size"].default_value, Some(json!(8)));
        assert_eq!(
            ebs.attributes["iops"].warning.as_deref(),
            Some("No documentation found in 'ebs_block_device' section")
        );
    }

    #[test]
    fn unresolved_link_falls_back_to_flat_lookup() {
        let mut resource = instance();
        enrich_resource(&mut resource, &DocBundle::parse(INSTANCE_PAGE));

        let network = &resource.block_types["network_interface"];
        assert_eq!(
            network.warning.as_deref(),
            Some("Documentation link found (#network-interfaces) but could not extract attributes")
        );
        let device_index = &network.attributes["device_index"];
        assert_eq!(
            device_index.description.en_us,
            "(Required) Integer index of the network interface attachment."
        );
        assert!(device_index.warning.is_none());
    }

    #[test]
    fn unlinked_blocks_are_flagged_and_recursed() {
        let mut resource = instance();
        enrich_resource(&mut resource, &DocBundle::parse(INSTANCE_PAGE));

        let credit = &resource.block_types["credit_specification"];
        assert_eq!(credit.warning.as_deref(), Some(MISSING_BLOCK_LINK_WARNING));
        assert_eq!(credit.attributes["cpu_credits"].warning.as_deref(), Some(UNDOCUMENTED_ATTRIBUTE_WARNING));

        let inner = &credit.block_types["inner"];
        assert_eq!(inner.warning.as_deref(), Some(MISSING_BLOCK_LINK_WARNING));
        assert_eq!(inner.attributes["ami"].description.en_us, "(Required) AMI to use for the instance.");
    }

    #[test]
    fn enrichment_is_idempotent() {
        let bundle = DocBundle::parse(INSTANCE_PAGE);
        let mut once = instance();
        enrich_resource(&mut once, &bundle);
        let mut twice = once.clone();
        enrich_resource(&mut twice, &bundle);
        assert_eq!(once, twice);

        let widget_bundle = DocBundle::parse(WIDGET_PAGE);
        let mut widget = Resource::new("widget", ResourceKind::Resource);
        widget.attributes.insert("size".into(), string_attribute("size"));
        enrich_resource(&mut widget, &widget_bundle);
        enrich_resource(&mut widget, &widget_bundle);
        assert_eq!(widget.attributes["size"].possible_values.len(), 3);
    }

    #[test]
    fn existing_values_are_never_cleared() {
        let mut attribute = string_attribute("mode");
        attribute.description = LocalizedText::english("A much longer hand written description of mode.");
        attribute.default_value = Some(json!("fast"));
        attribute.set_possible_values(["fast", "slow"]);

        apply_facts(&mut attribute, &AttributeFacts::from_argument("Mode."));
        assert_eq!(attribute.description.en_us, "A much longer hand written description of mode.");
        assert_eq!(attribute.default_value, Some(json!("fast")));
        assert_eq!(attribute.possible_values, vec![json!("fast"), json!("slow")]);
    }

    #[test]
    fn provider_schema_skips_nodes_without_pages() {
        let mut schema = ProviderSchema::new(ProviderInfo::from_full_name("registry.terraform.io/acme/demo"));
        let mut widget = Resource::new("demo_widget", ResourceKind::Resource);
        widget.attributes.insert("size".into(), string_attribute("size"));
        let mut gadget = Resource::new("demo_gadget", ResourceKind::Resource);
        let mut block = Block::new("part", NestingMode::List);
        block.attributes.insert("size".into(), string_attribute("size"));
        gadget.block_types.insert("part".into(), block);
        schema.resources.insert("demo_widget".into(), widget);
        schema.resources.insert("demo_gadget".into(), gadget.clone());
        schema.provider_config = Some(Resource::new("demo", ResourceKind::Provider));

        let mut pages = IndexMap::new();
        pages.insert("demo_widget".to_string(), DocBundle::parse(WIDGET_PAGE));

        let summary = enrich_provider_schema(&mut schema, &pages);
        assert_eq!(summary, EnrichmentSummary { documented: 1, undocumented: 2 });
        assert_eq!(schema.resources["demo_widget"].attributes["size"].default_value, Some(json!("medium")));
        assert_eq!(schema.resources["demo_gadget"], gadget);
    }
}
