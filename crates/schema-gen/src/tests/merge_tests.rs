use provdoc_types::{Attribute, Block, LocalizedText, NestingMode, ProviderSchema, Resource, ResourceKind};
use serde_json::json;

use super::widget_export;
use crate::merge::*;
use crate::parse::parse_provider;

fn demo_schema() -> ProviderSchema {
    parse_provider(&widget_export(), "registry.terraform.io/acme/demo").expect("fixture parses")
}

fn translated(mut schema: ProviderSchema) -> ProviderSchema {
    let widget = schema.resources.get_mut("demo_widget").expect("widget");
    widget.description.ja_jp = "ウィジェット".into();
    widget.attributes["size"].description = LocalizedText::english("Widget size.");
    widget.attributes["size"].description.ja_jp = "こんにちは".into();
    widget.block_types["mount"].attributes["path"].description.ja_jp = "パス".into();
    schema
}

#[test]
fn merging_a_tree_with_itself_is_identity() {
    let tree = translated(demo_schema());
    assert_eq!(merge_provider_schema(&tree, &tree), tree);

    let widget = &tree.resources["demo_widget"];
    assert_eq!(merge_resource(widget, widget), *widget);
}

#[test]
fn keys_missing_from_new_tree_are_dropped() {
    let existing = translated(demo_schema());
    let mut new = demo_schema();
    let widget = new.resources.get_mut("demo_widget").expect("widget");
    widget.attributes.shift_remove("labels");
    widget.block_types["mount"].block_types.shift_remove("options");
    new.data_sources.clear();

    let merged = merge_provider_schema(&existing, &new);
    let merged_widget = &merged.resources["demo_widget"];
    assert!(!merged_widget.attributes.contains_key("labels"));
    assert!(!merged_widget.block_types["mount"].block_types.contains_key("options"));
    assert!(merged.data_sources.is_empty());
    assert_eq!(merged_widget.block_types["mount"].attributes["path"].description.ja_jp, "パス");
}

#[test]
fn translation_survives_when_english_is_unchanged() {
    let existing = translated(demo_schema());
    let mut new = demo_schema();
    new.resources["demo_widget"].attributes["size"].description = LocalizedText::english("Widget size.");

    let merged = merge_provider_schema(&existing, &new);
    let size = &merged.resources["demo_widget"].attributes["size"];
    assert_eq!(size.description.en_us, "Widget size.");
    assert_eq!(size.description.ja_jp, "こんにちは");
    assert_eq!(merged.resources["demo_widget"].description.ja_jp, "ウィジェット");
}

#[test]
fn new_english_overwrites_and_structure_comes_from_new() {
    let existing = translated(demo_schema());
    let mut new = demo_schema();
    let size = &mut new.resources["demo_widget"].attributes["size"];
    size.description = LocalizedText::english("Size of the widget in units.");
    size.required = true;
    size.optional = false;
    size.default_value = Some(json!("medium"));

    let merged = merge_provider_schema(&existing, &new);
    let merged_size = &merged.resources["demo_widget"].attributes["size"];
    assert_eq!(merged_size.description.en_us, "Size of the widget in units.");
    assert_eq!(merged_size.description.ja_jp, "こんにちは");
    assert!(merged_size.required && !merged_size.optional);
    assert_eq!(merged_size.default_value, Some(json!("medium")));
}

#[test]
fn nodes_only_in_new_tree_are_kept_verbatim() {
    let existing = demo_schema();
    let mut new = demo_schema();
    let mut gadget = Resource::new("demo_gadget", ResourceKind::Resource);
    gadget.attributes.insert("id".into(), Attribute::new("id", json!("string")));
    new.resources.insert("demo_gadget".into(), gadget.clone());
    new.resources["demo_widget"]
        .block_types
        .insert("extra".into(), Block::new("extra", NestingMode::Set));

    let merged = merge_provider_schema(&existing, &new);
    assert_eq!(merged.resources["demo_gadget"], gadget);
    assert_eq!(merged.resources["demo_widget"].block_types["extra"].nesting_mode, NestingMode::Set);
}

#[test]
fn provider_config_merges_only_when_both_sides_have_one() {
    let mut existing = demo_schema();
    let config = existing.provider_config.as_mut().expect("config");
    config.attributes["region"].description.ja_jp = "リージョン".into();
    let new = demo_schema();

    let merged = merge_provider_schema(&existing, &new);
    let region = &merged.provider_config.as_ref().expect("config").attributes["region"];
    assert_eq!(region.description.ja_jp, "リージョン");

    let mut without_config = demo_schema();
    without_config.provider_config = None;
    assert!(merge_provider_schema(&existing, &without_config).provider_config.is_none());
    assert_eq!(merge_provider_schema(&without_config, &new).provider_config, new.provider_config);
}

#[test]
fn block_merge_keeps_new_item_limits() {
    let mut existing = Block::new("mount", NestingMode::List);
    existing.max_items = Some(1);
    existing.description = LocalizedText::english("Mount.");
    existing.description.ja_jp = "マウント".into();
    let mut new = existing.clone();
    new.max_items = Some(4);
    new.description.ja_jp.clear();

    let merged = merge_block(&existing, &new);
    assert_eq!(merged.max_items, Some(4));
    assert_eq!(merged.description.ja_jp, "マウント");
}
