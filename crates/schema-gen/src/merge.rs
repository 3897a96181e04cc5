//! Differential merge of a freshly parsed tree into a previously generated one.
//!
//! Structure always comes from the new tree: attributes and blocks that the
//! new tree no longer has are dropped. Only narrative text survives from the
//! prior tree, through [`merge_localized`].

use indexmap::IndexMap;
use provdoc_types::{Attribute, AttributeMap, Block, BlockMap, EN_US, LocalizedText, ProviderSchema, Resource};

/// Merges two descriptions.
///
/// Starts from the existing text. New English replaces existing English
/// when it is non-empty and different; translations are left alone even if
/// the English changed.
///
/// This extends plain backfilling: an empty existing tag counts as
/// untranslated, so a non-empty translation carried by the new tree fills
/// it, and tags only the new side knows are added. A non-empty existing
/// translation always wins. Freshly parsed trees carry no translations, so
/// for them this reduces to keeping the existing text.
pub fn merge_localized(existing: &LocalizedText, new: &LocalizedText) -> LocalizedText {
    let mut merged = existing.clone();

    if !new.en_us.is_empty() && new.en_us != existing.en_us {
        merged.en_us = new.en_us.clone();
    }

    for (language, text) in new.iter() {
        if language == EN_US || text.is_empty() {
            continue;
        }
        if merged.get(language).is_none_or(str::is_empty) {
            merged.set(language, text);
        }
    }
    merged
}

/// The new attribute with its description merged against the existing one.
pub fn merge_attribute(existing: &Attribute, new: &Attribute) -> Attribute {
    Attribute {
        description: merge_localized(&existing.description, &new.description),
        ..new.clone()
    }
}

/// The new block with attributes, nested blocks and description merged.
pub fn merge_block(existing: &Block, new: &Block) -> Block {
    Block {
        description: merge_localized(&existing.description, &new.description),
        attributes: merge_attributes(&existing.attributes, &new.attributes),
        block_types: merge_blocks(&existing.block_types, &new.block_types),
        ..new.clone()
    }
}

/// The new resource with attributes, nested blocks and description merged.
pub fn merge_resource(existing: &Resource, new: &Resource) -> Resource {
    Resource {
        description: merge_localized(&existing.description, &new.description),
        attributes: merge_attributes(&existing.attributes, &new.attributes),
        block_types: merge_blocks(&existing.block_types, &new.block_types),
        ..new.clone()
    }
}

/// Merges a whole provider: `provider_config` and every resource map entry.
/// Provider identity and functions always come from the new tree.
pub fn merge_provider_schema(existing: &ProviderSchema, new: &ProviderSchema) -> ProviderSchema {
    let provider_config = match (&existing.provider_config, &new.provider_config) {
        (Some(existing), Some(new)) => Some(merge_resource(existing, new)),
        (_, new) => new.clone(),
    };

    ProviderSchema {
        provider_info: new.provider_info.clone(),
        provider_config,
        resources: merge_resources(&existing.resources, &new.resources),
        data_sources: merge_resources(&existing.data_sources, &new.data_sources),
        ephemeral_resources: merge_resources(&existing.ephemeral_resources, &new.ephemeral_resources),
        functions: new.functions.clone(),
    }
}

fn merge_attributes(existing: &AttributeMap, new: &AttributeMap) -> AttributeMap {
    merge_map(existing, new, merge_attribute)
}

fn merge_blocks(existing: &BlockMap, new: &BlockMap) -> BlockMap {
    merge_map(existing, new, merge_block)
}

fn merge_resources(
    existing: &IndexMap<String, Resource>,
    new: &IndexMap<String, Resource>,
) -> IndexMap<String, Resource> {
    merge_map(existing, new, merge_resource)
}

// Keys and their order follow `new`.
fn merge_map<T: Clone>(
    existing: &IndexMap<String, T>,
    new: &IndexMap<String, T>,
    merge: impl Fn(&T, &T) -> T,
) -> IndexMap<String, T> {
    new.iter()
        .map(|(name, node)| {
            let merged = match existing.get(name) {
                Some(previous) => merge(previous, node),
                None => node.clone(),
            };
            (name.clone(), merged)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(en_us: &str, ja_jp: &str) -> LocalizedText {
        let mut localized = LocalizedText::english(en_us);
        localized.ja_jp = ja_jp.to_string();
        localized
    }

    #[test]
    fn new_english_replaces_old_but_keeps_translation() {
        let merged = merge_localized(&text("Old", "古い"), &text("New", ""));
        assert_eq!(merged, text("New", "古い"));
    }

    #[test]
    fn empty_new_english_keeps_existing() {
        let merged = merge_localized(&text("Hand written", ""), &text("", ""));
        assert_eq!(merged.en_us, "Hand written");
    }

    #[test]
    fn existing_translation_beats_new_translation() {
        let merged = merge_localized(&text("Name", "名前"), &text("Name", "名称"));
        assert_eq!(merged.ja_jp, "名前");

        let fresh = merge_localized(&text("Name", ""), &text("Name", ""));
        assert_eq!(fresh, text("Name", ""));
    }

    #[test]
    fn empty_existing_tags_are_filled_from_new() {
        let mut new = text("Name", "名前");
        new.set("fr_fr", "Nom");
        let mut existing = text("Name", "");
        existing.set("de_de", "Name");

        let merged = merge_localized(&existing, &new);
        assert_eq!(merged.ja_jp, "名前");
        assert_eq!(merged.get("fr_fr"), Some("Nom"));
        assert_eq!(merged.get("de_de"), Some("Name"));
    }

    #[test]
    fn existing_translation_wins_over_new_translation() {
        let merged = merge_localized(&text("Name", "手動"), &text("Name", "自動"));
        assert_eq!(merged.ja_jp, "手動");
    }
}
