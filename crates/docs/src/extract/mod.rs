//! Text-pattern extraction over provider documentation pages.
//!
//! Every function here is total: prose that does not follow the expected
//! conventions produces an empty result, never an error.

mod bullets;
pub mod sections;
pub mod values;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use bullets::{BulletEntry, bullet_entries};
pub use sections::{extract_section_by_anchor, generate_anchor};
pub use values::{extract_default_value, extract_possible_values, extract_requirement_markers};

static INTERNAL_LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(#([^)]+)\)").expect("internal link regex should compile"));

/// Structured facts recovered for one documented attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeFacts {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    pub possible_values: Vec<String>,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
}

impl AttributeFacts {
    /// Facts for an input argument: value phrasings and requirement markers.
    pub fn from_argument(description: &str) -> Self {
        let (required, optional) = extract_requirement_markers(description);
        Self {
            description: description.to_string(),
            default_value: extract_default_value(description),
            possible_values: extract_possible_values(description),
            required,
            optional,
            computed: false,
        }
    }

    /// Facts for a read-only output attribute.
    pub fn computed(description: &str) -> Self {
        Self {
            description: description.to_string(),
            computed: true,
            ..Self::default()
        }
    }
}

/// Attribute name to extracted facts, in document order.
pub type FactsMap = IndexMap<String, AttributeFacts>;

fn argument_facts<'a>(entries: impl IntoIterator<Item = BulletEntry<'a>>) -> FactsMap {
    entries
        .into_iter()
        .map(|entry| (entry.name.to_string(), AttributeFacts::from_argument(entry.description)))
        .collect()
}

/// Bullets of the "Argument Reference" section.
pub fn extract_argument_reference(doc: &str) -> FactsMap {
    let Some(section) = sections::argument_reference_section(doc) else {
        debug!("no Argument Reference section");
        return FactsMap::new();
    };
    let facts = argument_facts(bullet_entries(section));
    debug!(count = facts.len(), "extracted arguments");
    facts
}

/// Bullets of the "Attributes Reference" section, tagged as computed.
pub fn extract_attributes_reference(doc: &str) -> FactsMap {
    let Some(section) = sections::attributes_reference_section(doc) else {
        debug!("no Attributes Reference section");
        return FactsMap::new();
    };
    bullet_entries(section)
        .into_iter()
        .map(|entry| (entry.name.to_string(), AttributeFacts::computed(entry.description)))
        .collect()
}

/// Bullets anywhere in the document. Dotted names are cross-references and
/// are skipped; a repeated name keeps its longest description.
pub fn extract_all_attributes(doc: &str) -> FactsMap {
    let mut facts = FactsMap::new();
    for entry in bullet_entries(doc) {
        if entry.name.contains('.') {
            continue;
        }
        let longer = facts
            .get(entry.name)
            .is_none_or(|known| text_len(entry.description) > text_len(&known.description));
        if longer {
            facts.insert(entry.name.to_string(), AttributeFacts::from_argument(entry.description));
        }
    }
    debug!(count = facts.len(), "extracted attributes from whole document");
    facts
}

/// Block name to the anchor of the first internal link in its
/// Argument Reference bullet. Anchors are stored without the leading `#`.
pub fn extract_block_references(doc: &str) -> IndexMap<String, String> {
    let Some(section) = sections::argument_reference_section(doc) else {
        return IndexMap::new();
    };
    bullet_entries(section)
        .into_iter()
        .filter_map(|entry| {
            let captures = INTERNAL_LINK_REGEX.captures(entry.description)?;
            let anchor = percent_decode_str(&captures[2]).decode_utf8_lossy().into_owned();
            debug!(block = %entry.name, anchor = %anchor, "found block reference");
            Some((entry.name.to_string(), anchor))
        })
        .collect()
}

/// Bullets of the "The/Each `block_name` block supports" paragraph inside
/// an anchor-resolved section.
pub fn extract_block_attributes_from_section(section: &str, block_name: &str) -> FactsMap {
    let Some(paragraph) = sections::block_supports_paragraph(section, block_name) else {
        debug!(block = %block_name, "no block supports paragraph in section");
        return FactsMap::new();
    };
    argument_facts(bullet_entries(paragraph))
}

/// Length used by the "longer text wins" heuristic.
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}
