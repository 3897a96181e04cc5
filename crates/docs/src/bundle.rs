use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::extract::{
    FactsMap, extract_all_attributes, extract_argument_reference, extract_attributes_reference,
    extract_block_attributes_from_section, extract_block_references, extract_section_by_anchor,
    sections::front_matter_description,
};

#[derive(Debug, Error)]
pub enum DocError {
    #[error("could not read documentation file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything extracted from one documentation page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocBundle {
    /// `description` from the page's front matter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// "Argument Reference" bullets.
    pub arguments: FactsMap,
    /// "Attributes Reference" bullets, all computed.
    pub attributes: FactsMap,
    /// Every bullet in the page.
    pub all_attributes: FactsMap,
    /// Block name to linked anchor.
    pub block_references: IndexMap<String, String>,
    /// Block name to the attributes documented under its anchor. Only
    /// blocks whose anchor resolved to at least one attribute appear.
    pub block_attributes: IndexMap<String, FactsMap>,
}

impl DocBundle {
    pub fn parse(content: &str) -> Self {
        let block_references = extract_block_references(content);

        let mut block_attributes = IndexMap::new();
        for (block_name, anchor) in &block_references {
            let section = extract_section_by_anchor(content, anchor);
            if section.is_empty() {
                continue;
            }
            let facts = extract_block_attributes_from_section(&section, block_name);
            if !facts.is_empty() {
                block_attributes.insert(block_name.clone(), facts);
            }
        }

        Self {
            description: front_matter_description(content),
            arguments: extract_argument_reference(content),
            attributes: extract_attributes_reference(content),
            all_attributes: extract_all_attributes(content),
            block_references,
            block_attributes,
        }
    }

    pub fn parse_file(path: &Path) -> Result<Self, DocError> {
        let content = fs::read_to_string(path).map_err(|source| DocError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let bundle = Self::parse(&content);
        debug!(
            path = %path.display(),
            arguments = bundle.arguments.len(),
            blocks = bundle.block_attributes.len(),
            "parsed documentation page"
        );
        Ok(bundle)
    }

    /// True when the page yielded nothing usable.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.arguments.is_empty()
            && self.attributes.is_empty()
            && self.all_attributes.is_empty()
            && self.block_references.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PAGE: &str = "\
---
subcategory: \"Compute\"
description: |-
  Manages a widget.
---

# Resource: demo_widget

## Argument Reference

* `name` - (Required) Widget name.
* `disk` - (Optional) Disks. See [Disk](#disk) below.
* `rule` - (Optional) Rules. See [Rules](#rules) below.

### Disk

The `disk` block supports:

* `size` - (Optional) Size. Defaults to 10.

### Rules

Rules are described elsewhere.
";

    #[test]
    fn block_attributes_need_a_resolving_anchor_with_bullets() {
        let bundle = DocBundle::parse(PAGE);
        assert_eq!(bundle.description.as_deref(), Some("Manages a widget."));
        assert_eq!(bundle.block_references.len(), 2);
        assert!(bundle.block_attributes.contains_key("disk"));
        assert!(!bundle.block_attributes.contains_key("rule"));
        assert_eq!(bundle.block_attributes["disk"]["size"].default_value, Some(serde_json::json!(10)));
    }

    #[test]
    fn parse_file_reports_missing_pages() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.md");
        let error = DocBundle::parse_file(&missing).unwrap_err();
        assert!(matches!(error, DocError::Read { ref path, .. } if path == &missing));

        let page = dir.path().join("widget.md");
        fs::write(&page, PAGE).unwrap();
        assert!(!DocBundle::parse_file(&page).unwrap().is_empty());
    }

    #[test]
    fn prose_only_page_is_empty() {
        assert!(DocBundle::parse("# Title\n\nNothing structured here.").is_empty());
    }
}
