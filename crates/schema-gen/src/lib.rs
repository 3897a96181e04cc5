//! Provider schema conversion: JSON export parsing, differential merge
//! against earlier output, and YAML artifact generation.

pub mod io;
pub mod merge;
pub mod parse;

pub use io::{ArtifactError, ArtifactWriter, Layout, NodeDocument, WriteOutcome, load_existing};
pub use merge::{merge_attribute, merge_block, merge_localized, merge_provider_schema, merge_resource};
pub use parse::{SchemaParseError, parse_provider, parse_provider_schemas, parse_schema_document, provider_names};

#[cfg(test)]
mod tests;
