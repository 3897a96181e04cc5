//! Shared type definitions for provdoc.
//!
//! The schema tree ([`ProviderSchema`] → [`Resource`] → [`Block`] →
//! [`Attribute`]) is the single representation that parsing, documentation
//! enrichment, differential merging, and YAML persistence all operate on.

pub mod localized;
pub mod schema;

pub use localized::{EN_US, JA_JP, LocalizedText};
pub use schema::{
    Attribute, AttributeMap, Block, BlockMap, DEFAULT_REGISTRY_HOST, NestingMode, ProviderInfo, ProviderSchema,
    Resource, ResourceKind,
};
