//! Provider documentation support for provdoc.
//!
//! Pages are parsed into a [`DocBundle`] by the pattern extractors in
//! [`extract`], matched to schema nodes by a [`DocumentCorrelator`], and
//! folded into the schema tree by [`enrich_provider_schema`].

pub mod bundle;
pub mod correlate;
pub mod enrich;
pub mod extract;

pub use bundle::{DocBundle, DocError};
pub use correlate::{DocumentCorrelator, DocumentSource};
pub use enrich::{EnrichmentSummary, enrich_provider_schema, enrich_resource};
pub use extract::{AttributeFacts, FactsMap};
