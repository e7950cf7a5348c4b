//! Core domain model types for pipecraft.
//!
//! This module contains the value types shared by the permission
//! accumulator and the composer:
//! - Resource handles
//! - Source, enrichment and target specifications
//! - Composer lifecycle states

mod handle;
mod spec;
mod status;

pub use handle::ResourceHandle;
pub use spec::{
    EnrichmentKind, EnrichmentSpec, HttpEnrichmentParameters, HttpMethod, InvocationMode,
    SourceSpec, TargetKind, TargetSpec, DEFAULT_CONNECTION_NAME,
};
pub use status::ComposerState;
