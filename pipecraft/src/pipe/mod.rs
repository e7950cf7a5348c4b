//! Pipe composition.
//!
//! This module provides:
//! - The fluent, single-use pipe composer
//! - The immutable pipe descriptor and its execution identity
//! - Declarative JSON pipe definitions

mod composer;
mod definition;
mod descriptor;

pub use composer::PipeComposer;
pub use definition::{EnrichmentDefinition, PipeDefinition, SourceDefinition, TargetDefinition};
pub use descriptor::{
    ExecutionIdentity, PipeDescriptor, TrustPrincipal, API_DESTINATION_LOGICAL_ID_SUFFIX,
    INLINE_POLICY_NAME, PIPE_LOGICAL_ID_SUFFIX, POLICY_VERSION,
};
