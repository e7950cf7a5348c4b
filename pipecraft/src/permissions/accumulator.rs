//! Mapping from configured specs to grants, and grant consolidation.

use super::action::ResourceRole;
use super::grant::AccessGrant;
use crate::core::{EnrichmentSpec, SourceSpec, TargetSpec};

/// Grant for the source queue. Batching values never affect it.
#[must_use]
pub fn grant_for_source(spec: &SourceSpec) -> AccessGrant {
    AccessGrant::for_role(spec.handle().clone(), ResourceRole::Source)
}

/// Grant for the target, keyed on the variant only.
#[must_use]
pub fn grant_for_target(spec: &TargetSpec) -> AccessGrant {
    let role = match spec {
        TargetSpec::Workflow { .. } => ResourceRole::WorkflowTarget,
        TargetSpec::EventChannel { .. } => ResourceRole::EventChannelTarget,
    };
    AccessGrant::for_role(spec.handle().clone(), role)
}

/// Grant for an HTTP enrichment destination.
#[must_use]
pub fn grant_for_enrichment(spec: &EnrichmentSpec) -> AccessGrant {
    AccessGrant::for_role(spec.handle().clone(), ResourceRole::HttpEnrichment)
}

/// Merges grants sharing `(resource, effect)`.
///
/// The merged grant keeps the position of its first occurrence, so identical
/// inputs always produce identical ordering.
#[must_use]
pub fn consolidate(grants: impl IntoIterator<Item = AccessGrant>) -> Vec<AccessGrant> {
    let mut merged: Vec<AccessGrant> = Vec::new();

    for grant in grants {
        match merged.iter_mut().find(|existing| existing.same_statement(&grant)) {
            Some(existing) => existing.merge_actions(&grant),
            None => merged.push(grant),
        }
    }

    merged
}

/// Ordered collector of grants for one pipe.
#[derive(Debug, Clone, Default)]
pub struct PermissionAccumulator {
    grants: Vec<AccessGrant>,
}

impl PermissionAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a grant.
    pub fn add(&mut self, grant: AccessGrant) -> &mut Self {
        self.grants.push(grant);
        self
    }

    /// Returns the number of grants collected so far, before consolidation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Consumes the accumulator and returns the consolidated grants.
    #[must_use]
    pub fn into_grants(self) -> Vec<AccessGrant> {
        consolidate(self.grants)
    }
}
