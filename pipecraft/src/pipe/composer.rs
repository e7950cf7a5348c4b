//! Fluent pipe composer with single-use finalization.

use super::descriptor::{ExecutionIdentity, PipeDescriptor};
use crate::core::{ComposerState, EnrichmentSpec, InvocationMode, SourceSpec, TargetSpec};
use crate::errors::ConfigurationError;
use crate::permissions::{
    grant_for_enrichment, grant_for_source, grant_for_target, PermissionAccumulator,
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

#[allow(clippy::expect_used)]
static PIPE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("pipe name pattern is valid"));

/// Accumulates the parts of one pipe and builds its descriptor.
///
/// Configuration calls may come in any order. Each part is held at most
/// once: a repeated call replaces the earlier value (last write wins up to
/// `build`). In particular the two target calls are alternatives; only the
/// most recent one is kept.
///
/// A composer is single-use. After a successful `build`, every further call
/// fails with [`ConfigurationError::ReuseAfterFinalize`]. Clone the composer
/// before building if a second descriptor is needed.
///
/// ```rust,ignore
/// let mut composer = PipeComposer::new("SqsToStepFunctions")?;
/// let pipe = composer
///     .with_source("arn:aws:sqs:us-east-1:123456789012:orders", 5, 10, None)?
///     .with_workflow_target("arn:aws:states:us-east-1:123456789012:stateMachine:wf", InvocationMode::FireAndForget)?
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct PipeComposer {
    name: String,
    source: Option<SourceSpec>,
    enrichment: Option<EnrichmentSpec>,
    target: Option<TargetSpec>,
    finalized: bool,
}

impl PipeComposer {
    /// Creates a composer for the pipe `name`.
    ///
    /// The name prefixes derived logical names such as the execution role,
    /// so it must be alphanumeric and start with a letter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when the name does not match.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if !PIPE_NAME.is_match(&name) {
            return Err(ConfigurationError::invalid_parameter(
                "name",
                format!("'{name}' must be alphanumeric and start with a letter"),
            ));
        }

        Ok(Self {
            name,
            source: None,
            enrichment: None,
            target: None,
            finalized: false,
        })
    }

    /// Returns the pipe name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> ComposerState {
        ComposerState::from_parts(self.source.is_some(), self.target.is_some(), self.finalized)
    }

    /// Returns the configured source.
    #[must_use]
    pub fn source(&self) -> Option<&SourceSpec> {
        self.source.as_ref()
    }

    /// Returns the configured enrichment.
    #[must_use]
    pub fn enrichment(&self) -> Option<&EnrichmentSpec> {
        self.enrichment.as_ref()
    }

    /// Returns the configured target.
    #[must_use]
    pub fn target(&self) -> Option<&TargetSpec> {
        self.target.as_ref()
    }

    /// Sets the source queue.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty handle or out-of-range
    /// batching values, and `ReuseAfterFinalize` after `build`.
    pub fn with_source(
        &mut self,
        handle: impl Into<String>,
        batch_size: u32,
        batch_window_seconds: u32,
        filter_pattern: Option<&str>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open("with_source")?;
        let spec = SourceSpec::new(
            handle,
            batch_size,
            batch_window_seconds,
            filter_pattern.map(str::to_string),
        )?;
        self.with_source_spec(spec)
    }

    /// Sets an already validated source specification.
    ///
    /// # Errors
    ///
    /// Returns `ReuseAfterFinalize` after `build`.
    pub fn with_source_spec(&mut self, spec: SourceSpec) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open("with_source")?;
        debug!(
            pipe = %self.name,
            source = %spec.handle(),
            batch_size = spec.batch_size(),
            batch_window_seconds = spec.batch_window_seconds(),
            filtered = spec.filter_pattern().is_some(),
            "Source configured"
        );
        self.source = Some(spec);
        Ok(self)
    }

    /// Sets an HTTP enrichment calling `http_endpoint` through `handle`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty handle or endpoint, and
    /// `ReuseAfterFinalize` after `build`.
    pub fn with_enrichment(
        &mut self,
        handle: impl Into<String>,
        http_endpoint: impl Into<String>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open("with_enrichment")?;
        let spec = EnrichmentSpec::http(handle, http_endpoint)?;
        self.with_enrichment_spec(spec)
    }

    /// Sets a fully configured enrichment. Replaces any earlier enrichment.
    ///
    /// # Errors
    ///
    /// Returns `ReuseAfterFinalize` after `build`.
    pub fn with_enrichment_spec(
        &mut self,
        spec: EnrichmentSpec,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open("with_enrichment")?;
        if let Some(previous) = self.enrichment.as_ref().filter(|previous| **previous != spec) {
            warn!(
                pipe = %self.name,
                previous = %previous.handle(),
                replacement = %spec.handle(),
                "Replacing enrichment; only one enrichment stage is kept"
            );
        }
        debug!(
            pipe = %self.name,
            enrichment = %spec.handle(),
            endpoint = %spec.parameters().endpoint,
            "Enrichment configured"
        );
        self.enrichment = Some(spec);
        Ok(self)
    }

    /// Sets the target. Replaces any earlier target of either kind.
    ///
    /// # Errors
    ///
    /// Returns `ReuseAfterFinalize` after `build`.
    pub fn with_target(&mut self, spec: TargetSpec) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open("with_target")?;
        if let Some(previous) = self.target.as_ref().filter(|previous| **previous != spec) {
            warn!(
                pipe = %self.name,
                previous_kind = %previous.kind(),
                previous = %previous.handle(),
                replacement_kind = %spec.kind(),
                replacement = %spec.handle(),
                "Replacing target; the last target call wins"
            );
        }
        debug!(
            pipe = %self.name,
            target = %spec.handle(),
            kind = %spec.kind(),
            "Target configured"
        );
        self.target = Some(spec);
        Ok(self)
    }

    /// Sets a workflow target.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty handle, and
    /// `ReuseAfterFinalize` after `build`.
    pub fn with_workflow_target(
        &mut self,
        workflow_handle: impl Into<String>,
        invocation_mode: InvocationMode,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open("with_target")?;
        let spec = TargetSpec::workflow(workflow_handle, invocation_mode)?;
        self.with_target(spec)
    }

    /// Sets an event channel target.
    ///
    /// `payload_template` is forwarded unparsed; its `<$.path>` placeholders
    /// are substituted at delivery time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty handle, and
    /// `ReuseAfterFinalize` after `build`.
    pub fn with_event_channel_target(
        &mut self,
        event_channel_handle: impl Into<String>,
        event_type: impl Into<String>,
        event_source_id: impl Into<String>,
        payload_template: impl Into<String>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open("with_target")?;
        let spec = TargetSpec::event_channel(
            event_channel_handle,
            event_type,
            event_source_id,
            payload_template,
        )?;
        self.with_target(spec)
    }

    /// Builds the descriptor and finalizes the composer.
    ///
    /// Grants are collected in source, enrichment, target order and
    /// consolidated. A failed build leaves the composer open.
    ///
    /// # Errors
    ///
    /// Returns `MissingSource` or `MissingTarget` when a part is absent, and
    /// `ReuseAfterFinalize` when called a second time.
    pub fn build(&mut self) -> Result<PipeDescriptor, ConfigurationError> {
        self.ensure_open("build")?;
        let source = self
            .source
            .clone()
            .ok_or_else(|| ConfigurationError::missing_source(&self.name))?;
        let target = self
            .target
            .clone()
            .ok_or_else(|| ConfigurationError::missing_target(&self.name))?;
        let enrichment = self.enrichment.clone();

        let mut permissions = PermissionAccumulator::new();
        permissions.add(grant_for_source(&source));
        if let Some(ref enrichment) = enrichment {
            permissions.add(grant_for_enrichment(enrichment));
        }
        permissions.add(grant_for_target(&target));

        let identity = ExecutionIdentity::new(&self.name, permissions.into_grants());
        self.finalized = true;

        info!(
            pipe = %self.name,
            source = %source.handle(),
            target = %target.handle(),
            target_kind = %target.kind(),
            enriched = enrichment.is_some(),
            grants = identity.grants().len(),
            "Pipe built"
        );

        Ok(PipeDescriptor::new(
            self.name.clone(),
            source,
            enrichment,
            target,
            identity,
        ))
    }

    fn ensure_open(&self, operation: &str) -> Result<(), ConfigurationError> {
        if self.state().is_terminal() {
            return Err(ConfigurationError::reuse_after_finalize(&self.name, operation));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetKind;

    #[test]
    fn test_composer_creation() {
        let composer = PipeComposer::new("Orders").unwrap();
        assert_eq!(composer.name(), "Orders");
        assert_eq!(composer.state(), ComposerState::Empty);
    }

    #[test]
    fn test_composer_rejects_bad_names() {
        for name in ["", "1Pipe", "my-pipe", "pipe name"] {
            let err = PipeComposer::new(name).unwrap_err();
            assert_eq!(err.code(), "PIPE-003-INVALID_PARAMETER");
        }
    }

    #[test]
    fn test_state_progression() {
        let mut composer = PipeComposer::new("Orders").unwrap();

        composer.with_enrichment("http-ep", "https://example.com").unwrap();
        assert_eq!(composer.state(), ComposerState::Empty);

        composer.with_source("queue-1", 1, 0, None).unwrap();
        assert_eq!(composer.state(), ComposerState::PartiallyConfigured);

        composer
            .with_workflow_target("wf-1", InvocationMode::FireAndForget)
            .unwrap();
        assert_eq!(composer.state(), ComposerState::Configured);

        composer.build().unwrap();
        assert_eq!(composer.state(), ComposerState::Finalized);
    }

    #[test]
    fn test_invalid_source_leaves_state_unchanged() {
        let mut composer = PipeComposer::new("Orders").unwrap();
        composer.with_source("queue-1", 5, 10, None).unwrap();

        let err = composer.with_source("queue-2", 0, 0, None).unwrap_err();
        assert_eq!(err.code(), "PIPE-003-INVALID_PARAMETER");
        assert_eq!(composer.source().unwrap().handle().as_str(), "queue-1");
    }

    #[test]
    fn test_large_batch_values_accepted() {
        let mut composer = PipeComposer::new("Big").unwrap();
        composer.with_source("q", 20_000, 600, None).unwrap();

        let source = composer.source().unwrap();
        assert_eq!(source.batch_size(), 20_000);
        assert_eq!(source.batch_window_seconds(), 600);
    }

    #[test]
    fn test_empty_handles_rejected() {
        let mut composer = PipeComposer::new("Orders").unwrap();

        assert!(composer.with_source("", 1, 0, None).is_err());
        assert!(composer.with_enrichment("", "https://example.com").is_err());
        assert!(composer
            .with_workflow_target(" ", InvocationMode::Sync)
            .is_err());
        assert!(composer
            .with_event_channel_target("", "E", "svc", "<$.id>")
            .is_err());
        assert_eq!(composer.state(), ComposerState::Empty);
    }

    #[test]
    fn test_last_target_wins() {
        let mut composer = PipeComposer::new("Orders").unwrap();
        composer
            .with_workflow_target("wf-1", InvocationMode::FireAndForget)
            .unwrap()
            .with_event_channel_target("bus-1", "E", "svc", "<$.id>")
            .unwrap();

        assert_eq!(composer.target().unwrap().kind(), TargetKind::EventChannel);
    }

    #[test]
    fn test_enrichment_last_write_wins() {
        let mut composer = PipeComposer::new("Orders").unwrap();
        composer
            .with_enrichment("http-1", "https://one.example.com")
            .unwrap()
            .with_enrichment("http-2", "https://two.example.com")
            .unwrap();

        assert_eq!(composer.enrichment().unwrap().handle().as_str(), "http-2");
    }

    #[test]
    fn test_build_requires_source_then_target() {
        let mut composer = PipeComposer::new("Orders").unwrap();
        assert_eq!(
            composer.build().unwrap_err(),
            ConfigurationError::missing_source("Orders")
        );

        composer
            .with_workflow_target("wf-1", InvocationMode::FireAndForget)
            .unwrap();
        assert_eq!(
            composer.build().unwrap_err(),
            ConfigurationError::missing_source("Orders")
        );

        let mut composer = PipeComposer::new("Orders").unwrap();
        composer.with_source("queue-1", 1, 0, None).unwrap();
        assert_eq!(
            composer.build().unwrap_err(),
            ConfigurationError::missing_target("Orders")
        );
        assert_eq!(composer.state(), ComposerState::PartiallyConfigured);
    }

    #[test]
    fn test_reuse_after_finalize() {
        let mut composer = PipeComposer::new("Orders").unwrap();
        composer
            .with_source("queue-1", 1, 0, None)
            .unwrap()
            .with_workflow_target("wf-1", InvocationMode::FireAndForget)
            .unwrap();
        composer.build().unwrap();

        let err = composer.with_source("queue-2", 1, 0, None).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::reuse_after_finalize("Orders", "with_source")
        );
        assert!(composer.with_enrichment("h", "https://example.com").is_err());
        assert!(composer
            .with_workflow_target("wf-2", InvocationMode::Sync)
            .is_err());
        assert_eq!(
            composer.build().unwrap_err(),
            ConfigurationError::reuse_after_finalize("Orders", "build")
        );
    }

    #[test]
    fn test_finalize_check_precedes_validation() {
        let mut composer = PipeComposer::new("Orders").unwrap();
        composer
            .with_source("queue-1", 1, 0, None)
            .unwrap()
            .with_workflow_target("wf-1", InvocationMode::FireAndForget)
            .unwrap();
        composer.build().unwrap();

        let err = composer.with_source("", 0, 0, None).unwrap_err();
        assert_eq!(err.code(), "PIPE-004-FINALIZED");
    }

    #[test]
    fn test_clone_before_build_gives_identical_descriptor() {
        let mut composer = PipeComposer::new("Orders").unwrap();
        composer
            .with_source("queue-1", 1, 0, None)
            .unwrap()
            .with_workflow_target("wf-1", InvocationMode::Sync)
            .unwrap();

        let mut copy = composer.clone();
        assert_eq!(composer.build().unwrap(), copy.build().unwrap());
    }
}
