//! Source, enrichment and target specifications.

use super::ResourceHandle;
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How messages are pulled from the source queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpec {
    handle: ResourceHandle,
    batch_size: u32,
    batch_window_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_pattern: Option<String>,
}

impl SourceSpec {
    /// Creates a validated source specification.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty handle or a zero batch size.
    /// Provider batching limits are not checked here.
    pub fn new(
        handle: impl Into<String>,
        batch_size: u32,
        batch_window_seconds: u32,
        filter_pattern: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let handle = ResourceHandle::parse("source.handle", handle)?;

        if batch_size == 0 {
            return Err(ConfigurationError::invalid_parameter(
                "source.batch_size",
                "must be at least 1",
            ));
        }

        Ok(Self {
            handle,
            batch_size,
            batch_window_seconds,
            filter_pattern,
        })
    }

    /// Returns the source queue handle.
    #[must_use]
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    /// Returns the maximum number of messages per batch.
    #[must_use]
    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Returns the batching window in seconds.
    #[must_use]
    pub fn batch_window_seconds(&self) -> u32 {
        self.batch_window_seconds
    }

    /// Returns the filter pattern exactly as supplied.
    #[must_use]
    pub fn filter_pattern(&self) -> Option<&str> {
        self.filter_pattern.as_deref()
    }
}

/// The kind of enrichment step. Only HTTP enrichment exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentKind {
    /// An HTTP call through an API destination.
    #[default]
    Http,
}

/// HTTP method used to call the enrichment endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        };
        f.write_str(s)
    }
}

/// Default connection name for enrichment destinations.
pub const DEFAULT_CONNECTION_NAME: &str = "ApiConnection";

/// Parameters of an HTTP enrichment call. Forwarded to the provisioning layer as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpEnrichmentParameters {
    /// The endpoint URL.
    pub endpoint: String,
    /// The HTTP method.
    pub http_method: HttpMethod,
    /// The connection holding the endpoint credentials.
    pub connection_name: String,
    /// Headers added to each call.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub header_parameters: BTreeMap<String, String>,
    /// Query string parameters added to each call.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub query_string_parameters: BTreeMap<String, String>,
    /// Values substituted into path wildcards, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path_parameter_values: Vec<String>,
}

impl HttpEnrichmentParameters {
    fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            http_method: HttpMethod::default(),
            connection_name: DEFAULT_CONNECTION_NAME.to_string(),
            header_parameters: BTreeMap::new(),
            query_string_parameters: BTreeMap::new(),
            path_parameter_values: Vec::new(),
        }
    }
}

/// An optional single enrichment stage between source and target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentSpec {
    handle: ResourceHandle,
    kind: EnrichmentKind,
    parameters: HttpEnrichmentParameters,
}

impl EnrichmentSpec {
    /// Creates an HTTP enrichment calling `endpoint` with `GET`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty handle or endpoint.
    pub fn http(
        handle: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let handle = ResourceHandle::parse("enrichment.handle", handle)?;
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(ConfigurationError::invalid_parameter(
                "enrichment.endpoint",
                "endpoint cannot be empty",
            ));
        }

        Ok(Self {
            handle,
            kind: EnrichmentKind::Http,
            parameters: HttpEnrichmentParameters::new(endpoint),
        })
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_http_method(mut self, method: HttpMethod) -> Self {
        self.parameters.http_method = method;
        self
    }

    /// Sets the connection name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty name.
    pub fn with_connection_name(
        mut self,
        name: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::invalid_parameter(
                "enrichment.connection_name",
                "connection name cannot be empty",
            ));
        }
        self.parameters.connection_name = name;
        Ok(self)
    }

    /// Adds a header parameter.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.header_parameters.insert(key.into(), value.into());
        self
    }

    /// Adds a query string parameter.
    #[must_use]
    pub fn with_query_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .query_string_parameters
            .insert(key.into(), value.into());
        self
    }

    /// Appends a path parameter value.
    #[must_use]
    pub fn with_path_parameter(mut self, value: impl Into<String>) -> Self {
        self.parameters.path_parameter_values.push(value.into());
        self
    }

    /// Returns the enrichment destination handle.
    #[must_use]
    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    /// Returns the enrichment kind.
    #[must_use]
    pub fn kind(&self) -> EnrichmentKind {
        self.kind
    }

    /// Returns the HTTP parameters.
    #[must_use]
    pub fn parameters(&self) -> &HttpEnrichmentParameters {
        &self.parameters
    }
}

/// Whether a workflow target is awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvocationMode {
    /// Asynchronous dispatch with no result correlation.
    #[default]
    FireAndForget,
    /// The pipe waits for the workflow to complete.
    Sync,
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FireAndForget => write!(f, "FIRE_AND_FORGET"),
            Self::Sync => write!(f, "SYNC"),
        }
    }
}

/// Tag of a [`TargetSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// A workflow (state machine).
    Workflow,
    /// An event bus.
    EventChannel,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workflow => write!(f, "Workflow"),
            Self::EventChannel => write!(f, "EventChannel"),
        }
    }
}

/// Where a pipe delivers messages. Exactly one per pipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum TargetSpec {
    /// Start a workflow execution per batch.
    Workflow {
        /// The workflow handle.
        handle: ResourceHandle,
        /// Async or awaited invocation.
        invocation_mode: InvocationMode,
    },
    /// Put an event on an event bus.
    EventChannel {
        /// The bus handle.
        handle: ResourceHandle,
        /// Detail type attached to each event.
        event_type: String,
        /// Source identifier attached to each event.
        event_source_id: String,
        /// Input template with `<$.path>` placeholders, never parsed here.
        payload_template: String,
    },
}

impl TargetSpec {
    /// Creates a workflow target.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty handle.
    pub fn workflow(
        handle: impl Into<String>,
        invocation_mode: InvocationMode,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::Workflow {
            handle: ResourceHandle::parse("target.handle", handle)?,
            invocation_mode,
        })
    }

    /// Creates an event channel target.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty handle.
    pub fn event_channel(
        handle: impl Into<String>,
        event_type: impl Into<String>,
        event_source_id: impl Into<String>,
        payload_template: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::EventChannel {
            handle: ResourceHandle::parse("target.handle", handle)?,
            event_type: event_type.into(),
            event_source_id: event_source_id.into(),
            payload_template: payload_template.into(),
        })
    }

    /// Returns the target handle.
    #[must_use]
    pub fn handle(&self) -> &ResourceHandle {
        match self {
            Self::Workflow { handle, .. } | Self::EventChannel { handle, .. } => handle,
        }
    }

    /// Returns the target tag.
    #[must_use]
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Workflow { .. } => TargetKind::Workflow,
            Self::EventChannel { .. } => TargetKind::EventChannel,
        }
    }
}
