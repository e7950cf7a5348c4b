//! Declarative pipe definitions loaded from JSON.
//!
//! A definition is replayed through [`PipeComposer`], so a pipe described in
//! a file is validated exactly like one composed in code.

use super::composer::PipeComposer;
use super::descriptor::PipeDescriptor;
use crate::core::{EnrichmentSpec, HttpMethod, InvocationMode, DEFAULT_CONNECTION_NAME};
use crate::errors::PipecraftError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A whole pipe described as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipeDefinition {
    /// The pipe name.
    pub name: String,
    /// The source queue.
    pub source: SourceDefinition,
    /// The optional enrichment step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentDefinition>,
    /// The target.
    pub target: TargetDefinition,
}

/// Source section of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDefinition {
    /// Queue handle.
    pub handle: String,
    /// Messages per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Batching window in seconds.
    #[serde(default)]
    pub batch_window_seconds: u32,
    /// Optional filter pattern, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_pattern: Option<String>,
}

fn default_batch_size() -> u32 {
    10
}

/// Enrichment section of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentDefinition {
    /// API destination handle.
    pub handle: String,
    /// Endpoint URL.
    pub endpoint: String,
    /// HTTP method.
    #[serde(default)]
    pub http_method: HttpMethod,
    /// Connection name.
    #[serde(default = "default_connection_name")]
    pub connection_name: String,
    /// Header parameters.
    #[serde(default)]
    pub header_parameters: BTreeMap<String, String>,
    /// Query string parameters.
    #[serde(default)]
    pub query_string_parameters: BTreeMap<String, String>,
    /// Path parameter values.
    #[serde(default)]
    pub path_parameter_values: Vec<String>,
}

fn default_connection_name() -> String {
    DEFAULT_CONNECTION_NAME.to_string()
}

/// Target section of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TargetDefinition {
    /// A workflow target.
    Workflow {
        /// Workflow handle.
        handle: String,
        /// Invocation mode.
        #[serde(default)]
        invocation_mode: InvocationMode,
    },
    /// An event channel target.
    EventChannel {
        /// Bus handle.
        handle: String,
        /// Detail type.
        event_type: String,
        /// Event source identifier.
        event_source_id: String,
        /// Unparsed payload template.
        payload_template: String,
    },
}

impl PipeDefinition {
    /// Parses a definition from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, PipecraftError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a definition from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PipecraftError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Replays the definition into a fresh composer.
    pub fn into_composer(self) -> Result<PipeComposer, PipecraftError> {
        let mut composer = PipeComposer::new(self.name)?;

        composer.with_source(
            self.source.handle,
            self.source.batch_size,
            self.source.batch_window_seconds,
            self.source.filter_pattern.as_deref(),
        )?;

        if let Some(enrichment) = self.enrichment {
            let mut spec = EnrichmentSpec::http(enrichment.handle, enrichment.endpoint)?
                .with_http_method(enrichment.http_method)
                .with_connection_name(enrichment.connection_name)?;
            for (key, value) in enrichment.header_parameters {
                spec = spec.with_header(key, value);
            }
            for (key, value) in enrichment.query_string_parameters {
                spec = spec.with_query_parameter(key, value);
            }
            for value in enrichment.path_parameter_values {
                spec = spec.with_path_parameter(value);
            }
            composer.with_enrichment_spec(spec)?;
        }

        match self.target {
            TargetDefinition::Workflow {
                handle,
                invocation_mode,
            } => {
                composer.with_workflow_target(handle, invocation_mode)?;
            }
            TargetDefinition::EventChannel {
                handle,
                event_type,
                event_source_id,
                payload_template,
            } => {
                composer.with_event_channel_target(
                    handle,
                    event_type,
                    event_source_id,
                    payload_template,
                )?;
            }
        }

        Ok(composer)
    }

    /// Replays the definition and builds the descriptor.
    pub fn compose(self) -> Result<PipeDescriptor, PipecraftError> {
        Ok(self.into_composer()?.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetKind;
    use crate::errors::ConfigurationError;
    use std::io::Write;

    const WORKFLOW_PIPE: &str = r#"{
        "name": "SqsToStepFunctions",
        "source": { "handle": "queue-1" },
        "target": { "kind": "workflow", "handle": "wf-1" }
    }"#;

    #[test]
    fn test_defaults_applied() {
        let def = PipeDefinition::from_json_str(WORKFLOW_PIPE).unwrap();

        assert_eq!(def.source.batch_size, 10);
        assert_eq!(def.source.batch_window_seconds, 0);
        assert_eq!(
            def.target,
            TargetDefinition::Workflow {
                handle: "wf-1".to_string(),
                invocation_mode: InvocationMode::FireAndForget,
            }
        );
    }

    #[test]
    fn test_compose_workflow_pipe() {
        let pipe = PipeDefinition::from_json_str(WORKFLOW_PIPE)
            .unwrap()
            .compose()
            .unwrap();

        assert_eq!(pipe.name(), "SqsToStepFunctions");
        assert_eq!(pipe.target().kind(), TargetKind::Workflow);
        assert_eq!(pipe.identity().grants().len(), 2);
    }

    #[test]
    fn test_enrichment_section() {
        let json = r#"{
            "name": "Enriched",
            "source": { "handle": "queue-1", "batch_size": 1 },
            "enrichment": {
                "handle": "http-ep",
                "endpoint": "https://example.com/*",
                "http_method": "POST",
                "header_parameters": { "x-api": "v1" },
                "path_parameter_values": ["orders"]
            },
            "target": { "kind": "workflow", "handle": "wf-1", "invocation_mode": "SYNC" }
        }"#;

        let pipe = PipeDefinition::from_json_str(json).unwrap().compose().unwrap();
        let enrichment = pipe.enrichment().unwrap();

        assert_eq!(enrichment.parameters().http_method, HttpMethod::Post);
        assert_eq!(enrichment.parameters().connection_name, "ApiConnection");
        assert_eq!(
            enrichment.parameters().header_parameters.get("x-api"),
            Some(&"v1".to_string())
        );
        assert_eq!(enrichment.parameters().path_parameter_values, vec!["orders"]);
    }

    #[test]
    fn test_invalid_values_surface_configuration_errors() {
        let json = r#"{
            "name": "Broken",
            "source": { "handle": "queue-1", "batch_size": 0 },
            "target": { "kind": "workflow", "handle": "wf-1" }
        }"#;

        let err = PipeDefinition::from_json_str(json).unwrap().compose().unwrap_err();
        match err {
            PipecraftError::Configuration(inner) => {
                assert_eq!(inner.code(), "PIPE-003-INVALID_PARAMETER");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = r#"{
            "name": "Broken",
            "source": { "handle": "queue-1", "batch": 5 },
            "target": { "kind": "workflow", "handle": "wf-1" }
        }"#;

        assert!(matches!(
            PipeDefinition::from_json_str(json),
            Err(PipecraftError::Serialization(_))
        ));
    }

    #[test]
    fn test_unknown_target_fields_rejected() {
        let json = r#"{
            "name": "Misspelled",
            "source": { "handle": "queue-1" },
            "target": { "kind": "workflow", "handle": "wf-1", "invocationMode": "SYNC" }
        }"#;

        assert!(matches!(
            PipeDefinition::from_json_str(json),
            Err(PipecraftError::Serialization(_))
        ));
    }

    #[test]
    fn test_blank_connection_name_rejected() {
        let json = r#"{
            "name": "Enriched",
            "source": { "handle": "queue-1" },
            "enrichment": {
                "handle": "http-ep",
                "endpoint": "https://example.com",
                "connection_name": ""
            },
            "target": { "kind": "workflow", "handle": "wf-1" }
        }"#;

        let err = PipeDefinition::from_json_str(json).unwrap().compose().unwrap_err();
        match err {
            PipecraftError::Configuration(ConfigurationError::InvalidParameter {
                parameter, ..
            }) => assert_eq!(parameter, "enrichment.connection_name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_large_batch_values_accepted() {
        let json = r#"{
            "name": "Big",
            "source": { "handle": "queue-1", "batch_size": 20000, "batch_window_seconds": 600 },
            "target": { "kind": "workflow", "handle": "wf-1" }
        }"#;

        let pipe = PipeDefinition::from_json_str(json).unwrap().compose().unwrap();
        assert_eq!(pipe.source().batch_size(), 20_000);
        assert_eq!(pipe.source().batch_window_seconds(), 600);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(WORKFLOW_PIPE.as_bytes()).unwrap();

        let def = PipeDefinition::from_path(file.path()).unwrap();
        assert_eq!(def.name, "SqsToStepFunctions");
    }

    #[test]
    fn test_from_missing_path() {
        let err = PipeDefinition::from_path("/nonexistent/pipe.json").unwrap_err();
        assert!(matches!(err, PipecraftError::Io(_)));
    }
}
