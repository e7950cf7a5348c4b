//! The finalized pipe descriptor and its execution identity.

use crate::core::{EnrichmentSpec, SourceSpec, TargetSpec};
use crate::errors::PipecraftError;
use crate::permissions::AccessGrant;
use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// IAM policy language version used in rendered documents.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Name of the inline policy attached to the execution role.
pub const INLINE_POLICY_NAME: &str = "Policy";

/// Suffix appended to the pipe name to form the pipe resource's logical ID.
pub const PIPE_LOGICAL_ID_SUFFIX: &str = "MyNewPipe";

/// Suffix appended to the pipe name to form the API destination's logical ID.
pub const API_DESTINATION_LOGICAL_ID_SUFFIX: &str = "ApiDestination";

/// The only actor allowed to assume a pipe execution identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TrustPrincipal {
    /// The pipes service.
    #[default]
    PipesService,
}

impl TrustPrincipal {
    /// Returns the canonical principal name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PipesService => "pipes-service",
        }
    }

    /// Returns the provider service principal.
    #[must_use]
    pub const fn service_principal(&self) -> &'static str {
        match self {
            Self::PipesService => "pipes.amazonaws.com",
        }
    }
}

/// The role the pipe runtime assumes to read the source and write the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionIdentity {
    role_name: String,
    trust_principal: TrustPrincipal,
    policy_name: String,
    grants: Vec<AccessGrant>,
}

impl ExecutionIdentity {
    pub(crate) fn new(pipe_name: &str, grants: Vec<AccessGrant>) -> Self {
        Self {
            role_name: format!("{pipe_name}PipeRole"),
            trust_principal: TrustPrincipal::PipesService,
            policy_name: INLINE_POLICY_NAME.to_string(),
            grants,
        }
    }

    /// Returns the logical role name.
    #[must_use]
    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    /// Returns the trust principal. Always the pipes service.
    #[must_use]
    pub fn trust_principal(&self) -> TrustPrincipal {
        self.trust_principal
    }

    /// Returns the inline policy name.
    #[must_use]
    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    /// Returns the consolidated grants in source, enrichment, target order.
    #[must_use]
    pub fn grants(&self) -> &[AccessGrant] {
        &self.grants
    }

    /// Renders the grants as an IAM policy document.
    #[must_use]
    pub fn policy_document(&self) -> Value {
        let statements: Vec<Value> = self
            .grants
            .iter()
            .map(|grant| {
                let actions: Vec<&str> = grant
                    .actions()
                    .iter()
                    .map(|action| action.qualified_name())
                    .collect();
                json!({
                    "Effect": grant.effect().policy_name(),
                    "Action": actions,
                    "Resource": [grant.resource().as_str()],
                })
            })
            .collect();

        json!({
            "Version": POLICY_VERSION,
            "Statement": statements,
        })
    }

    /// Renders the assume-role document for the trust principal.
    #[must_use]
    pub fn trust_policy(&self) -> Value {
        json!({
            "Version": POLICY_VERSION,
            "Statement": [{
                "Effect": "Allow",
                "Principal": { "Service": self.trust_principal.service_principal() },
                "Action": "sts:AssumeRole",
            }],
        })
    }
}

/// A fully composed pipe, ready for the provisioning layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipeDescriptor {
    name: String,
    source: SourceSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    enrichment: Option<EnrichmentSpec>,
    target: TargetSpec,
    identity: ExecutionIdentity,
}

impl PipeDescriptor {
    pub(crate) fn new(
        name: String,
        source: SourceSpec,
        enrichment: Option<EnrichmentSpec>,
        target: TargetSpec,
        identity: ExecutionIdentity,
    ) -> Self {
        Self {
            name,
            source,
            enrichment,
            target,
            identity,
        }
    }

    /// Returns the pipe name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the logical ID of the pipe resource.
    #[must_use]
    pub fn logical_id(&self) -> String {
        format!("{}{PIPE_LOGICAL_ID_SUFFIX}", self.name)
    }

    /// Returns the logical ID of the API destination, when the pipe is enriched.
    #[must_use]
    pub fn api_destination_logical_id(&self) -> Option<String> {
        self.enrichment
            .as_ref()
            .map(|_| format!("{}{API_DESTINATION_LOGICAL_ID_SUFFIX}", self.name))
    }

    /// Returns the source specification.
    #[must_use]
    pub fn source(&self) -> &SourceSpec {
        &self.source
    }

    /// Returns the enrichment specification, if any.
    #[must_use]
    pub fn enrichment(&self) -> Option<&EnrichmentSpec> {
        self.enrichment.as_ref()
    }

    /// Returns the target specification.
    #[must_use]
    pub fn target(&self) -> &TargetSpec {
        &self.target
    }

    /// Returns the execution identity.
    #[must_use]
    pub fn identity(&self) -> &ExecutionIdentity {
        &self.identity
    }

    /// Serializes the descriptor to compact JSON.
    pub fn to_json(&self) -> Result<String, PipecraftError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the descriptor to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, PipecraftError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the SHA-256 hex digest of the compact JSON form.
    pub fn fingerprint(&self) -> Result<String, PipecraftError> {
        let json = self.to_json()?;
        Ok(hex::encode(Sha256::digest(json.as_bytes())))
    }
}
