//! Canonical action vocabulary and the role-to-actions mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single permission the pipe execution role may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Read messages from the source queue.
    Receive,
    /// Delete consumed messages from the source queue.
    Delete,
    /// Read source queue attributes.
    GetAttributes,
    /// Start a workflow execution.
    StartExecution,
    /// Put events on an event bus.
    PutEvents,
    /// Call an HTTP enrichment destination.
    InvokeEndpoint,
}

impl Action {
    /// Returns the canonical action name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Receive => "receive",
            Self::Delete => "delete",
            Self::GetAttributes => "getAttributes",
            Self::StartExecution => "startExecution",
            Self::PutEvents => "putEvents",
            Self::InvokeEndpoint => "invokeEndpoint",
        }
    }

    /// Returns the provider-qualified IAM action name.
    #[must_use]
    pub const fn qualified_name(&self) -> &'static str {
        match self {
            Self::Receive => "sqs:ReceiveMessage",
            Self::Delete => "sqs:DeleteMessage",
            Self::GetAttributes => "sqs:GetQueueAttributes",
            Self::StartExecution => "states:StartExecution",
            Self::PutEvents => "events:PutEvents",
            Self::InvokeEndpoint => "events:InvokeApiDestination",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part a resource plays in a pipe. Determines its action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceRole {
    /// The queue messages are pulled from.
    Source,
    /// A workflow target.
    WorkflowTarget,
    /// An event bus target.
    EventChannelTarget,
    /// An HTTP enrichment destination.
    HttpEnrichment,
}

const SOURCE_ACTIONS: &[Action] = &[Action::Receive, Action::Delete, Action::GetAttributes];
const WORKFLOW_TARGET_ACTIONS: &[Action] = &[Action::StartExecution];
const EVENT_CHANNEL_TARGET_ACTIONS: &[Action] = &[Action::PutEvents];
const HTTP_ENRICHMENT_ACTIONS: &[Action] = &[Action::InvokeEndpoint];

/// Returns the fixed action set for a role.
///
/// This is the only place action sets are defined; nothing a caller passes
/// can widen them.
#[must_use]
pub const fn actions_for(role: ResourceRole) -> &'static [Action] {
    match role {
        ResourceRole::Source => SOURCE_ACTIONS,
        ResourceRole::WorkflowTarget => WORKFLOW_TARGET_ACTIONS,
        ResourceRole::EventChannelTarget => EVENT_CHANNEL_TARGET_ACTIONS,
        ResourceRole::HttpEnrichment => HTTP_ENRICHMENT_ACTIONS,
    }
}
