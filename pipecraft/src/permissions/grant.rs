//! Least-privilege access grants.

use super::action::{actions_for, Action, ResourceRole};
use crate::core::ResourceHandle;
use serde::{Deserialize, Serialize};

/// Effect of a grant. Only allow statements are ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    /// Permit the listed actions.
    #[default]
    Allow,
}

impl Effect {
    /// Returns the IAM spelling of the effect.
    #[must_use]
    pub const fn policy_name(&self) -> &'static str {
        match self {
            Self::Allow => "Allow",
        }
    }
}

/// One permission statement: a resource, its actions and the effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessGrant {
    resource: ResourceHandle,
    actions: Vec<Action>,
    effect: Effect,
}

impl AccessGrant {
    /// Creates an allow grant for `resource` playing `role`.
    #[must_use]
    pub fn for_role(resource: ResourceHandle, role: ResourceRole) -> Self {
        Self {
            resource,
            actions: actions_for(role).to_vec(),
            effect: Effect::Allow,
        }
    }

    /// Returns the granted resource.
    #[must_use]
    pub fn resource(&self) -> &ResourceHandle {
        &self.resource
    }

    /// Returns the granted actions in declaration order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Returns the effect.
    #[must_use]
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Returns true if `other` targets the same resource with the same effect.
    #[must_use]
    pub fn same_statement(&self, other: &Self) -> bool {
        self.resource == other.resource && self.effect == other.effect
    }

    /// Adds the actions of `other` not already present, keeping order.
    pub(crate) fn merge_actions(&mut self, other: &Self) {
        for action in &other.actions {
            if !self.actions.contains(action) {
                self.actions.push(*action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(s: &str) -> ResourceHandle {
        ResourceHandle::parse("test", s).unwrap()
    }

    #[test]
    fn test_grant_for_role() {
        let grant = AccessGrant::for_role(handle("queue-1"), ResourceRole::Source);

        assert_eq!(grant.resource().as_str(), "queue-1");
        assert_eq!(
            grant.actions(),
            &[Action::Receive, Action::Delete, Action::GetAttributes]
        );
        assert_eq!(grant.effect(), Effect::Allow);
    }

    #[test]
    fn test_merge_actions_dedupes() {
        let mut grant = AccessGrant::for_role(handle("r"), ResourceRole::Source);
        let other = AccessGrant::for_role(handle("r"), ResourceRole::Source);
        grant.merge_actions(&other);
        assert_eq!(grant.actions().len(), 3);

        let endpoint = AccessGrant::for_role(handle("r"), ResourceRole::HttpEnrichment);
        grant.merge_actions(&endpoint);
        assert_eq!(grant.actions().last(), Some(&Action::InvokeEndpoint));
    }

    #[test]
    fn test_grant_serialization() {
        let grant = AccessGrant::for_role(handle("wf-1"), ResourceRole::WorkflowTarget);
        let json = serde_json::to_string(&grant).unwrap();
        assert_eq!(
            json,
            r#"{"resource":"wf-1","actions":["startExecution"],"effect":"ALLOW"}"#
        );
    }
}
