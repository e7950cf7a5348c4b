//! Composer lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a composer is in its single-use lifecycle.
///
/// `Empty -> PartiallyConfigured -> Configured -> Finalized`. Enrichment is
/// orthogonal and never changes the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposerState {
    /// Nothing configured yet.
    Empty,
    /// Either the source or the target is set, not both.
    PartiallyConfigured,
    /// Source and target are set; `build` will succeed.
    Configured,
    /// `build` has returned a descriptor.
    Finalized,
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::Empty
    }
}

impl fmt::Display for ComposerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::PartiallyConfigured => write!(f, "partially_configured"),
            Self::Configured => write!(f, "configured"),
            Self::Finalized => write!(f, "finalized"),
        }
    }
}

impl ComposerState {
    /// Derives the state from which parts are present.
    #[must_use]
    pub const fn from_parts(has_source: bool, has_target: bool, finalized: bool) -> Self {
        if finalized {
            return Self::Finalized;
        }
        match (has_source, has_target) {
            (false, false) => Self::Empty,
            (true, true) => Self::Configured,
            _ => Self::PartiallyConfigured,
        }
    }

    /// Returns true once no further calls are accepted.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}
