//! Error types for pipe composition.
//!
//! Every error here is a caller or input error detected synchronously at the
//! call that violates the composer contract. None are transient, so none are
//! retried.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The main error type for pipecraft operations.
#[derive(Debug, Error)]
pub enum PipecraftError {
    /// The composition contract was violated.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// A pipe definition or descriptor could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A tracing subscriber could not be installed.
    #[error("Logging setup error: {0}")]
    Logging(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PipecraftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Metadata about a configuration error for better diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ErrorInfo {
    /// Error code (e.g., "PIPE-001-MISSING_SOURCE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error info.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            summary: summary.into(),
            fix_hint: None,
            context: BTreeMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Errors raised when a pipe composition is used outside its contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// `build` was called before any source was configured.
    #[error("Pipe '{pipe}' has no source configured")]
    MissingSource {
        /// The pipe name.
        pipe: String,
    },

    /// `build` was called before any target was configured.
    #[error("Pipe '{pipe}' has no target configured")]
    MissingTarget {
        /// The pipe name.
        pipe: String,
    },

    /// A configuration call received a value outside its accepted range.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The offending parameter.
        parameter: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The composer was used again after `build` succeeded.
    #[error("Pipe '{pipe}' is already built; '{operation}' is not allowed")]
    ReuseAfterFinalize {
        /// The pipe name.
        pipe: String,
        /// The rejected operation.
        operation: String,
    },
}

impl ConfigurationError {
    /// Creates a missing source error.
    #[must_use]
    pub fn missing_source(pipe: impl Into<String>) -> Self {
        Self::MissingSource { pipe: pipe.into() }
    }

    /// Creates a missing target error.
    #[must_use]
    pub fn missing_target(pipe: impl Into<String>) -> Self {
        Self::MissingTarget { pipe: pipe.into() }
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a reuse-after-finalize error.
    #[must_use]
    pub fn reuse_after_finalize(pipe: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::ReuseAfterFinalize {
            pipe: pipe.into(),
            operation: operation.into(),
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingSource { .. } => "PIPE-001-MISSING_SOURCE",
            Self::MissingTarget { .. } => "PIPE-002-MISSING_TARGET",
            Self::InvalidParameter { .. } => "PIPE-003-INVALID_PARAMETER",
            Self::ReuseAfterFinalize { .. } => "PIPE-004-FINALIZED",
        }
    }

    /// Returns diagnostic metadata for this error.
    #[must_use]
    pub fn error_info(&self) -> ErrorInfo {
        let info = ErrorInfo::new(self.code(), self.to_string());
        match self {
            Self::MissingSource { pipe } => info
                .with_fix_hint("Call with_source before build; a pipe needs exactly one source.")
                .with_context_entry("pipe", pipe),
            Self::MissingTarget { pipe } => info
                .with_fix_hint(
                    "Call with_workflow_target or with_event_channel_target before build.",
                )
                .with_context_entry("pipe", pipe),
            Self::InvalidParameter { parameter, .. } => info
                .with_fix_hint("Pass a non-empty handle and batching values within range.")
                .with_context_entry("parameter", parameter),
            Self::ReuseAfterFinalize { pipe, operation } => info
                .with_fix_hint("Create a new composer for each pipe; a composer is single-use.")
                .with_context_entry("pipe", pipe)
                .with_context_entry("operation", operation),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> serde_json::Map<String, serde_json::Value> {
        let info = self.error_info();
        let mut map = serde_json::Map::new();
        map.insert("code".to_string(), serde_json::json!(info.code));
        map.insert("message".to_string(), serde_json::json!(info.summary));
        if let Some(hint) = info.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::json!(hint));
        }
        if !info.context.is_empty() {
            map.insert("context".to_string(), serde_json::json!(info.context));
        }
        map
    }
}
