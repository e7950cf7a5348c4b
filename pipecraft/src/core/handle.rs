//! Opaque handles for externally provisioned resources.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque identifier (ARN-like) for a queue, bus, workflow or HTTP destination.
///
/// The composer never looks inside a handle; it only checks that one was
/// supplied and forwards it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceHandle(String);

impl ResourceHandle {
    /// Creates a handle, rejecting empty or whitespace-only values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming `parameter` when the value is blank.
    pub fn parse(
        parameter: &str,
        value: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ConfigurationError::invalid_parameter(
                parameter,
                "resource handle cannot be empty",
            ));
        }
        Ok(Self(value))
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceHandle {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse("handle", value)
    }
}

impl From<ResourceHandle> for String {
    fn from(handle: ResourceHandle) -> Self {
        handle.0
    }
}

impl AsRef<str> for ResourceHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
