//! Identifier types for deployment plans and node identity.

use super::DeploymentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a plan identifier.
const MAX_PLAN_ID_LENGTH: usize = 255;

/// Globally unique identifier of a deployment plan.
///
/// The identifier is an opaque caller-supplied string; the manager only
/// requires it to be non-empty and uses it as the registry key. Case and
/// internal structure are preserved untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    /// Creates a validated plan identifier.
    ///
    /// Surrounding whitespace is trimmed; the rest of the value is kept
    /// verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError`] when the identifier is empty after
    /// trimming or exceeds the maximum length.
    pub fn new(value: impl Into<String>) -> Result<Self, DeploymentDomainError> {
        let trimmed = value.into().trim().to_owned();

        if trimmed.is_empty() {
            return Err(DeploymentDomainError::EmptyPlanId);
        }

        if trimmed.len() > MAX_PLAN_ID_LENGTH {
            return Err(DeploymentDomainError::PlanIdTooLong(trimmed));
        }

        Ok(Self(trimmed))
    }

    /// Returns the plan identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PlanId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Immutable name identifying this node in the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeName(String);

impl NodeName {
    /// Creates a validated node name.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError::EmptyNodeName`] when the name is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, DeploymentDomainError> {
        let trimmed = value.into().trim().to_owned();

        if trimmed.is_empty() {
            return Err(DeploymentDomainError::EmptyNodeName);
        }

        Ok(Self(trimmed))
    }

    /// Returns the node name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
