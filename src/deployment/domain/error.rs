//! Error types for deployment domain validation.

use thiserror::Error;

/// Errors returned while constructing deployment domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeploymentDomainError {
    /// The plan identifier is empty after trimming.
    #[error("deployment plan identifier must not be empty")]
    EmptyPlanId,

    /// The plan identifier exceeds the maximum supported length.
    #[error("deployment plan identifier {0} exceeds the maximum length")]
    PlanIdTooLong(String),

    /// The node name is empty after trimming.
    #[error("node name must not be empty")]
    EmptyNodeName,

    /// The domain name in a federation request is empty after trimming.
    #[error("federation domain name must not be empty")]
    EmptyDomainName,
}
