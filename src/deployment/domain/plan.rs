//! Deployment plan, resource commitment hint, and federation request types.

use super::{DeploymentDomainError, PlanId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A caller-submitted description of work to run on this node.
///
/// The payload is opaque to the deployment manager: it is carried to the
/// application manager instance at construction and never interpreted here.
/// Plans are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    id: PlanId,
    payload: Value,
}

impl DeploymentPlan {
    /// Creates a plan from a validated identifier and an opaque payload.
    #[must_use]
    pub const fn new(id: PlanId, payload: Value) -> Self {
        Self { id, payload }
    }

    /// Returns the plan identifier.
    #[must_use]
    pub const fn id(&self) -> &PlanId {
        &self.id
    }

    /// Returns the opaque plan payload.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Opaque resource commitment accompanying a plan submission.
///
/// Accepted by plan preparation and deliberately not acted upon; the value
/// is reserved for a future admission-control stage and must not change
/// observable behaviour today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCommitmentHint(Option<Value>);

impl ResourceCommitmentHint {
    /// Creates a hint carrying a commitment payload.
    #[must_use]
    pub const fn new(commitment: Value) -> Self {
        Self(Some(commitment))
    }

    /// Creates an empty hint.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Returns the commitment payload, when present.
    #[must_use]
    pub const fn commitment(&self) -> Option<&Value> {
        self.0.as_ref()
    }
}

/// Request to join a multi-node federation domain.
///
/// Domain federation is a reserved contract: the manager accepts this
/// request type but deterministically reports the feature as
/// unimplemented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainJoinRequest {
    domain: String,
    update_interval_secs: u32,
}

impl DomainJoinRequest {
    /// Creates a federation join request.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentDomainError::EmptyDomainName`] when the domain
    /// name is empty after trimming.
    pub fn new(
        domain: impl Into<String>,
        update_interval_secs: u32,
    ) -> Result<Self, DeploymentDomainError> {
        let trimmed = domain.into().trim().to_owned();

        if trimmed.is_empty() {
            return Err(DeploymentDomainError::EmptyDomainName);
        }

        Ok(Self {
            domain: trimmed,
            update_interval_secs,
        })
    }

    /// Returns the federation domain name.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the requested update interval in seconds.
    #[must_use]
    pub const fn update_interval_secs(&self) -> u32 {
        self.update_interval_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn plan_carries_payload_untouched() {
        let plan_id = PlanId::new("plan-1").expect("valid plan id");
        let payload = json!({"artifacts": ["a", "b"], "monolithic": true});
        let plan = DeploymentPlan::new(plan_id.clone(), payload.clone());

        assert_eq!(plan.id(), &plan_id);
        assert_eq!(plan.payload(), &payload);
    }

    #[rstest]
    fn empty_hint_has_no_commitment() {
        assert!(ResourceCommitmentHint::none().commitment().is_none());
        assert!(ResourceCommitmentHint::default().commitment().is_none());
    }

    #[rstest]
    fn join_request_trims_domain_and_keeps_interval() {
        let request = DomainJoinRequest::new("  west-rack  ", 30).expect("valid request");

        assert_eq!(request.domain(), "west-rack");
        assert_eq!(request.update_interval_secs(), 30);
    }

    #[rstest]
    fn join_request_rejects_blank_domain() {
        assert_eq!(
            DomainJoinRequest::new("   ", 30),
            Err(DeploymentDomainError::EmptyDomainName)
        );
    }
}
