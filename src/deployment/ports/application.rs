//! Application manager instance and factory ports.

use crate::deployment::domain::{DeploymentPlan, NodeName, PlanId, PropertyMap};
use crate::deployment::ports::DirectoryService;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for application manager teardown.
pub type TeardownResult = Result<(), TeardownError>;

/// Result type for application manager allocation.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// A running per-plan application manager.
///
/// The instance's business logic is opaque to the node deployment manager;
/// only its lifecycle matters here. Each instance is owned exclusively by
/// its registry entry and torn down exactly once when that entry is
/// removed.
#[async_trait]
pub trait ApplicationManager: Send + Sync {
    /// Returns the identifier of the plan this instance was created for.
    fn plan_id(&self) -> &PlanId;

    /// Releases the instance's plan-specific execution state.
    ///
    /// Invoked exactly once, when the owning registry entry is removed.
    async fn teardown(&self) -> TeardownResult;
}

/// Constructs application manager instances for accepted plans.
#[async_trait]
pub trait ApplicationManagerFactory: Send + Sync {
    /// Creates an instance for `plan`.
    ///
    /// The instance receives the plan, a shared reference to the directory
    /// service, the node's identity, and the node's read-only property
    /// snapshot. Allocation failure is fatal for the submission and is
    /// propagated, never retried.
    async fn create(
        &self,
        plan: &DeploymentPlan,
        directory: Arc<dyn DirectoryService>,
        node: &NodeName,
        properties: Arc<PropertyMap>,
    ) -> AllocationResult<Arc<dyn ApplicationManager>>;
}

/// Failure to allocate an application manager instance.
#[derive(Debug, Clone, Error)]
#[error("application manager allocation failed for plan {plan_id}: {reason}")]
pub struct AllocationError {
    /// Plan whose instance could not be allocated.
    pub plan_id: PlanId,
    /// Reason string from the factory.
    pub reason: String,
}

impl AllocationError {
    /// Creates an allocation error for a plan.
    pub fn new(plan_id: PlanId, reason: impl Into<String>) -> Self {
        Self {
            plan_id,
            reason: reason.into(),
        }
    }
}

/// Failure raised by an instance while releasing its execution state.
///
/// Teardown failures never cross the service boundary: the manager logs
/// them against the offending plan and proceeds, so one misbehaving
/// instance cannot block the teardown of its siblings.
#[derive(Debug, Clone, Error)]
#[error("application manager teardown failed: {reason}")]
pub struct TeardownError {
    /// Reason string from the instance.
    pub reason: String,
}

impl TeardownError {
    /// Creates a teardown error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
