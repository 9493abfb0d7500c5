//! In-memory application manager factory adapter.

use crate::deployment::domain::{DeploymentPlan, NodeName, PlanId, PropertyMap};
use crate::deployment::ports::{
    AllocationError, AllocationResult, ApplicationManager, ApplicationManagerFactory,
    DirectoryService, TeardownError, TeardownResult,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// In-memory application manager factory.
///
/// Created instances keep no execution state of their own; the factory
/// records construction inputs and teardown invocations in shared state
/// that outlives the instances, so tests can assert on lifecycle counts
/// after an instance has been dropped. Allocation and teardown failures
/// can be injected per plan.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicationManagerFactory {
    state: Arc<RwLock<FactoryState>>,
}

#[derive(Debug, Default)]
struct FactoryState {
    fail_allocation: HashSet<PlanId>,
    fail_teardown: HashSet<PlanId>,
    created_counts: HashMap<PlanId, usize>,
    teardown_counts: HashMap<PlanId, usize>,
    properties_seen: HashMap<PlanId, Arc<PropertyMap>>,
    nodes_seen: HashMap<PlanId, NodeName>,
}

impl InMemoryApplicationManagerFactory {
    /// Creates a factory with no injected failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes allocation fail for a plan.
    pub fn fail_allocation_for(&self, plan_id: PlanId) {
        if let Ok(mut state) = self.state.write() {
            state.fail_allocation.insert(plan_id);
        }
    }

    /// Makes teardown fail for a plan's instance.
    pub fn fail_teardown_for(&self, plan_id: PlanId) {
        if let Ok(mut state) = self.state.write() {
            state.fail_teardown.insert(plan_id);
        }
    }

    /// Returns how many instances were created for a plan.
    #[must_use]
    pub fn created_count(&self, plan_id: &PlanId) -> usize {
        self.state
            .read()
            .map(|state| state.created_counts.get(plan_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Returns how many times a plan's instance was asked to tear down.
    #[must_use]
    pub fn teardown_count(&self, plan_id: &PlanId) -> usize {
        self.state
            .read()
            .map(|state| state.teardown_counts.get(plan_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Returns the property snapshot handed to a plan's instance.
    #[must_use]
    pub fn properties_seen_for(&self, plan_id: &PlanId) -> Option<Arc<PropertyMap>> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.properties_seen.get(plan_id).cloned())
    }

    /// Returns the node name handed to a plan's instance.
    #[must_use]
    pub fn node_seen_for(&self, plan_id: &PlanId) -> Option<NodeName> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.nodes_seen.get(plan_id).cloned())
    }
}

/// Instance created by [`InMemoryApplicationManagerFactory`].
#[derive(Debug)]
struct InMemoryApplicationManager {
    plan_id: PlanId,
    state: Arc<RwLock<FactoryState>>,
}

#[async_trait]
impl ApplicationManager for InMemoryApplicationManager {
    fn plan_id(&self) -> &PlanId {
        &self.plan_id
    }

    async fn teardown(&self) -> TeardownResult {
        let mut state = self
            .state
            .write()
            .map_err(|err| TeardownError::new(err.to_string()))?;

        *state.teardown_counts.entry(self.plan_id.clone()).or_insert(0) += 1;

        if state.fail_teardown.contains(&self.plan_id) {
            return Err(TeardownError::new("injected teardown failure"));
        }

        Ok(())
    }
}

#[async_trait]
impl ApplicationManagerFactory for InMemoryApplicationManagerFactory {
    async fn create(
        &self,
        plan: &DeploymentPlan,
        _directory: Arc<dyn DirectoryService>,
        node: &NodeName,
        properties: Arc<PropertyMap>,
    ) -> AllocationResult<Arc<dyn ApplicationManager>> {
        let mut state = self
            .state
            .write()
            .map_err(|err| AllocationError::new(plan.id().clone(), err.to_string()))?;

        if state.fail_allocation.contains(plan.id()) {
            return Err(AllocationError::new(
                plan.id().clone(),
                "injected allocation failure",
            ));
        }

        *state.created_counts.entry(plan.id().clone()).or_insert(0) += 1;
        state
            .properties_seen
            .insert(plan.id().clone(), properties.clone());
        state.nodes_seen.insert(plan.id().clone(), node.clone());

        Ok(Arc::new(InMemoryApplicationManager {
            plan_id: plan.id().clone(),
            state: self.state.clone(),
        }))
    }
}
