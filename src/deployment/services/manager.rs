//! Service layer for node deployment orchestration.
//!
//! Provides [`NodeDeploymentManager`], the per-node agent core: it owns the
//! plan registry, enforces single-instance-per-plan, publishes handles for
//! created instances, resolves handles back to entries for teardown, and
//! drains the whole registry at shutdown tolerating per-entry failures.

use crate::deployment::domain::{
    DeploymentPlan, DomainJoinRequest, NodeName, PlanId, PropertyMap, ResourceCommitmentHint,
    ResourceDescriptor,
};
use crate::deployment::ports::{
    AllocationError, ApplicationManager, ApplicationManagerFactory, DirectoryError,
    DirectoryService, InstanceHandle, ObjectPublisher, PublisherError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, trace, warn};

/// Service-level errors for node deployment operations.
#[derive(Debug, Error)]
pub enum NodeManagerError {
    /// An application manager for the plan is still active.
    ///
    /// The caller must destroy the existing instance first; the manager
    /// never implicitly replaces it.
    #[error("an application manager for plan {0} is already active")]
    DuplicatePlan(PlanId),

    /// The handle does not resolve to any live registry entry.
    #[error("handle does not resolve to any live application manager")]
    InvalidReference,

    /// The requested contract is deliberately unimplemented.
    #[error("{0} is not implemented")]
    NotImplemented(UnimplementedFeature),

    /// Instance allocation failed; fatal for the submission.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    /// The object publisher failed.
    #[error(transparent)]
    Publisher(#[from] PublisherError),

    /// The directory service failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Result type for node deployment operations.
pub type NodeManagerResult<T> = Result<T, NodeManagerError>;

/// Contracts that exist in the produced interface but deliberately fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnimplementedFeature {
    /// Dynamic resource introspection.
    DynamicResources,
    /// Joining a multi-node federation domain.
    JoinDomain,
    /// Leaving a multi-node federation domain.
    LeaveDomain,
}

impl fmt::Display for UnimplementedFeature {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DynamicResources => "dynamic resource introspection",
            Self::JoinDomain => "domain federation join",
            Self::LeaveDomain => "domain federation leave",
        };
        formatter.write_str(name)
    }
}

/// One live plan: the instance it runs and the handle published for it.
struct RegistryEntry {
    plan_id: PlanId,
    instance: Arc<dyn ApplicationManager>,
    handle: InstanceHandle,
    registered_at: DateTime<Utc>,
}

/// Bidirectional plan registry.
///
/// `entries` is the authoritative map; `handles` indexes entries by the
/// published handle so teardown requests resolve in constant time. Handles
/// are unique while live, so the index lookup preserves the
/// first-match-wins contract of a linear scan.
#[derive(Default)]
struct Registry {
    entries: HashMap<PlanId, RegistryEntry>,
    handles: HashMap<InstanceHandle, PlanId>,
}

impl Registry {
    fn insert(&mut self, entry: RegistryEntry) {
        self.handles
            .insert(entry.handle.clone(), entry.plan_id.clone());
        self.entries.insert(entry.plan_id.clone(), entry);
    }

    fn remove(&mut self, plan_id: &PlanId) -> Option<RegistryEntry> {
        let entry = self.entries.remove(plan_id)?;
        self.handles.remove(&entry.handle);
        Some(entry)
    }

    fn drain(&mut self) -> Vec<RegistryEntry> {
        self.handles.clear();
        self.entries.drain().map(|(_, entry)| entry).collect()
    }
}

/// Per-node deployment orchestration service.
///
/// One manager exists per node process. All registry mutations are
/// serialised through a single async mutex; in particular the
/// duplicate-check and insert in [`NodeDeploymentManager::prepare_plan`]
/// form one atomic unit, so concurrent submissions of the same plan yield
/// exactly one success.
pub struct NodeDeploymentManager<P, F, C>
where
    P: ObjectPublisher,
    F: ApplicationManagerFactory,
    C: Clock + Send + Sync,
{
    name: NodeName,
    properties: Arc<PropertyMap>,
    directory: Arc<dyn DirectoryService>,
    publisher: Arc<P>,
    factory: Arc<F>,
    clock: Arc<C>,
    registry: Mutex<Registry>,
}

impl<P, F, C> NodeDeploymentManager<P, F, C>
where
    P: ObjectPublisher,
    F: ApplicationManagerFactory,
    C: Clock + Send + Sync,
{
    /// Creates a manager and registers the node with the directory.
    ///
    /// The caller's property map is copied once and shared read-only with
    /// every instance created afterwards. Directory registration is a side
    /// effect that is not undone by any later failure; no deregistration
    /// contract exists.
    ///
    /// # Errors
    ///
    /// Propagates directory service failures.
    pub async fn new(
        name: NodeName,
        initial_properties: &PropertyMap,
        directory: Arc<dyn DirectoryService>,
        publisher: Arc<P>,
        factory: Arc<F>,
        clock: Arc<C>,
    ) -> NodeManagerResult<Self> {
        directory.register_node(&name).await?;
        info!(node = %name, "node deployment manager created");

        for (key, _) in initial_properties.iter() {
            trace!(node = %name, key, "binding property provided by caller");
        }

        Ok(Self {
            name,
            properties: Arc::new(initial_properties.clone()),
            directory,
            publisher,
            factory,
            clock,
            registry: Mutex::new(Registry::default()),
        })
    }

    /// Returns the node's name.
    #[must_use]
    pub const fn name(&self) -> &NodeName {
        &self.name
    }

    /// Returns the node's read-only property snapshot.
    #[must_use]
    pub fn properties(&self) -> Arc<PropertyMap> {
        self.properties.clone()
    }

    /// Returns the identifiers of all currently registered plans, sorted.
    pub async fn active_plans(&self) -> Vec<PlanId> {
        let registry = self.registry.lock().await;
        let mut plans: Vec<PlanId> = registry.entries.keys().cloned().collect();
        plans.sort();
        plans
    }

    /// Accepts a plan and starts exactly one application manager for it.
    ///
    /// On success the registry gains one entry and the published handle is
    /// returned; on any failure the registry is unchanged. The resource
    /// commitment hint is accepted but not yet acted upon; it is reserved
    /// for a future admission-control stage.
    ///
    /// # Errors
    ///
    /// Returns [`NodeManagerError::DuplicatePlan`] when an instance for the
    /// plan is still active, and propagates allocation and publisher
    /// failures.
    pub async fn prepare_plan(
        &self,
        plan: &DeploymentPlan,
        _commitment: &ResourceCommitmentHint,
    ) -> NodeManagerResult<InstanceHandle> {
        debug!(node = %self.name, plan = %plan.id(), "preparing deployment plan");

        let mut registry = self.registry.lock().await;

        if registry.entries.contains_key(plan.id()) {
            error!(
                node = %self.name,
                plan = %plan.id(),
                "an application manager for this plan already exists",
            );
            return Err(NodeManagerError::DuplicatePlan(plan.id().clone()));
        }

        trace!(node = %self.name, plan = %plan.id(), "creating application manager");
        let instance = self
            .factory
            .create(
                plan,
                self.directory.clone(),
                &self.name,
                self.properties.clone(),
            )
            .await?;

        trace!(node = %self.name, plan = %plan.id(), "publishing application manager");
        let handle = match self.publisher.publish(&instance).await {
            Ok(handle) => handle,
            Err(err) => {
                // The instance never reached the registry; release it here
                // so the failed submission leaves nothing running.
                if let Err(teardown_err) = instance.teardown().await {
                    warn!(
                        node = %self.name,
                        plan = %plan.id(),
                        error = %teardown_err,
                        "teardown of unpublished application manager failed",
                    );
                }
                return Err(err.into());
            }
        };

        registry.insert(RegistryEntry {
            plan_id: plan.id().clone(),
            instance,
            handle: handle.clone(),
            registered_at: self.clock.utc(),
        });

        info!(
            node = %self.name,
            plan = %plan.id(),
            "application manager for plan is ready",
        );
        Ok(handle)
    }

    /// Destroys the application manager the handle was published for.
    ///
    /// The handle is resolved through the registry's handle index and
    /// confirmed against the publisher by reference identity; display-equal
    /// handles never match a different instance. Exactly one entry is
    /// removed per successful call. Bookkeeping removal is unconditional;
    /// failures while unpublishing or tearing down the instance are logged
    /// against the plan and suppressed, so a repeated call with the same
    /// handle fails with [`NodeManagerError::InvalidReference`] and the
    /// instance is never torn down twice.
    ///
    /// # Errors
    ///
    /// Returns [`NodeManagerError::InvalidReference`] when the handle does
    /// not denote a live entry; the registry is left untouched.
    pub async fn destroy_manager(&self, handle: &InstanceHandle) -> NodeManagerResult<()> {
        debug!(node = %self.name, %handle, "destroying application manager");

        let entry = {
            let mut registry = self.registry.lock().await;

            let Some(plan_id) = registry.handles.get(handle).cloned() else {
                error!(
                    node = %self.name,
                    %handle,
                    "no application manager corresponds to this handle",
                );
                return Err(NodeManagerError::InvalidReference);
            };

            let denotes_instance = match registry.entries.get(&plan_id) {
                Some(entry) => self.publisher.resolves(handle, &entry.instance).await,
                None => false,
            };
            if !denotes_instance {
                error!(
                    node = %self.name,
                    %handle,
                    plan = %plan_id,
                    "handle no longer denotes the registered application manager",
                );
                return Err(NodeManagerError::InvalidReference);
            }

            registry
                .remove(&plan_id)
                .ok_or(NodeManagerError::InvalidReference)?
        };

        self.release_entry(&entry).await;
        debug!(node = %self.name, plan = %entry.plan_id, "application manager destroyed");
        Ok(())
    }

    /// Reports dynamically discovered node resources.
    ///
    /// Reserved for future resource introspection.
    ///
    /// # Errors
    ///
    /// Always returns [`NodeManagerError::NotImplemented`].
    pub fn get_dynamic_resources(&self) -> NodeManagerResult<Vec<ResourceDescriptor>> {
        error!(node = %self.name, "dynamic resource introspection is not implemented");
        Err(NodeManagerError::NotImplemented(
            UnimplementedFeature::DynamicResources,
        ))
    }

    /// Joins a multi-node federation domain.
    ///
    /// Reserved for future multi-node coordination.
    ///
    /// # Errors
    ///
    /// Always returns [`NodeManagerError::NotImplemented`].
    pub fn join_domain(&self, request: &DomainJoinRequest) -> NodeManagerResult<()> {
        error!(
            node = %self.name,
            domain = request.domain(),
            "domain federation join is not implemented",
        );
        Err(NodeManagerError::NotImplemented(
            UnimplementedFeature::JoinDomain,
        ))
    }

    /// Leaves the current federation domain.
    ///
    /// Reserved for future multi-node coordination.
    ///
    /// # Errors
    ///
    /// Always returns [`NodeManagerError::NotImplemented`].
    pub fn leave_domain(&self) -> NodeManagerResult<()> {
        error!(node = %self.name, "domain federation leave is not implemented");
        Err(NodeManagerError::NotImplemented(
            UnimplementedFeature::LeaveDomain,
        ))
    }

    /// Drains the registry, tearing down every remaining instance.
    ///
    /// The whole registry is taken in one step, so the bookkeeping is
    /// empty from the caller's perspective regardless of what happens to
    /// the individual teardowns. Per-entry failures are logged with the
    /// plan identifier and suppressed; remaining entries are still
    /// processed. The drain runs to completion and is not cancellable.
    /// A second call finds an empty registry and does nothing.
    pub async fn shutdown(&self) {
        let drained = {
            let mut registry = self.registry.lock().await;
            registry.drain()
        };

        info!(node = %self.name, entries = drained.len(), "draining plan registry");

        for entry in drained {
            debug!(
                node = %self.name,
                plan = %entry.plan_id,
                registered_at = %entry.registered_at,
                "tearing down application manager",
            );
            self.release_entry(&entry).await;
        }
    }

    /// Unpublishes and tears down one entry's instance, best effort.
    ///
    /// Failures are logged against the entry's plan and suppressed; the
    /// entry has already left the registry by the time this runs.
    async fn release_entry(&self, entry: &RegistryEntry) {
        if let Err(err) = self.publisher.unpublish(&entry.handle).await {
            warn!(
                node = %self.name,
                plan = %entry.plan_id,
                error = %err,
                "failed to unpublish application manager",
            );
        }

        if let Err(err) = entry.instance.teardown().await {
            warn!(
                node = %self.name,
                plan = %entry.plan_id,
                error = %err,
                "application manager teardown failed",
            );
        }
    }
}
