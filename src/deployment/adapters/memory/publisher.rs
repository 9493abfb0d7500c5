//! In-memory object publisher adapter.

use crate::deployment::domain::PlanId;
use crate::deployment::ports::{
    ApplicationManager, InstanceHandle, ObjectPublisher, PublisherError, PublisherResult,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, Weak};

/// In-memory object publisher.
///
/// Publications are tracked as weak references, so ownership of the
/// instance stays with the manager's registry entry; a handle whose
/// instance has been dropped no longer resolves to anything. Publication
/// failures can be injected per plan.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectPublisher {
    state: Arc<RwLock<PublisherState>>,
}

#[derive(Debug, Default)]
struct PublisherState {
    published: HashMap<InstanceHandle, Weak<dyn ApplicationManager>>,
    fail_publish: HashSet<PlanId>,
}

impl InMemoryObjectPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes publication fail for a plan's instances.
    pub fn fail_publish_for(&self, plan_id: PlanId) {
        if let Ok(mut state) = self.state.write() {
            state.fail_publish.insert(plan_id);
        }
    }

    /// Returns the number of live publications.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.state.read().map(|state| state.published.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ObjectPublisher for InMemoryObjectPublisher {
    async fn publish(
        &self,
        instance: &Arc<dyn ApplicationManager>,
    ) -> PublisherResult<InstanceHandle> {
        let mut state = self
            .state
            .write()
            .map_err(|err| PublisherError::runtime(std::io::Error::other(err.to_string())))?;

        if state.fail_publish.contains(instance.plan_id()) {
            return Err(PublisherError::runtime(std::io::Error::other(
                "injected publish failure",
            )));
        }

        let handle = InstanceHandle::mint();
        state.published.insert(handle.clone(), Arc::downgrade(instance));
        Ok(handle)
    }

    async fn unpublish(&self, handle: &InstanceHandle) -> PublisherResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| PublisherError::runtime(std::io::Error::other(err.to_string())))?;

        state
            .published
            .remove(handle)
            .map(|_| ())
            .ok_or_else(|| PublisherError::UnknownHandle(handle.clone()))
    }

    async fn resolves(
        &self,
        handle: &InstanceHandle,
        instance: &Arc<dyn ApplicationManager>,
    ) -> bool {
        self.state
            .read()
            .ok()
            .and_then(|state| {
                state
                    .published
                    .get(handle)
                    .and_then(Weak::upgrade)
                    .map(|published| Arc::ptr_eq(&published, instance))
            })
            .unwrap_or(false)
    }
}
