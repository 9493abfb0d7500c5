//! Object publisher port: turns instances into remote-callable handles.

use crate::deployment::ports::ApplicationManager;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for object publisher operations.
pub type PublisherResult<T> = Result<T, PublisherError>;

/// Opaque reference to a published application manager instance.
///
/// Handles are minted by the object publisher, are unique while the
/// publication is live, and become invalid immediately after the instance
/// is unpublished. Equality and hashing follow the handle's identity, not
/// its display text: two handles that print identically may still denote
/// different instances, so the display form must never be used for lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceHandle(Uuid);

impl InstanceHandle {
    /// Mints a fresh handle.
    ///
    /// Intended for publisher adapters; callers receive handles from
    /// [`ObjectPublisher::publish`] and treat them as opaque.
    #[must_use]
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Publishing contract between the node manager and the remote-invocation
/// layer.
///
/// Implementations must guarantee that a handle denotes exactly one
/// instance while live, and that [`ObjectPublisher::resolves`] answers by
/// reference identity of the published instance. Publishers must not hold
/// strong references to published instances; ownership stays with the
/// manager's registry entry.
#[async_trait]
pub trait ObjectPublisher: Send + Sync {
    /// Publishes an instance and returns its live handle.
    async fn publish(
        &self,
        instance: &Arc<dyn ApplicationManager>,
    ) -> PublisherResult<InstanceHandle>;

    /// Retires a handle; it denotes nothing afterwards.
    async fn unpublish(&self, handle: &InstanceHandle) -> PublisherResult<()>;

    /// Reports whether `handle` currently denotes `instance`.
    async fn resolves(
        &self,
        handle: &InstanceHandle,
        instance: &Arc<dyn ApplicationManager>,
    ) -> bool;
}

/// Errors returned by object publisher adapters.
#[derive(Debug, Clone, Error)]
pub enum PublisherError {
    /// The handle does not correspond to a live publication.
    #[error("handle {0} is not published")]
    UnknownHandle(InstanceHandle),

    /// Generic runtime failure inside the publishing layer.
    #[error("object publisher runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl PublisherError {
    /// Wraps a runtime error from the publisher adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
