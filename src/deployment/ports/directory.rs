//! Directory service port: the registry of active nodes.

use crate::deployment::domain::NodeName;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory service operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Node registration contract.
///
/// The deployment manager registers its node name exactly once at
/// construction. The contract deliberately has no deregistration
/// operation: the upstream system never deregistered a node either, and
/// this gap is preserved rather than papered over with invented
/// behaviour.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Registers a node with the directory.
    async fn register_node(&self, node: &NodeName) -> DirectoryResult<()>;
}

/// Errors returned by directory service adapters.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The directory refused the registration.
    #[error("node registration rejected for {node}: {reason}")]
    RegistrationRejected {
        /// Node that was being registered.
        node: NodeName,
        /// Reason string from the directory.
        reason: String,
    },

    /// Generic runtime failure inside the directory layer.
    #[error("directory service runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a runtime error from the directory adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
