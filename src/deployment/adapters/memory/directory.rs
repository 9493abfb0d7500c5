//! In-memory directory service adapter.

use crate::deployment::domain::NodeName;
use crate::deployment::ports::{DirectoryError, DirectoryResult, DirectoryService};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory node directory.
///
/// Records registrations in arrival order so tests can assert that a node
/// registered itself exactly once. A name may only be registered once;
/// there is no deregistration, mirroring the port contract.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectoryService {
    nodes: Arc<RwLock<Vec<NodeName>>>,
}

impl InMemoryDirectoryService {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registered nodes in arrival order.
    #[must_use]
    pub fn registered_nodes(&self) -> Vec<NodeName> {
        self.nodes.read().map(|nodes| nodes.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DirectoryService for InMemoryDirectoryService {
    async fn register_node(&self, node: &NodeName) -> DirectoryResult<()> {
        let mut nodes = self
            .nodes
            .write()
            .map_err(|err| DirectoryError::runtime(std::io::Error::other(err.to_string())))?;

        if nodes.contains(node) {
            return Err(DirectoryError::RegistrationRejected {
                node: node.clone(),
                reason: "node name is already registered".to_owned(),
            });
        }

        nodes.push(node.clone());
        Ok(())
    }
}
