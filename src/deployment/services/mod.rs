//! Application services for node deployment orchestration.

mod manager;

pub use manager::{
    NodeDeploymentManager, NodeManagerError, NodeManagerResult, UnimplementedFeature,
};
