//! Domain model for node deployment management.
//!
//! The deployment domain models plan identity, the opaque deployment plan
//! payload, the node's read-only property snapshot, and the node's own
//! identity. Infrastructure concerns remain outside this boundary.

mod error;
mod ids;
mod plan;
mod properties;
mod resources;

pub use error::DeploymentDomainError;
pub use ids::{NodeName, PlanId};
pub use plan::{DeploymentPlan, DomainJoinRequest, ResourceCommitmentHint};
pub use properties::PropertyMap;
pub use resources::ResourceDescriptor;
