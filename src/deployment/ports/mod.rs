//! Port contracts for node deployment orchestration.

mod application;
mod directory;
mod publisher;

pub use application::{
    AllocationError, AllocationResult, ApplicationManager, ApplicationManagerFactory,
    TeardownError, TeardownResult,
};
pub use directory::{DirectoryError, DirectoryResult, DirectoryService};
pub use publisher::{InstanceHandle, ObjectPublisher, PublisherError, PublisherResult};
