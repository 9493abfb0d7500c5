//! In-memory adapters for the deployment ports.
//!
//! These adapters model collaborator behaviour without a remote-invocation
//! runtime or real application processes. They are suitable for unit and
//! integration tests and for local deterministic orchestration flows, and
//! they carry injection knobs for the failure paths the manager must
//! tolerate.

mod application;
mod directory;
mod publisher;

pub use application::InMemoryApplicationManagerFactory;
pub use directory::InMemoryDirectoryService;
pub use publisher::InMemoryObjectPublisher;
