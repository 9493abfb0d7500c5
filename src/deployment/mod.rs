//! Node deployment management: plan registry and instance lifecycle.
//!
//! The deployment context owns the mapping from deployment plan identifiers
//! to running application manager instances and the handles published for
//! them. It enforces single-instance-per-plan, resolves handles back to
//! registry entries for teardown, and drains the whole registry at agent
//! shutdown without letting one failing instance block the others. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
