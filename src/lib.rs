//! Haussmann: per-node deployment management for distributed applications.
//!
//! This crate implements the node-side agent core that accepts deployment
//! plans, runs exactly one application manager instance per plan, publishes
//! a remote-callable handle for each instance, and tears instances down
//! individually or as a batch during agent shutdown.
//!
//! # Architecture
//!
//! Haussmann follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, test doubles)
//!
//! The remote-invocation transport that dispatches calls into the manager
//! and the internals of per-plan application managers are external
//! collaborators reached through ports; this crate owns only the
//! orchestration between them.
//!
//! # Modules
//!
//! - [`deployment`]: Plan registry, instance lifecycle, and node identity

pub mod deployment;
