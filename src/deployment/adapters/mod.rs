//! Adapter implementations for node deployment ports.

pub mod memory;
