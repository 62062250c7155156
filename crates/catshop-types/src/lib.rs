//! Common types module for the catshop order desk.
//!
//! This module defines the core data types shared by the order desk, its
//! retention backends, configuration and the HTTP adapter. It provides a
//! centralized location for shared types to ensure consistency across all
//! desk components.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Archive records for orders that have left the desk.
pub mod archive;
/// Basket and line-item types supplied by cashier terminals.
pub mod basket;
/// Event types published after state-changing desk operations.
pub mod events;
/// Order numbers, lifecycle states, entries and snapshots.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use archive::*;
pub use basket::*;
pub use events::*;
pub use order::*;
pub use registry::*;
pub use validation::*;
