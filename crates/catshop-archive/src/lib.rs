//! Archive module for the catshop order desk.
//!
//! Orders leave the desk once they have been collected. This module decides
//! what happens to them afterwards: backends may keep a bounded history for
//! the collection display and reports, or drop them entirely.

use async_trait::async_trait;
use catshop_types::{CollectedOrder, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod discard;
	pub mod memory;
}

/// Errors that can occur during archive operations.
#[derive(Debug, Error)]
pub enum ArchiveError {
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// Error that occurs in the archive backend.
	#[error("Backend error: {0}")]
	Backend(String),
}

/// Trait defining the interface for archive backends.
///
/// This trait must be implemented by any backend that wants to receive
/// collected orders from the desk.
#[async_trait]
pub trait ArchiveInterface: Send + Sync {
	/// Records an order that has just been collected.
	async fn record(&self, order: CollectedOrder) -> Result<(), ArchiveError>;

	/// Returns up to `limit` collected orders, most recent first.
	async fn recent(&self, limit: usize) -> Result<Vec<CollectedOrder>, ArchiveError>;
}

/// Type alias for archive factory functions.
///
/// This is the function signature that all archive implementations must
/// provide to create instances of their archive interface.
pub type ArchiveFactory = fn(&toml::Value) -> Result<Box<dyn ArchiveInterface>, ArchiveError>;

/// Registry trait for archive implementations.
pub trait ArchiveRegistry: ImplementationRegistry<Factory = ArchiveFactory> {}

/// Get all registered archive implementations.
///
/// Returns a vector of (name, factory) tuples for all available archive
/// implementations.
pub fn get_all_implementations() -> Vec<(&'static str, ArchiveFactory)> {
	use implementations::{discard, memory};

	vec![
		(discard::Registry::NAME, discard::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// High-level archive service used by the desk.
pub struct ArchiveService {
	/// The underlying archive backend implementation.
	backend: Box<dyn ArchiveInterface>,
}

impl ArchiveService {
	/// Creates a new ArchiveService with the specified backend.
	pub fn new(backend: Box<dyn ArchiveInterface>) -> Self {
		Self { backend }
	}

	/// Hands a collected order to the backend.
	pub async fn record(&self, order: CollectedOrder) -> Result<(), ArchiveError> {
		let order_number = order.order_number;
		self.backend.record(order).await?;
		tracing::debug!(order_number = %order_number, "Archived collected order");
		Ok(())
	}

	/// Returns up to `limit` collected orders, most recent first.
	pub async fn recent(&self, limit: usize) -> Result<Vec<CollectedOrder>, ArchiveError> {
		self.backend.recent(limit).await
	}
}
