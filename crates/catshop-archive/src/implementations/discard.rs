//! Archive backend that drops collected orders.
//!
//! Collected orders simply disappear once removed from the desk.

use crate::{ArchiveError, ArchiveFactory, ArchiveInterface, ArchiveRegistry};
use async_trait::async_trait;
use catshop_types::{
	CollectedOrder, ConfigSchema, ImplementationRegistry, Schema, ValidationError,
};

/// Archive that retains nothing.
#[derive(Debug, Default)]
pub struct DiscardArchive;

#[async_trait]
impl ArchiveInterface for DiscardArchive {
	async fn record(&self, _order: CollectedOrder) -> Result<(), ArchiveError> {
		Ok(())
	}

	async fn recent(&self, _limit: usize) -> Result<Vec<CollectedOrder>, ArchiveError> {
		Ok(Vec::new())
	}
}

/// Configuration schema for DiscardArchive.
pub struct DiscardArchiveSchema;

impl ConfigSchema for DiscardArchiveSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// No settings, but the section must still be a table
		Schema::empty().validate(config)
	}
}

/// Factory function to create a discarding archive.
pub fn create_archive(config: &toml::Value) -> Result<Box<dyn ArchiveInterface>, ArchiveError> {
	DiscardArchiveSchema
		.validate(config)
		.map_err(|e| ArchiveError::Configuration(format!("Invalid configuration: {}", e)))?;
	Ok(Box::new(DiscardArchive))
}

/// Registry for the discard archive implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "discard";
	type Factory = ArchiveFactory;

	fn factory() -> Self::Factory {
		create_archive
	}
}

impl ArchiveRegistry for Registry {}
