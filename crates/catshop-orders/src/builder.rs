//! Builder for constructing order desks.
//!
//! Composes an [`OrderDesk`] from the loaded configuration and the archive
//! factories registered by the binary.

use crate::desk::OrderDesk;
use crate::sequence::SequenceGenerator;
use catshop_archive::{ArchiveFactory, ArchiveService};
use catshop_config::Config;
use catshop_types::OrderNumber;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during desk construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for an [`OrderDesk`] with a pluggable archive.
pub struct DeskBuilder {
	config: Config,
}

impl DeskBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the desk, creating every configured archive implementation
	/// that has a registered factory and keeping the primary one.
	pub fn build(
		self,
		factories: &HashMap<String, ArchiveFactory>,
	) -> Result<OrderDesk, BuilderError> {
		let primary = &self.config.archive.primary;
		if !factories.contains_key(primary) {
			return Err(BuilderError::MissingComponent(format!(
				"No archive implementation registered as '{}'",
				primary
			)));
		}

		let mut archive_impls = HashMap::new();
		for (name, config) in &self.config.archive.implementations {
			let Some(factory) = factories.get(name) else {
				tracing::warn!(
					component = "archive",
					implementation = %name,
					"Unknown implementation, skipping"
				);
				continue;
			};
			match factory(config) {
				Ok(implementation) => {
					let is_primary = primary == name;
					tracing::info!(component = "archive", implementation = %name, enabled = %is_primary, "Loaded");
					archive_impls.insert(name.clone(), implementation);
				},
				Err(e) => {
					tracing::error!(
						component = "archive",
						implementation = %name,
						error = %e,
						"Failed to create archive implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create archive implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		let backend = archive_impls.remove(primary).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary archive '{}' failed to load or has invalid configuration",
				primary
			))
		})?;
		let archive = Arc::new(ArchiveService::new(backend));

		let first = OrderNumber::new(self.config.orders.first_number).ok_or_else(|| {
			BuilderError::Config("orders.first_number must be at least 1".into())
		})?;

		tracing::info!(desk = %self.config.desk.id, first_number = %first, "Order desk ready");
		Ok(OrderDesk::new(
			self.config.desk.id,
			SequenceGenerator::starting_at(first),
			archive,
		))
	}
}
