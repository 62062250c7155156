//! Configuration builder for creating test and development configurations.
//!
//! This module provides utilities for constructing Config instances with
//! sensible defaults, particularly useful for testing scenarios.

use crate::{ApiConfig, ArchiveConfig, Config, DeskConfig, OrdersConfig};
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	desk_id: String,
	event_capacity: usize,
	first_number: u64,
	archive_primary: String,
	archive_implementations: HashMap<String, toml::Value>,
	api: ApiConfig,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	///
	/// The archive defaults to `memory` with a capacity of 16.
	pub fn new() -> Self {
		let mut memory = toml::map::Map::new();
		memory.insert("capacity".to_string(), toml::Value::Integer(16));

		let mut archive_implementations = HashMap::new();
		archive_implementations.insert("memory".to_string(), toml::Value::Table(memory));

		Self {
			desk_id: "test-desk".to_string(),
			event_capacity: 64,
			first_number: 1,
			archive_primary: "memory".to_string(),
			archive_implementations,
			api: ApiConfig::default(),
		}
	}

	/// Sets the desk ID.
	pub fn desk_id(mut self, id: impl Into<String>) -> Self {
		self.desk_id = id.into();
		self
	}

	/// Sets the event buffer capacity.
	pub fn event_capacity(mut self, capacity: usize) -> Self {
		self.event_capacity = capacity;
		self
	}

	/// Sets the first order number.
	pub fn first_number(mut self, first_number: u64) -> Self {
		self.first_number = first_number;
		self
	}

	/// Selects the primary archive implementation and registers `config`
	/// as its settings.
	pub fn archive(mut self, primary: impl Into<String>, config: toml::Value) -> Self {
		let primary = primary.into();
		self.archive_implementations.insert(primary.clone(), config);
		self.archive_primary = primary;
		self
	}

	/// Sets the API configuration.
	pub fn api(mut self, api: ApiConfig) -> Self {
		self.api = api;
		self
	}

	/// Builds the `Config`.
	pub fn build(self) -> Config {
		Config {
			desk: DeskConfig {
				id: self.desk_id,
				event_capacity: self.event_capacity,
			},
			orders: OrdersConfig {
				first_number: self.first_number,
			},
			archive: ArchiveConfig {
				primary: self.archive_primary,
				implementations: self.archive_implementations,
			},
			api: self.api,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builder_defaults() {
		let config = ConfigBuilder::new().build();
		assert_eq!(config.desk.id, "test-desk");
		assert_eq!(config.orders.first_number, 1);
		assert_eq!(config.archive.primary, "memory");
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_builder_overrides() {
		let config = ConfigBuilder::new()
			.desk_id("packing-bench")
			.first_number(500)
			.archive("discard", toml::Value::Table(toml::map::Map::new()))
			.build();

		assert_eq!(config.desk.id, "packing-bench");
		assert_eq!(config.orders.first_number, 500);
		assert_eq!(config.archive.primary, "discard");
		assert!(config.archive.implementations.contains_key("memory"));
		assert!(config.validate().is_ok());
	}
}
