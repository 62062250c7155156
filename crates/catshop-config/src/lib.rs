//! Configuration module for the catshop order desk.
//!
//! This module provides structures and utilities for managing desk
//! configuration. It supports loading configuration from TOML files, resolves
//! `${VAR}` and `${VAR:-default}` references from the environment and
//! validates that all required values are properly set.

#[cfg(feature = "testing")]
pub mod builders;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the order desk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity and runtime settings of this desk instance.
	pub desk: DeskConfig,
	/// Order numbering settings.
	#[serde(default)]
	pub orders: OrdersConfig,
	/// Retention of collected orders.
	pub archive: ArchiveConfig,
	/// HTTP adapter settings.
	#[serde(default)]
	pub api: ApiConfig,
}

/// Configuration specific to the desk instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeskConfig {
	/// Identifier used in logs.
	pub id: String,
	/// Number of undelivered events buffered per subscriber.
	#[serde(default = "default_event_capacity")]
	pub event_capacity: usize,
}

fn default_event_capacity() -> usize {
	256
}

/// Order numbering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrdersConfig {
	/// First order number handed out by the sequence generator.
	#[serde(default = "default_first_number")]
	pub first_number: u64,
}

impl Default for OrdersConfig {
	fn default() -> Self {
		Self {
			first_number: default_first_number(),
		}
	}
}

fn default_first_number() -> u64 {
	1
}

/// Configuration for collected-order retention.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of archive implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the HTTP adapter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Maximum request size in bytes.
	#[serde(default = "default_max_request_size")]
	pub max_request_size: usize,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_api_host(),
			port: default_api_port(),
			max_request_size: default_max_request_size(),
		}
	}
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	3000
}

fn default_max_request_size() -> usize {
	1024 * 1024 // 1MB
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let var_name = var_name.as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read {}: {}", path.display(), e),
			))
		})?;
		content.parse()
	}

	/// Validates the configuration to ensure all required fields are properly set.
	///
	/// - Ensures the desk ID is not empty
	/// - Bounds the event buffer capacity
	/// - Requires order numbering to start at 1 or above
	/// - Checks that the primary archive implementation is configured
	fn validate(&self) -> Result<(), ConfigError> {
		if self.desk.id.trim().is_empty() {
			return Err(ConfigError::Validation("Desk ID cannot be empty".into()));
		}
		if self.desk.event_capacity == 0 {
			return Err(ConfigError::Validation(
				"Desk event_capacity must be greater than 0".into(),
			));
		}
		if self.desk.event_capacity > 65536 {
			return Err(ConfigError::Validation(
				"Desk event_capacity cannot exceed 65536".into(),
			));
		}

		if self.orders.first_number == 0 {
			return Err(ConfigError::Validation(
				"Order first_number must be at least 1".into(),
			));
		}

		if self.archive.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Archive primary implementation cannot be empty".into(),
			));
		}
		if !self
			.archive
			.implementations
			.contains_key(&self.archive.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary archive '{}' not found in implementations",
				self.archive.primary
			)));
		}

		if self.api.max_request_size == 0 {
			return Err(ConfigError::Validation(
				"API max_request_size must be greater than 0".into(),
			));
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is automatically
/// validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
