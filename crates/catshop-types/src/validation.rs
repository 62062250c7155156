//! Checks for implementation configuration sections.
//!
//! Sections such as `[archive.implementations.memory]` stay raw TOML until the
//! implementation that owns them checks them against its [`Schema`]. Every
//! archive setting today is a bounded integer, so that is all a schema knows.

use std::ops::RangeInclusive;
use thiserror::Error;

/// Reasons an implementation section was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
	#[error("Expected a table of settings, got {0}")]
	NotATable(&'static str),
	#[error("Missing required setting '{0}'")]
	MissingSetting(&'static str),
	#[error("Unknown setting '{0}'")]
	UnknownSetting(String),
	#[error("Setting '{name}' must be an integer, got {actual}")]
	NotAnInteger {
		name: &'static str,
		actual: &'static str,
	},
	#[error("Setting '{name}' is {value}, expected {min} to {max}")]
	OutOfRange {
		name: &'static str,
		value: i64,
		min: i64,
		max: i64,
	},
}

/// A required integer setting with its accepted range.
#[derive(Debug, Clone)]
pub struct IntegerSetting {
	name: &'static str,
	range: RangeInclusive<i64>,
}

impl IntegerSetting {
	pub fn new(name: &'static str, range: RangeInclusive<i64>) -> Self {
		Self { name, range }
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		let value = value.as_integer().ok_or(ValidationError::NotAnInteger {
			name: self.name,
			actual: value.type_str(),
		})?;
		if !self.range.contains(&value) {
			return Err(ValidationError::OutOfRange {
				name: self.name,
				value,
				min: *self.range.start(),
				max: *self.range.end(),
			});
		}
		Ok(())
	}
}

/// The full set of settings an implementation accepts.
///
/// A section validates when it is a table holding exactly the listed
/// settings, each within its range.
#[derive(Debug, Clone, Default)]
pub struct Schema {
	settings: Vec<IntegerSetting>,
}

impl Schema {
	pub fn new(settings: Vec<IntegerSetting>) -> Self {
		Self { settings }
	}

	/// A schema accepting only an empty table.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or(ValidationError::NotATable(config.type_str()))?;

		if let Some(unknown) = table
			.keys()
			.find(|key| !self.settings.iter().any(|s| s.name == key.as_str()))
		{
			return Err(ValidationError::UnknownSetting(unknown.clone()));
		}

		for setting in &self.settings {
			let value = table
				.get(setting.name)
				.ok_or(ValidationError::MissingSetting(setting.name))?;
			setting.check(value)?;
		}
		Ok(())
	}
}

/// Validation hook implemented once per pluggable implementation.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> Schema {
		Schema::new(vec![
			IntegerSetting::new("capacity", 1..=100),
			IntegerSetting::new("shards", 1..=8),
		])
	}

	fn parse(input: &str) -> toml::Value {
		toml::from_str(input).unwrap()
	}

	#[test]
	fn test_accepts_listed_settings() {
		assert_eq!(schema().validate(&parse("capacity = 10\nshards = 2")), Ok(()));
		assert_eq!(schema().validate(&parse("capacity = 100\nshards = 1")), Ok(()));
	}

	#[test]
	fn test_missing_setting() {
		assert_eq!(
			schema().validate(&parse("shards = 2")),
			Err(ValidationError::MissingSetting("capacity"))
		);
		assert_eq!(
			schema().validate(&parse("capacity = 2")),
			Err(ValidationError::MissingSetting("shards"))
		);
	}

	#[test]
	fn test_range_is_inclusive() {
		assert_eq!(
			schema().validate(&parse("capacity = 0")),
			Err(ValidationError::OutOfRange {
				name: "capacity",
				value: 0,
				min: 1,
				max: 100,
			})
		);
		assert!(schema().validate(&parse("capacity = 101\nshards = 1")).is_err());
		assert!(schema().validate(&parse("capacity = 5\nshards = 9")).is_err());
	}

	#[test]
	fn test_non_integer_setting() {
		assert_eq!(
			schema().validate(&parse("capacity = \"ten\"\nshards = 1")),
			Err(ValidationError::NotAnInteger {
				name: "capacity",
				actual: "string",
			})
		);
	}

	#[test]
	fn test_unknown_setting_rejected() {
		assert_eq!(
			schema().validate(&parse("capacity = 5\nshards = 1\ncapactiy = 6")),
			Err(ValidationError::UnknownSetting("capactiy".to_string()))
		);
	}

	#[test]
	fn test_empty_schema() {
		assert_eq!(Schema::empty().validate(&parse("")), Ok(()));
		assert!(Schema::empty().validate(&parse("capacity = 1")).is_err());
		assert_eq!(
			Schema::empty().validate(&toml::Value::Integer(3)),
			Err(ValidationError::NotATable("integer"))
		);
	}
}
