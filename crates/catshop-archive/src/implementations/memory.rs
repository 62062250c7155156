//! In-memory archive backend.
//!
//! Keeps the most recently collected orders in a bounded ring, evicting the
//! oldest record once the configured capacity is reached. Nothing survives a
//! restart.

use crate::{ArchiveError, ArchiveFactory, ArchiveInterface, ArchiveRegistry};
use async_trait::async_trait;
use catshop_types::{
	CollectedOrder, ConfigSchema, ImplementationRegistry, IntegerSetting, Schema,
	ValidationError,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Upper bound accepted for `capacity`.
const MAX_CAPACITY: i64 = 1_000_000;

/// Bounded in-memory archive.
pub struct MemoryArchive {
	/// Maximum number of records retained.
	capacity: usize,
	/// Records in collection order, oldest at the front.
	records: Arc<RwLock<VecDeque<CollectedOrder>>>,
}

impl MemoryArchive {
	/// Creates a new MemoryArchive retaining at most `capacity` orders.
	///
	/// A capacity of zero is treated as one.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			capacity,
			records: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
		}
	}
}

#[async_trait]
impl ArchiveInterface for MemoryArchive {
	async fn record(&self, order: CollectedOrder) -> Result<(), ArchiveError> {
		let mut records = self.records.write().await;
		while records.len() >= self.capacity {
			records.pop_front();
		}
		records.push_back(order);
		Ok(())
	}

	async fn recent(&self, limit: usize) -> Result<Vec<CollectedOrder>, ArchiveError> {
		let records = self.records.read().await;
		Ok(records.iter().rev().take(limit).cloned().collect())
	}

}

/// Configuration schema for MemoryArchive.
pub struct MemoryArchiveSchema;

impl ConfigSchema for MemoryArchiveSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		Schema::new(vec![IntegerSetting::new("capacity", 1..=MAX_CAPACITY)]).validate(config)
	}
}

/// Factory function to create a memory archive from configuration.
///
/// Configuration parameters:
/// - `capacity`: number of collected orders to keep (1 to 1,000,000)
pub fn create_archive(config: &toml::Value) -> Result<Box<dyn ArchiveInterface>, ArchiveError> {
	MemoryArchiveSchema
		.validate(config)
		.map_err(|e| ArchiveError::Configuration(format!("Invalid configuration: {}", e)))?;

	let capacity = config
		.get("capacity")
		.and_then(|v| v.as_integer())
		.and_then(|v| usize::try_from(v).ok())
		.ok_or_else(|| ArchiveError::Configuration("capacity must be a positive integer".into()))?;

	Ok(Box::new(MemoryArchive::new(capacity)))
}

/// Registry for the memory archive implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = ArchiveFactory;

	fn factory() -> Self::Factory {
		create_archive
	}
}

impl ArchiveRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use catshop_types::{Basket, OrderNumber};

	fn collected(n: u64) -> CollectedOrder {
		let now = chrono::Utc::now();
		CollectedOrder {
			order_number: OrderNumber::new(n).unwrap(),
			basket: Basket::new(),
			submitted_at: now,
			collected_at: now,
		}
	}

	fn numbers(records: &[CollectedOrder]) -> Vec<u64> {
		records.iter().map(|r| r.order_number.get()).collect()
	}

	#[tokio::test]
	async fn test_recent_is_newest_first() {
		let archive = MemoryArchive::new(10);
		for n in 1..=4 {
			archive.record(collected(n)).await.unwrap();
		}

		assert_eq!(numbers(&archive.recent(10).await.unwrap()), vec![4, 3, 2, 1]);
		assert_eq!(numbers(&archive.recent(2).await.unwrap()), vec![4, 3]);
		assert!(archive.recent(0).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_oldest_evicted_at_capacity() {
		let archive = MemoryArchive::new(3);
		for n in 1..=5 {
			archive.record(collected(n)).await.unwrap();
		}

		assert_eq!(numbers(&archive.recent(10).await.unwrap()), vec![5, 4, 3]);
	}

	#[test]
	fn test_factory_validates_capacity() {
		let ok: toml::Value = toml::from_str("capacity = 5").unwrap();
		assert!(create_archive(&ok).is_ok());

		let zero: toml::Value = toml::from_str("capacity = 0").unwrap();
		assert!(matches!(
			create_archive(&zero),
			Err(ArchiveError::Configuration(_))
		));

		let missing: toml::Value = toml::from_str("").unwrap();
		assert!(create_archive(&missing).is_err());

		let typo: toml::Value = toml::from_str("capacity = 5\nretain = 5").unwrap();
		assert!(matches!(
			create_archive(&typo),
			Err(ArchiveError::Configuration(msg)) if msg.contains("retain")
		));
	}
}
