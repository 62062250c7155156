//! Order number generation.
//!
//! The generator is an owned instance composed into the desk rather than a
//! process-wide counter. Increments are lock-free and independent of the
//! order table lock, so numbers can be reserved before an order is built.

use catshop_types::OrderNumber;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Errors that can occur while issuing order numbers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
	#[error("Order numbers exhausted")]
	Exhausted,
}

/// Issues strictly increasing, never reused order numbers.
#[derive(Debug)]
pub struct SequenceGenerator {
	first: OrderNumber,
	/// Next value to hand out. Zero once `u64::MAX` has been issued.
	next: AtomicU64,
}

impl SequenceGenerator {
	/// Creates a generator whose first number is `first`.
	pub fn starting_at(first: OrderNumber) -> Self {
		Self {
			first,
			next: AtomicU64::new(first.get()),
		}
	}

	/// Issues the next order number.
	pub fn next_number(&self) -> Result<OrderNumber, SequenceError> {
		let issued = self
			.next
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
				(n != 0).then_some(n.wrapping_add(1))
			})
			.map_err(|_| SequenceError::Exhausted)?;
		OrderNumber::new(issued).ok_or(SequenceError::Exhausted)
	}

	/// First number this generator hands out.
	pub fn first(&self) -> OrderNumber {
		self.first
	}

	/// Highest number issued so far, if any.
	pub fn last_issued(&self) -> Option<OrderNumber> {
		match self.next.load(Ordering::Acquire) {
			0 => OrderNumber::new(u64::MAX),
			n if n == self.first.get() => None,
			n => OrderNumber::new(n - 1),
		}
	}
}

impl Default for SequenceGenerator {
	fn default() -> Self {
		Self::starting_at(OrderNumber::ONE)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;
	use std::sync::Arc;

	#[test]
	fn test_starts_at_one_and_increases() {
		let sequence = SequenceGenerator::default();
		assert_eq!(sequence.last_issued(), None);

		let issued: Vec<u64> = (0..5).map(|_| sequence.next_number().unwrap().get()).collect();
		assert_eq!(issued, vec![1, 2, 3, 4, 5]);
		assert_eq!(sequence.last_issued().map(OrderNumber::get), Some(5));
	}

	#[test]
	fn test_custom_start() {
		let sequence = SequenceGenerator::starting_at(OrderNumber::new(1000).unwrap());
		assert_eq!(sequence.first().get(), 1000);
		assert_eq!(sequence.next_number().unwrap().get(), 1000);
		assert_eq!(sequence.next_number().unwrap().get(), 1001);
	}

	#[test]
	fn test_exhaustion_is_reported() {
		let sequence = SequenceGenerator::starting_at(OrderNumber::new(u64::MAX).unwrap());
		assert_eq!(sequence.next_number().unwrap().get(), u64::MAX);
		assert_eq!(sequence.next_number(), Err(SequenceError::Exhausted));
		assert_eq!(sequence.next_number(), Err(SequenceError::Exhausted));
		assert_eq!(sequence.last_issued().map(OrderNumber::get), Some(u64::MAX));
	}

	#[test]
	fn test_concurrent_numbers_are_unique() {
		const THREADS: usize = 8;
		const PER_THREAD: usize = 500;

		let sequence = Arc::new(SequenceGenerator::default());
		let handles: Vec<_> = (0..THREADS)
			.map(|_| {
				let sequence = Arc::clone(&sequence);
				std::thread::spawn(move || {
					let issued: Vec<u64> = (0..PER_THREAD)
						.map(|_| sequence.next_number().unwrap().get())
						.collect();
					// Each caller observes its own numbers strictly increasing
					assert!(issued.windows(2).all(|w| w[0] < w[1]));
					issued
				})
			})
			.collect();

		let mut all = HashSet::new();
		for handle in handles {
			for n in handle.join().unwrap() {
				assert!(all.insert(n), "order number {} issued twice", n);
			}
		}

		assert_eq!(all.len(), THREADS * PER_THREAD);
		assert_eq!(all.iter().max().copied(), Some((THREADS * PER_THREAD) as u64));
	}
}
