//! The order table.
//!
//! Single source of truth for which orders exist and what state they are in.
//! Every operation holds the table lock for its whole duration, so no caller
//! can observe a half-applied change made by another.

use crate::state::OrderStateMachine;
use crate::OrderError;
use catshop_types::{Basket, OrderEntry, OrderNumber, OrderSnapshot, OrderState};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct TableInner {
	/// Entries keyed by submission position.
	entries: BTreeMap<u64, OrderEntry>,
	/// Order number to submission position.
	index: HashMap<OrderNumber, u64>,
	/// Positions of Waiting entries, earliest submission at the front.
	waiting: VecDeque<u64>,
	/// Position assigned to the next submitted entry.
	next_position: u64,
}

impl TableInner {
	fn entry_mut(&mut self, order_number: OrderNumber) -> Option<&mut OrderEntry> {
		let position = self.index.get(&order_number)?;
		self.entries.get_mut(position)
	}
}

/// Concurrency-safe collection of all live orders.
#[derive(Default)]
pub struct OrderTable {
	inner: Mutex<TableInner>,
}

impl OrderTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a new order in the `Waiting` state.
	///
	/// Fails with `DuplicateOrder` when the number is already on the table.
	pub async fn submit(
		&self,
		order_number: OrderNumber,
		basket: Arc<Basket>,
	) -> Result<(), OrderError> {
		let mut inner = self.inner.lock().await;
		if inner.index.contains_key(&order_number) {
			return Err(OrderError::DuplicateOrder(order_number));
		}

		let position = inner.next_position;
		inner.next_position += 1;
		inner
			.entries
			.insert(position, OrderEntry::waiting(order_number, basket));
		inner.index.insert(order_number, position);
		inner.waiting.push_back(position);
		Ok(())
	}

	/// Hands out the earliest submitted `Waiting` order, moving it to
	/// `BeingPacked`. Each order is handed out at most once.
	pub async fn take_next_waiting(&self) -> Option<OrderEntry> {
		let mut inner = self.inner.lock().await;
		while let Some(position) = inner.waiting.pop_front() {
			let Some(entry) = inner.entries.get_mut(&position) else {
				continue;
			};
			if OrderStateMachine::transition(entry, OrderState::BeingPacked).is_ok() {
				return Some(entry.clone());
			}
		}
		None
	}

	/// Moves a `BeingPacked` order to `ToBeCollected`.
	///
	/// Returns `false`, leaving the table unchanged, when the order is unknown
	/// or in any other state.
	pub async fn mark_packed(&self, order_number: OrderNumber) -> bool {
		let mut inner = self.inner.lock().await;
		inner.entry_mut(order_number).is_some_and(|entry| {
			OrderStateMachine::transition(entry, OrderState::ToBeCollected).is_ok()
		})
	}

	/// Removes a `ToBeCollected` order and returns it.
	///
	/// Returns `None`, leaving the table unchanged, when the order is unknown
	/// or not yet packed.
	pub async fn mark_collected(&self, order_number: OrderNumber) -> Option<OrderEntry> {
		let mut inner = self.inner.lock().await;
		let position = *inner.index.get(&order_number)?;
		let collectable = inner
			.entries
			.get(&position)
			.is_some_and(|entry| OrderStateMachine::is_collectable(entry.state));
		if !collectable {
			return None;
		}

		inner.index.remove(&order_number);
		inner.entries.remove(&position)
	}

	/// Order numbers grouped by state, in submission order.
	pub async fn snapshot_by_state(&self) -> OrderSnapshot {
		let inner = self.inner.lock().await;
		let mut snapshot = OrderSnapshot::default();
		for entry in inner.entries.values() {
			snapshot.push(entry.state, entry.order_number);
		}
		snapshot
	}

	/// Copies of every entry, in submission order.
	pub async fn entries(&self) -> Vec<OrderEntry> {
		self.inner.lock().await.entries.values().cloned().collect()
	}

	/// Whether `order_number` is currently on the table, in any state.
	pub async fn contains(&self, order_number: OrderNumber) -> bool {
		self.inner.lock().await.index.contains_key(&order_number)
	}

	/// Number of orders on the table.
	pub async fn len(&self) -> usize {
		self.inner.lock().await.entries.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	fn number(n: u64) -> OrderNumber {
		OrderNumber::new(n).unwrap()
	}

	fn basket(n: u64) -> Arc<Basket> {
		Arc::new(Basket {
			order_number: Some(number(n)),
			items: Vec::new(),
		})
	}

	async fn table_with(numbers: &[u64]) -> OrderTable {
		let table = OrderTable::new();
		for n in numbers {
			table.submit(number(*n), basket(*n)).await.unwrap();
		}
		table
	}

	#[tokio::test]
	async fn test_submit_rejects_duplicates() {
		let table = table_with(&[1]).await;
		let result = table.submit(number(1), basket(1)).await;
		assert!(matches!(result, Err(OrderError::DuplicateOrder(n)) if n == number(1)));
		assert_eq!(table.len().await, 1);
	}

	#[tokio::test]
	async fn test_fifo_follows_submission_not_number() {
		// Numbers are reserved before submission, so they can arrive out of order
		let table = table_with(&[3, 1, 2]).await;

		let taken: Vec<u64> = [
			table.take_next_waiting().await,
			table.take_next_waiting().await,
			table.take_next_waiting().await,
		]
		.into_iter()
		.map(|e| e.unwrap().order_number.get())
		.collect();

		assert_eq!(taken, vec![3, 1, 2]);
		assert!(table.take_next_waiting().await.is_none());
	}

	#[tokio::test]
	async fn test_taken_entry_is_being_packed() {
		let table = table_with(&[1]).await;
		let entry = table.take_next_waiting().await.unwrap();
		assert_eq!(entry.state, OrderState::BeingPacked);

		let snapshot = table.snapshot_by_state().await;
		assert_eq!(snapshot.being_packed, vec![number(1)]);
		assert!(snapshot.waiting.is_empty());
	}

	#[tokio::test]
	async fn test_mark_packed_requires_being_packed() {
		let table = table_with(&[1]).await;

		// Still waiting
		assert!(!table.mark_packed(number(1)).await);
		// Unknown
		assert!(!table.mark_packed(number(9)).await);

		table.take_next_waiting().await.unwrap();
		assert!(table.mark_packed(number(1)).await);
		// Reported twice
		assert!(!table.mark_packed(number(1)).await);

		let snapshot = table.snapshot_by_state().await;
		assert_eq!(snapshot.to_be_collected, vec![number(1)]);
	}

	#[tokio::test]
	async fn test_mark_collected_requires_to_be_collected() {
		let table = table_with(&[1]).await;
		assert!(table.mark_collected(number(1)).await.is_none());

		table.take_next_waiting().await.unwrap();
		assert!(table.mark_collected(number(1)).await.is_none());

		table.mark_packed(number(1)).await;
		let removed = table.mark_collected(number(1)).await.unwrap();
		assert_eq!(removed.order_number, number(1));
		assert_eq!(removed.state, OrderState::ToBeCollected);

		assert!(table.is_empty().await);
		assert!(table.mark_collected(number(1)).await.is_none());
	}

	#[tokio::test]
	async fn test_failed_transitions_leave_snapshot_unchanged() {
		let table = table_with(&[1, 2, 3]).await;
		table.take_next_waiting().await.unwrap();
		let before = table.snapshot_by_state().await;

		assert!(!table.mark_packed(number(2)).await);
		assert!(table.mark_collected(number(1)).await.is_none());
		assert!(table.mark_collected(number(3)).await.is_none());
		assert!(!table.mark_packed(number(42)).await);

		assert_eq!(table.snapshot_by_state().await, before);
	}

	#[tokio::test]
	async fn test_table_only_guards_live_entries() {
		let table = table_with(&[1]).await;
		table.take_next_waiting().await.unwrap();
		table.mark_packed(number(1)).await;
		assert!(table.contains(number(1)).await);
		table.mark_collected(number(1)).await.unwrap();
		assert!(!table.contains(number(1)).await);

		// The table itself only guards live entries; reuse is prevented by
		// the desk's reservations.
		assert!(table.submit(number(1), basket(1)).await.is_ok());
	}

	#[tokio::test]
	async fn test_snapshot_keeps_submission_order() {
		let table = table_with(&[5, 2, 8, 1]).await;
		table.take_next_waiting().await.unwrap(); // 5
		table.take_next_waiting().await.unwrap(); // 2
		table.mark_packed(number(2)).await;

		let snapshot = table.snapshot_by_state().await;
		assert_eq!(snapshot.waiting, vec![number(8), number(1)]);
		assert_eq!(snapshot.being_packed, vec![number(5)]);
		assert_eq!(snapshot.to_be_collected, vec![number(2)]);

		let entries: Vec<u64> = table
			.entries()
			.await
			.iter()
			.map(|e| e.order_number.get())
			.collect();
		assert_eq!(entries, vec![5, 2, 8, 1]);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_take_hands_out_each_order_once() {
		const WAITING: u64 = 10;
		const PACKERS: usize = 32;

		let numbers: Vec<u64> = (1..=WAITING).collect();
		let table = Arc::new(table_with(&numbers).await);

		let handles: Vec<_> = (0..PACKERS)
			.map(|_| {
				let table = Arc::clone(&table);
				tokio::spawn(async move { table.take_next_waiting().await })
			})
			.collect();

		let mut taken = HashSet::new();
		let mut empty = 0;
		for handle in handles {
			match handle.await.unwrap() {
				Some(entry) => assert!(taken.insert(entry.order_number), "handed out twice"),
				None => empty += 1,
			}
		}

		assert_eq!(taken.len(), WAITING as usize);
		assert_eq!(empty, PACKERS - WAITING as usize);
		assert_eq!(table.snapshot_by_state().await.being_packed.len(), WAITING as usize);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_mark_packed_succeeds_once() {
		let table = Arc::new(table_with(&[1]).await);
		table.take_next_waiting().await.unwrap();

		let handles: Vec<_> = (0..16)
			.map(|_| {
				let table = Arc::clone(&table);
				tokio::spawn(async move { table.mark_packed(number(1)).await })
			})
			.collect();

		let mut successes = 0;
		for handle in handles {
			if handle.await.unwrap() {
				successes += 1;
			}
		}
		assert_eq!(successes, 1);
	}
}
