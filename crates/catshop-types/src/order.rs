//! Order lifecycle types for the order desk.
//!
//! This module defines order numbers, the lifecycle states an order moves
//! through, the entries tracked by the order table and the point-in-time
//! snapshots handed out to terminals.

use crate::Basket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Unique, positive order number.
///
/// Order numbers are issued once by the desk's sequence generator and are
/// never reused, even after the order has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct OrderNumber(u64);

impl OrderNumber {
	/// The lowest valid order number.
	pub const ONE: OrderNumber = OrderNumber(1);

	/// Creates an order number, returning `None` for zero.
	pub fn new(value: u64) -> Option<Self> {
		(value > 0).then_some(Self(value))
	}

	/// Returns the raw numeric value.
	pub fn get(self) -> u64 {
		self.0
	}
}

impl TryFrom<u64> for OrderNumber {
	type Error = String;

	fn try_from(value: u64) -> Result<Self, Self::Error> {
		Self::new(value).ok_or_else(|| "order number must be positive".to_string())
	}
}

impl From<OrderNumber> for u64 {
	fn from(number: OrderNumber) -> Self {
		number.0
	}
}

impl fmt::Display for OrderNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Lifecycle state of an order held by the desk.
///
/// Orders only ever advance: Waiting -> BeingPacked -> ToBeCollected, after
/// which they are removed from the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderState {
	/// Submitted by a cashier, not yet picked up by a packer.
	Waiting,
	/// Handed to a packer.
	BeingPacked,
	/// Packed and waiting at the collection point.
	ToBeCollected,
}

impl OrderState {
	/// All states in lifecycle order.
	pub const ALL: [OrderState; 3] = [
		OrderState::Waiting,
		OrderState::BeingPacked,
		OrderState::ToBeCollected,
	];

	/// Returns the string representation of the state.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderState::Waiting => "Waiting",
			OrderState::BeingPacked => "BeingPacked",
			OrderState::ToBeCollected => "ToBeCollected",
		}
	}
}

impl fmt::Display for OrderState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An order tracked by the desk together with its current state.
///
/// Entries handed out by the desk are copies; the basket is shared by
/// reference but the desk remains the only authority on the state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEntry {
	/// Number of this order.
	pub order_number: OrderNumber,
	/// Current lifecycle state.
	pub state: OrderState,
	/// Line items bought by the customer.
	pub basket: Arc<Basket>,
	/// When the order was submitted to the desk.
	pub submitted_at: DateTime<Utc>,
	/// When the state last changed.
	pub updated_at: DateTime<Utc>,
}

impl OrderEntry {
	/// Creates a freshly submitted entry in the `Waiting` state.
	pub fn waiting(order_number: OrderNumber, basket: Arc<Basket>) -> Self {
		let now = Utc::now();
		Self {
			order_number,
			state: OrderState::Waiting,
			basket,
			submitted_at: now,
			updated_at: now,
		}
	}
}

/// Order numbers grouped by lifecycle state at a single instant.
///
/// Each list keeps submission order. Serialized as a map keyed by the state
/// names `Waiting`, `BeingPacked` and `ToBeCollected`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
	#[serde(rename = "Waiting")]
	pub waiting: Vec<OrderNumber>,
	#[serde(rename = "BeingPacked")]
	pub being_packed: Vec<OrderNumber>,
	#[serde(rename = "ToBeCollected")]
	pub to_be_collected: Vec<OrderNumber>,
}

impl OrderSnapshot {
	/// Returns the orders currently in `state`.
	pub fn orders_in(&self, state: OrderState) -> &[OrderNumber] {
		match state {
			OrderState::Waiting => &self.waiting,
			OrderState::BeingPacked => &self.being_packed,
			OrderState::ToBeCollected => &self.to_be_collected,
		}
	}

	/// Appends an order to the list for `state`.
	pub fn push(&mut self, state: OrderState, order_number: OrderNumber) {
		match state {
			OrderState::Waiting => self.waiting.push(order_number),
			OrderState::BeingPacked => self.being_packed.push(order_number),
			OrderState::ToBeCollected => self.to_be_collected.push(order_number),
		}
	}

	/// Looks up which state an order is in, if it is on the desk at all.
	pub fn state_of(&self, order_number: OrderNumber) -> Option<OrderState> {
		OrderState::ALL
			.into_iter()
			.find(|state| self.orders_in(*state).contains(&order_number))
	}

	/// Total number of orders across all states.
	pub fn total(&self) -> usize {
		self.waiting.len() + self.being_packed.len() + self.to_be_collected.len()
	}

	/// Iterates over `(state, orders)` pairs in lifecycle order.
	pub fn iter(&self) -> impl Iterator<Item = (OrderState, &[OrderNumber])> + '_ {
		OrderState::ALL
			.into_iter()
			.map(move |state| (state, self.orders_in(state)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn number(n: u64) -> OrderNumber {
		OrderNumber::new(n).unwrap()
	}

	#[test]
	fn test_order_number_rejects_zero() {
		assert!(OrderNumber::new(0).is_none());
		assert_eq!(number(7).get(), 7);
		assert_eq!(number(7).to_string(), "#7");
	}

	#[test]
	fn test_order_number_wire_format() {
		assert_eq!(serde_json::to_string(&number(42)).unwrap(), "42");
		assert_eq!(serde_json::from_str::<OrderNumber>("42").unwrap(), number(42));
		assert!(serde_json::from_str::<OrderNumber>("0").is_err());
	}

	#[test]
	fn test_snapshot_serializes_with_state_keys() {
		let mut snapshot = OrderSnapshot::default();
		snapshot.push(OrderState::Waiting, number(2));
		snapshot.push(OrderState::BeingPacked, number(1));

		let json = serde_json::to_value(&snapshot).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"Waiting": [2],
				"BeingPacked": [1],
				"ToBeCollected": []
			})
		);
	}

	#[test]
	fn test_snapshot_lookup() {
		let mut snapshot = OrderSnapshot::default();
		snapshot.push(OrderState::Waiting, number(3));
		snapshot.push(OrderState::ToBeCollected, number(1));

		assert_eq!(snapshot.state_of(number(3)), Some(OrderState::Waiting));
		assert_eq!(snapshot.state_of(number(1)), Some(OrderState::ToBeCollected));
		assert_eq!(snapshot.state_of(number(2)), None);
		assert_eq!(snapshot.total(), 2);

		let states: Vec<_> = snapshot.iter().map(|(state, _)| state).collect();
		assert_eq!(states, OrderState::ALL.to_vec());
	}
}
