//! Event types for terminal notification.
//!
//! The desk itself answers every call synchronously. Events are published by
//! the service layer after each successful state-changing call so that other
//! terminals (cashier, packer, collection display) can refresh.

use crate::OrderNumber;
use serde::{Deserialize, Serialize};

/// Events related to the order lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A new order has been submitted and is waiting to be packed.
	Submitted { order_number: OrderNumber },
	/// A packer has taken the order.
	PackingStarted { order_number: OrderNumber },
	/// The order has been packed and is ready for collection.
	Packed { order_number: OrderNumber },
	/// The customer has collected the order.
	Collected { order_number: OrderNumber },
}

impl OrderEvent {
	/// Returns the order this event refers to.
	pub fn order_number(&self) -> OrderNumber {
		match self {
			OrderEvent::Submitted { order_number }
			| OrderEvent::PackingStarted { order_number }
			| OrderEvent::Packed { order_number }
			| OrderEvent::Collected { order_number } => *order_number,
		}
	}
}
