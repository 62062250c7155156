//! Archive records for orders that have been collected.

use crate::{Basket, OrderEntry, OrderNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An order that has left the desk after being collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedOrder {
	/// Number of the collected order.
	pub order_number: OrderNumber,
	/// Line items of the order.
	pub basket: Basket,
	/// When the order was originally submitted.
	pub submitted_at: DateTime<Utc>,
	/// When the collection was reported.
	pub collected_at: DateTime<Utc>,
}

impl From<OrderEntry> for CollectedOrder {
	fn from(entry: OrderEntry) -> Self {
		Self {
			order_number: entry.order_number,
			basket: (*entry.basket).clone(),
			submitted_at: entry.submitted_at,
			collected_at: Utc::now(),
		}
	}
}
