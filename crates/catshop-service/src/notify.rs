//! Terminal notification.
//!
//! Wraps any [`OrderProcessing`] implementation and publishes an
//! [`OrderEvent`] after each call that changed the desk.

use crate::event_bus::EventBus;
use async_trait::async_trait;
use catshop_orders::{OrderError, OrderProcessing};
use catshop_types::{Basket, CollectedOrder, OrderEntry, OrderEvent, OrderNumber, OrderSnapshot};

pub struct NotifyingDesk<P> {
	inner: P,
	events: EventBus,
}

impl<P: OrderProcessing> NotifyingDesk<P> {
	pub fn new(inner: P, events: EventBus) -> Self {
		Self { inner, events }
	}

	pub fn events(&self) -> &EventBus {
		&self.events
	}

	fn notify(&self, event: OrderEvent) {
		// No subscribers is not a failure of the call that caused the event
		if self.events.publish(event).is_err() {
			tracing::trace!("No terminals subscribed to order events");
		}
	}
}

#[async_trait]
impl<P: OrderProcessing> OrderProcessing for NotifyingDesk<P> {
	async fn new_order(&self, basket: Basket) -> Result<OrderNumber, OrderError> {
		let order_number = self.inner.new_order(basket).await?;
		self.notify(OrderEvent::Submitted { order_number });
		Ok(order_number)
	}

	async fn next_order_number(&self) -> Result<OrderNumber, OrderError> {
		self.inner.next_order_number().await
	}

	async fn get_order_to_pack(&self) -> Result<Option<OrderEntry>, OrderError> {
		let entry = self.inner.get_order_to_pack().await?;
		if let Some(entry) = &entry {
			self.notify(OrderEvent::PackingStarted {
				order_number: entry.order_number,
			});
		}
		Ok(entry)
	}

	async fn inform_order_packed(&self, order_number: OrderNumber) -> Result<bool, OrderError> {
		let accepted = self.inner.inform_order_packed(order_number).await?;
		if accepted {
			self.notify(OrderEvent::Packed { order_number });
		}
		Ok(accepted)
	}

	async fn inform_order_collected(&self, order_number: OrderNumber) -> Result<bool, OrderError> {
		let accepted = self.inner.inform_order_collected(order_number).await?;
		if accepted {
			self.notify(OrderEvent::Collected { order_number });
		}
		Ok(accepted)
	}

	async fn get_order_state(&self) -> Result<OrderSnapshot, OrderError> {
		self.inner.get_order_state().await
	}

	async fn generate_order_report(&self) -> Result<String, OrderError> {
		self.inner.generate_order_report().await
	}

	async fn collected_orders(&self, limit: usize) -> Result<Vec<CollectedOrder>, OrderError> {
		self.inner.collected_orders(limit).await
	}
}
