//! Broadcast channel for order events.
//!
//! Every subscriber sees every event published after it subscribed. A
//! subscriber that falls more than `capacity` events behind loses the oldest
//! ones; publishers never wait for subscribers.

use catshop_types::OrderEvent;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<OrderEvent>,
}

impl EventBus {
	/// Creates a bus buffering at most `capacity` events per subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity.max(1));
		Self { sender }
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns the number of subscribers reached. Publishing with no
	/// subscribers is an error the caller may ignore.
	pub fn publish(
		&self,
		event: OrderEvent,
	) -> Result<usize, broadcast::error::SendError<OrderEvent>> {
		self.sender.send(event)
	}

	pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
		self.sender.subscribe()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use catshop_types::OrderNumber;
	use tokio::sync::broadcast::error::RecvError;

	fn submitted(n: u64) -> OrderEvent {
		OrderEvent::Submitted {
			order_number: OrderNumber::new(n).unwrap(),
		}
	}

	#[tokio::test]
	async fn test_every_subscriber_receives_events() {
		let bus = EventBus::new(8);
		let mut first = bus.subscribe();
		let mut second = bus.subscribe();

		assert_eq!(bus.publish(submitted(1)).unwrap(), 2);
		assert_eq!(first.recv().await.unwrap(), submitted(1));
		assert_eq!(second.recv().await.unwrap(), submitted(1));
	}

	#[tokio::test]
	async fn test_publish_without_subscribers_fails_quietly() {
		let bus = EventBus::new(8);
		assert!(bus.publish(submitted(1)).is_err());

		// Dropped subscribers stop counting
		drop(bus.subscribe());
		assert!(bus.publish(submitted(2)).is_err());
	}

	#[tokio::test]
	async fn test_lagging_subscriber_loses_oldest() {
		let bus = EventBus::new(2);
		let mut slow = bus.subscribe();
		for n in 1..=4 {
			bus.publish(submitted(n)).unwrap();
		}

		assert!(matches!(slow.recv().await, Err(RecvError::Lagged(2))));
		assert_eq!(slow.recv().await.unwrap(), submitted(3));
		assert_eq!(slow.recv().await.unwrap(), submitted(4));
	}
}
