//! Order desk core for the catshop.
//!
//! Cashier terminals submit baskets, packer terminals take the oldest waiting
//! order and report it packed, and collection terminals report orders handed
//! to the customer. This crate owns the single table of live orders and the
//! generator that numbers them, and exposes both through the
//! [`OrderProcessing`] trait.

use async_trait::async_trait;
use catshop_types::{Basket, CollectedOrder, OrderEntry, OrderNumber, OrderSnapshot};
use thiserror::Error;

pub mod builder;
pub mod desk;
pub mod report;
pub mod sequence;
pub mod state;
pub mod table;

pub use builder::{BuilderError, DeskBuilder};
pub use desk::OrderDesk;
pub use sequence::{SequenceError, SequenceGenerator};
pub use state::{LifecycleError, OrderStateMachine};
pub use table::OrderTable;

/// Errors returned by desk operations.
///
/// Unknown orders and orders in the wrong state are not errors: those calls
/// answer `false` or `None` and leave the desk unchanged.
#[derive(Debug, Error)]
pub enum OrderError {
	/// The order number is already on the desk.
	#[error("Order {0} is already on the desk")]
	DuplicateOrder(OrderNumber),
	/// The basket carries a number that is not an open reservation.
	#[error("Order number {0} is not reserved at this desk")]
	InvalidOrderNumber(OrderNumber),
	/// No further order numbers can be issued.
	#[error("Order numbers exhausted")]
	SequenceExhausted,
	/// The archive backend failed.
	#[error("Archive error: {0}")]
	Archive(String),
}

impl From<SequenceError> for OrderError {
	fn from(err: SequenceError) -> Self {
		match err {
			SequenceError::Exhausted => OrderError::SequenceExhausted,
		}
	}
}

impl From<catshop_archive::ArchiveError> for OrderError {
	fn from(err: catshop_archive::ArchiveError) -> Self {
		OrderError::Archive(err.to_string())
	}
}

/// Operations offered to cashier, packer and collection terminals.
///
/// Every call is safe to make concurrently from any number of terminals.
#[async_trait]
pub trait OrderProcessing: Send + Sync {
	/// Submits a basket as a new `Waiting` order.
	///
	/// A basket without a number is stamped with a fresh one. A basket that
	/// already carries one must have been given it by `next_order_number`,
	/// and each reserved number can be submitted once.
	async fn new_order(&self, basket: Basket) -> Result<OrderNumber, OrderError>;

	/// Reserves an order number without submitting anything.
	async fn next_order_number(&self) -> Result<OrderNumber, OrderError>;

	/// Hands the earliest submitted waiting order to a packer.
	async fn get_order_to_pack(&self) -> Result<Option<OrderEntry>, OrderError>;

	/// Reports an order as packed. `false` when it was not being packed.
	async fn inform_order_packed(&self, order_number: OrderNumber) -> Result<bool, OrderError>;

	/// Reports an order as collected and removes it from the desk. `false`
	/// when it was not waiting for collection.
	async fn inform_order_collected(&self, order_number: OrderNumber)
		-> Result<bool, OrderError>;

	/// Order numbers grouped by state.
	async fn get_order_state(&self) -> Result<OrderSnapshot, OrderError>;

	/// Human readable report of every order on the desk.
	async fn generate_order_report(&self) -> Result<String, OrderError>;

	/// Most recently collected orders, newest first.
	async fn collected_orders(&self, limit: usize) -> Result<Vec<CollectedOrder>, OrderError>;
}
