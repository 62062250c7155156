//! The order desk.
//!
//! Composes the sequence generator, the order table and the archive into the
//! single shared desk that every terminal talks to.

use crate::report;
use crate::sequence::SequenceGenerator;
use crate::table::OrderTable;
use crate::{OrderError, OrderProcessing};
use async_trait::async_trait;
use catshop_archive::ArchiveService;
use catshop_types::{Basket, CollectedOrder, OrderEntry, OrderNumber, OrderSnapshot};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// In-process implementation of [`OrderProcessing`].
pub struct OrderDesk {
	id: String,
	sequence: SequenceGenerator,
	table: OrderTable,
	/// Numbers handed out by `next_order_number` and not yet submitted.
	reserved: Mutex<HashSet<OrderNumber>>,
	archive: Arc<ArchiveService>,
}

impl OrderDesk {
	pub fn new(
		id: impl Into<String>,
		sequence: SequenceGenerator,
		archive: Arc<ArchiveService>,
	) -> Self {
		Self {
			id: id.into(),
			sequence,
			table: OrderTable::new(),
			reserved: Mutex::new(HashSet::new()),
			archive,
		}
	}

	/// Identifier of this desk, used in logs.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// The order table backing this desk.
	pub fn table(&self) -> &OrderTable {
		&self.table
	}

	/// Claims a reserved number for submission.
	///
	/// A number can be claimed once; after that it is either live on the table
	/// or gone for good.
	async fn claim_reserved(&self, number: OrderNumber) -> Result<(), OrderError> {
		let claimed = self.reserved.lock().await.remove(&number);
		if claimed {
			return Ok(());
		}
		if self.table.contains(number).await {
			return Err(OrderError::DuplicateOrder(number));
		}
		tracing::warn!(order_number = %number, "Rejected order number not reserved here");
		Err(OrderError::InvalidOrderNumber(number))
	}
}

#[async_trait]
impl OrderProcessing for OrderDesk {
	#[instrument(skip_all, fields(desk = %self.id))]
	async fn new_order(&self, mut basket: Basket) -> Result<OrderNumber, OrderError> {
		let reserved = basket.order_number.is_some();
		let order_number = match basket.order_number {
			Some(number) => {
				self.claim_reserved(number).await?;
				number
			},
			None => {
				let number = self.sequence.next_number()?;
				basket.order_number = Some(number);
				number
			},
		};

		let items = basket.items.len();
		if let Err(e) = self.table.submit(order_number, Arc::new(basket)).await {
			if reserved {
				self.reserved.lock().await.insert(order_number);
			}
			return Err(e);
		}
		tracing::info!(order_number = %order_number, items, "Order submitted");
		Ok(order_number)
	}

	async fn next_order_number(&self) -> Result<OrderNumber, OrderError> {
		let number = self.sequence.next_number()?;
		self.reserved.lock().await.insert(number);
		tracing::debug!(order_number = %number, "Order number reserved");
		Ok(number)
	}

	#[instrument(skip_all, fields(desk = %self.id))]
	async fn get_order_to_pack(&self) -> Result<Option<OrderEntry>, OrderError> {
		let entry = self.table.take_next_waiting().await;
		match &entry {
			Some(entry) => {
				tracing::info!(order_number = %entry.order_number, "Order handed to packer")
			},
			None => tracing::debug!("No orders waiting to be packed"),
		}
		Ok(entry)
	}

	#[instrument(skip_all, fields(desk = %self.id, order_number = %order_number))]
	async fn inform_order_packed(&self, order_number: OrderNumber) -> Result<bool, OrderError> {
		let accepted = self.table.mark_packed(order_number).await;
		if accepted {
			tracing::info!("Order packed");
		} else {
			tracing::debug!("Ignored packed notification for order not being packed");
		}
		Ok(accepted)
	}

	#[instrument(skip_all, fields(desk = %self.id, order_number = %order_number))]
	async fn inform_order_collected(&self, order_number: OrderNumber) -> Result<bool, OrderError> {
		let Some(entry) = self.table.mark_collected(order_number).await else {
			tracing::debug!("Ignored collected notification for order not ready");
			return Ok(false);
		};
		tracing::info!("Order collected");

		// The table lock is released; the order is gone from the desk whatever
		// the archive does with it.
		if let Err(e) = self.archive.record(CollectedOrder::from(entry)).await {
			tracing::warn!(error = %e, "Failed to archive collected order");
		}
		Ok(true)
	}

	async fn get_order_state(&self) -> Result<OrderSnapshot, OrderError> {
		Ok(self.table.snapshot_by_state().await)
	}

	async fn generate_order_report(&self) -> Result<String, OrderError> {
		let entries = self.table.entries().await;
		Ok(report::render(&entries))
	}

	async fn collected_orders(&self, limit: usize) -> Result<Vec<CollectedOrder>, OrderError> {
		Ok(self.archive.recent(limit).await?)
	}
}
