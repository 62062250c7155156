//! Basket types supplied by cashier terminals.
//!
//! The desk treats a basket as opaque payload: it is never validated or
//! mutated beyond stamping the order number and reading it for reports.

use crate::OrderNumber;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single line item in a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
	/// Catalogue number of the product, when known.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub product_number: Option<String>,
	/// Human readable description.
	pub description: String,
	/// Price of a single unit.
	pub unit_price: Decimal,
	/// Number of units bought.
	pub quantity: u32,
}

impl Product {
	pub fn new(description: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
		Self {
			product_number: None,
			description: description.into(),
			unit_price,
			quantity,
		}
	}
}

/// The products bought for one order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
	/// Number of the order owning this basket, once one has been assigned.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_number: Option<OrderNumber>,
	/// Line items in the order they were scanned.
	#[serde(default)]
	pub items: Vec<Product>,
}

impl Basket {
	/// Creates an empty basket with no order number.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a line item, builder style.
	pub fn with_item(mut self, item: Product) -> Self {
		self.items.push(item);
		self
	}

	/// Sum of `unit_price * quantity` over all line items.
	pub fn total(&self) -> Decimal {
		self.items
			.iter()
			.map(|item| item.unit_price * Decimal::from(item.quantity))
			.sum()
	}
}

/// Renders `#<n> (<description>: <qty> ...)` with descriptions padded or
/// truncated to 15 characters.
impl fmt::Display for Basket {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.order_number {
			Some(number) => write!(f, "{} (", number)?,
			None => f.write_str("#? (")?,
		}
		for item in &self.items {
			write!(f, "{:<15.15}: {:>3} ", item.description, item.quantity)?;
		}
		f.write_str(")")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_pads_and_truncates() {
		let basket = Basket {
			order_number: OrderNumber::new(4),
			items: vec![
				Product::new("Toaster", Decimal::new(1999, 2), 2),
				Product::new("Extra long kettle description", Decimal::new(550, 2), 11),
			],
		};

		assert_eq!(
			basket.to_string(),
			"#4 (Toaster        :   2 Extra long kett:  11 )"
		);
	}

	#[test]
	fn test_display_without_number() {
		assert_eq!(Basket::new().to_string(), "#? ()");
	}

	#[test]
	fn test_total() {
		let basket = Basket::new()
			.with_item(Product::new("Toaster", Decimal::new(1999, 2), 2))
			.with_item(Product::new("Kettle", Decimal::new(550, 2), 1));

		assert_eq!(basket.total(), Decimal::new(4548, 2));
		assert_eq!(Basket::new().total(), Decimal::ZERO);
	}
}
