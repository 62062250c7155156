//! Order report rendering.
//!
//! Pure functions over a consistent copy of the table's entries. The report
//! always contains every section so that anything parsing it can rely on the
//! headings being present.

use catshop_types::{OrderEntry, OrderState};
use std::fmt::Write;

/// Per-state order counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
	pub total: usize,
	pub waiting: usize,
	pub being_packed: usize,
	pub to_be_collected: usize,
}

impl ReportSummary {
	/// Count for a single state.
	pub fn count(&self, state: OrderState) -> usize {
		match state {
			OrderState::Waiting => self.waiting,
			OrderState::BeingPacked => self.being_packed,
			OrderState::ToBeCollected => self.to_be_collected,
		}
	}
}

/// Counts entries per state.
pub fn summarize(entries: &[OrderEntry]) -> ReportSummary {
	entries
		.iter()
		.fold(ReportSummary::default(), |mut summary, entry| {
			summary.total += 1;
			match entry.state {
				OrderState::Waiting => summary.waiting += 1,
				OrderState::BeingPacked => summary.being_packed += 1,
				OrderState::ToBeCollected => summary.to_be_collected += 1,
			}
			summary
		})
}

fn section_heading(state: OrderState) -> (&'static str, &'static str) {
	match state {
		OrderState::Waiting => ("ORDERS WAITING TO BE PROCESSED:", "No orders waiting"),
		OrderState::BeingPacked => ("ORDERS CURRENTLY BEING PACKED:", "No orders being packed"),
		OrderState::ToBeCollected => (
			"ORDERS WAITING TO BE COLLECTED:",
			"No orders waiting for collection",
		),
	}
}

/// Renders the order report.
///
/// `entries` must be in submission order; orders are listed in that order
/// within each section.
pub fn render(entries: &[OrderEntry]) -> String {
	let mut report = String::with_capacity(512 + entries.len() * 64);
	// Writing into a String cannot fail
	let _ = write_report(&mut report, entries);
	report
}

fn write_report(out: &mut String, entries: &[OrderEntry]) -> std::fmt::Result {
	writeln!(out, "ORDER PROCESSING SYSTEM REPORT")?;
	writeln!(out, "==============================")?;
	writeln!(out)?;

	for state in OrderState::ALL {
		let (heading, none_line) = section_heading(state);
		writeln!(out, "{}", heading)?;
		// Rules run one column past the heading
		writeln!(out, "{}", "-".repeat(heading.len() + 1))?;

		let mut listed = false;
		for entry in entries.iter().filter(|e| e.state == state) {
			writeln!(out, "{}", entry.basket)?;
			listed = true;
		}
		if !listed {
			writeln!(out, "{}", none_line)?;
		}
		writeln!(out)?;
	}

	let summary = summarize(entries);
	writeln!(out, "SUMMARY:")?;
	writeln!(out, "---------")?;
	writeln!(out, "Total orders in system: {}", summary.total)?;
	writeln!(out, "- Waiting to be processed: {}", summary.waiting)?;
	writeln!(out, "- Currently being packed: {}", summary.being_packed)?;
	writeln!(out, "- Waiting to be collected: {}", summary.to_be_collected)?;
	Ok(())
}
