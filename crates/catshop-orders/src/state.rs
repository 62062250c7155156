//! Order lifecycle state machine.
//!
//! Enforces that entries only advance along
//! Waiting -> BeingPacked -> ToBeCollected, with removal from the desk as the
//! only way out of ToBeCollected. No state is skipped and no transition is
//! reversible.

use catshop_types::{OrderEntry, OrderState};
use chrono::Utc;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised when an entry is asked to make an illegal move.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
	#[error("Invalid state transition from {from} to {to}")]
	InvalidTransition { from: OrderState, to: OrderState },
}

/// Validates and applies lifecycle transitions to order entries.
pub struct OrderStateMachine;

impl OrderStateMachine {
	/// Checks if a state transition is valid.
	pub fn is_valid_transition(from: OrderState, to: OrderState) -> bool {
		// Static transition table - each state maps to allowed next states
		static TRANSITIONS: Lazy<HashMap<OrderState, HashSet<OrderState>>> = Lazy::new(|| {
			let mut m = HashMap::new();
			m.insert(
				OrderState::Waiting,
				HashSet::from([OrderState::BeingPacked]),
			);
			m.insert(
				OrderState::BeingPacked,
				HashSet::from([OrderState::ToBeCollected]),
			);
			m.insert(OrderState::ToBeCollected, HashSet::new()); // removal only
			m
		});

		TRANSITIONS
			.get(&from)
			.is_some_and(|set| set.contains(&to))
	}

	/// Whether an entry in `state` may be removed from the desk.
	pub fn is_collectable(state: OrderState) -> bool {
		state == OrderState::ToBeCollected
	}

	/// Moves `entry` to `to`, stamping the update time.
	///
	/// The entry is left untouched when the move is not allowed.
	pub fn transition(entry: &mut OrderEntry, to: OrderState) -> Result<(), LifecycleError> {
		if !Self::is_valid_transition(entry.state, to) {
			return Err(LifecycleError::InvalidTransition {
				from: entry.state,
				to,
			});
		}

		entry.state = to;
		entry.updated_at = Utc::now();
		Ok(())
	}
}
