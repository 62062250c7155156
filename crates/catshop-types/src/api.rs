//! API types for the order desk HTTP adapter.
//!
//! These are the request and response bodies exchanged with remote terminals.
//! The desk itself never sees them; the adapter converts them to and from the
//! core types.

use crate::{Basket, OrderNumber, Product};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for submitting a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderRequest {
	/// Number previously obtained from the desk, if the terminal reserved one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_number: Option<OrderNumber>,
	/// Line items bought.
	#[serde(default)]
	pub items: Vec<Product>,
}

impl From<NewOrderRequest> for Basket {
	fn from(request: NewOrderRequest) -> Self {
		Basket {
			order_number: request.order_number,
			items: request.items,
		}
	}
}

/// Response carrying a single order number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderNumberResponse {
	pub order_number: OrderNumber,
}

/// Response for lifecycle notifications that may be rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionResponse {
	/// Whether the desk accepted the transition.
	pub accepted: bool,
}

/// Query parameters for listing collected orders.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectedQuery {
	#[serde(default = "default_collected_limit")]
	pub limit: usize,
}

fn default_collected_limit() -> usize {
	20
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Bad request, e.g. an order number the desk never reserved (400)
	BadRequest { error_type: String, message: String },
	/// Conflict with the current desk contents (409)
	Conflict { error_type: String, message: String },
	/// Internal server error (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::Conflict { .. } => 409,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			APIError::BadRequest {
				error_type,
				message,
			}
			| APIError::Conflict {
				error_type,
				message,
			}
			| APIError::InternalServerError {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
			},
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = match self.status_code() {
			400 => StatusCode::BAD_REQUEST,
			409 => StatusCode::CONFLICT,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		};

		(status, Json(self.to_error_response())).into_response()
	}
}
