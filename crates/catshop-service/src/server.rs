//! HTTP server for remote terminals.
//!
//! Exposes the desk operations under `/api` so cashier, packer and collection
//! terminals can run as separate processes.

use axum::{
	extract::{
		rejection::{JsonRejection, PathRejection},
		DefaultBodyLimit, Path, Query, State,
	},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::{get, post},
	Router,
};
use catshop_config::ApiConfig;
use catshop_orders::{OrderError, OrderProcessing};
use catshop_types::{
	APIError, CollectedOrder, CollectedQuery, NewOrderRequest, OrderNumber, OrderNumberResponse,
	OrderSnapshot, TransitionResponse,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	pub desk: Arc<dyn OrderProcessing>,
}

/// Builds the API router.
pub fn router(desk: Arc<dyn OrderProcessing>, max_request_size: usize) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/orders", post(handle_new_order))
				.route("/orders/number", post(handle_next_number))
				.route("/orders/pack", post(handle_order_to_pack))
				.route("/orders/{number}/packed", post(handle_packed))
				.route("/orders/{number}/collected", post(handle_collected))
				.route("/orders/state", get(handle_state))
				.route("/orders/report", get(handle_report))
				.route("/orders/collected", get(handle_collected_orders)),
		)
		.layer(
			ServiceBuilder::new()
				.layer(DefaultBodyLimit::max(max_request_size))
				.layer(CorsLayer::permissive()),
		)
		.with_state(AppState { desk })
}

/// Binds the configured address and serves the API until the task is dropped.
pub async fn start_server(
	api_config: ApiConfig,
	desk: Arc<dyn OrderProcessing>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(desk, api_config.max_request_size);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Order desk API listening on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

fn api_error(error: OrderError) -> APIError {
	match error {
		OrderError::DuplicateOrder(_) => APIError::Conflict {
			error_type: "DUPLICATE_ORDER".to_string(),
			message: error.to_string(),
		},
		OrderError::InvalidOrderNumber(_) => APIError::BadRequest {
			error_type: "INVALID_ORDER_NUMBER".to_string(),
			message: error.to_string(),
		},
		OrderError::SequenceExhausted => APIError::InternalServerError {
			error_type: "SEQUENCE_EXHAUSTED".to_string(),
			message: error.to_string(),
		},
		OrderError::Archive(_) => APIError::InternalServerError {
			error_type: "ARCHIVE_ERROR".to_string(),
			message: error.to_string(),
		},
	}
}

fn order_number(path: Result<Path<u64>, PathRejection>) -> Result<OrderNumber, APIError> {
	let Path(raw) = path.map_err(|e| APIError::BadRequest {
		error_type: "INVALID_ORDER_NUMBER".to_string(),
		message: e.body_text(),
	})?;
	OrderNumber::new(raw).ok_or_else(|| APIError::BadRequest {
		error_type: "INVALID_ORDER_NUMBER".to_string(),
		message: "Order numbers start at 1".to_string(),
	})
}

/// Handles POST /api/orders requests.
async fn handle_new_order(
	State(state): State<AppState>,
	request: Result<Json<NewOrderRequest>, JsonRejection>,
) -> Result<Json<OrderNumberResponse>, APIError> {
	let Json(request) = request.map_err(|e| APIError::BadRequest {
		error_type: "INVALID_REQUEST".to_string(),
		message: e.body_text(),
	})?;

	match state.desk.new_order(request.into()).await {
		Ok(order_number) => Ok(Json(OrderNumberResponse { order_number })),
		Err(e) => {
			tracing::warn!("Order submission failed: {}", e);
			Err(api_error(e))
		},
	}
}

/// Handles POST /api/orders/number requests.
async fn handle_next_number(
	State(state): State<AppState>,
) -> Result<Json<OrderNumberResponse>, APIError> {
	let order_number = state.desk.next_order_number().await.map_err(api_error)?;
	Ok(Json(OrderNumberResponse { order_number }))
}

/// Handles POST /api/orders/pack requests.
///
/// Answers `204 No Content` when nothing is waiting.
async fn handle_order_to_pack(State(state): State<AppState>) -> Result<Response, APIError> {
	match state.desk.get_order_to_pack().await.map_err(api_error)? {
		Some(entry) => Ok(Json(entry).into_response()),
		None => Ok(StatusCode::NO_CONTENT.into_response()),
	}
}

/// Handles POST /api/orders/{number}/packed requests.
async fn handle_packed(
	State(state): State<AppState>,
	number: Result<Path<u64>, PathRejection>,
) -> Result<Json<TransitionResponse>, APIError> {
	let accepted = state
		.desk
		.inform_order_packed(order_number(number)?)
		.await
		.map_err(api_error)?;
	Ok(Json(TransitionResponse { accepted }))
}

/// Handles POST /api/orders/{number}/collected requests.
async fn handle_collected(
	State(state): State<AppState>,
	number: Result<Path<u64>, PathRejection>,
) -> Result<Json<TransitionResponse>, APIError> {
	let accepted = state
		.desk
		.inform_order_collected(order_number(number)?)
		.await
		.map_err(api_error)?;
	Ok(Json(TransitionResponse { accepted }))
}

/// Handles GET /api/orders/state requests.
async fn handle_state(State(state): State<AppState>) -> Result<Json<OrderSnapshot>, APIError> {
	Ok(Json(state.desk.get_order_state().await.map_err(api_error)?))
}

/// Handles GET /api/orders/report requests.
async fn handle_report(State(state): State<AppState>) -> Result<String, APIError> {
	state.desk.generate_order_report().await.map_err(api_error)
}

/// Handles GET /api/orders/collected requests.
async fn handle_collected_orders(
	Query(query): Query<CollectedQuery>,
	State(state): State<AppState>,
) -> Result<Json<Vec<CollectedOrder>>, APIError> {
	match state.desk.collected_orders(query.limit).await {
		Ok(orders) => Ok(Json(orders)),
		Err(e) => {
			tracing::warn!("Collected order lookup failed: {}", e);
			Err(api_error(e))
		},
	}
}
