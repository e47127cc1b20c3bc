use axum::{
	Json, Router,
	extract::{Query, State},
	http::{HeaderValue, StatusCode},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use uasrc_config::Cors;
use uasrc_service::{Error as ServiceError, Params, Row, endpoints};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	let cors = cors_layer(&state.cors);

	Router::new()
		.route("/health", get(health))
		.route(endpoints::CSM_VARIABLES.path, get(csm_variables))
		.route(endpoints::CSM_LOCATIONS.path, get(csm_locations))
		.route(endpoints::CSM_MEASUREMENTS.path, get(csm_measurements))
		.route(endpoints::SCRUTINIZER_VARIABLES.path, get(scrutinizer_variables))
		.route(endpoints::SCRUTINIZER_LOCATIONS.path, get(scrutinizer_locations))
		.route(endpoints::SCRUTINIZER_MEASUREMENTS.path, get(scrutinizer_measurements))
		.layer(cors)
		.with_state(state)
}

fn cors_layer(cors: &Cors) -> CorsLayer {
	let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

	if cors.allows_any() {
		return layer.allow_origin(Any);
	}

	let origins = cors
		.allow_origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(value) => Some(value),
			Err(_) => {
				tracing::warn!(origin = origin.as_str(), "Skipping invalid CORS origin.");

				None
			},
		})
		.collect::<Vec<_>>();

	layer.allow_origin(AllowOrigin::list(origins))
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn csm_variables(State(state): State<AppState>) -> Result<Json<Vec<Row>>, ApiError> {
	let rows = state.service.csm_variables().await?;
	Ok(Json(rows))
}

async fn csm_locations(State(state): State<AppState>) -> Result<Json<Vec<Row>>, ApiError> {
	let rows = state.service.csm_locations().await?;
	Ok(Json(rows))
}

async fn csm_measurements(
	State(state): State<AppState>,
	Query(params): Query<Params>,
) -> Result<Json<Vec<Row>>, ApiError> {
	let rows = state.service.csm_measurements(&params).await?;
	Ok(Json(rows))
}

async fn scrutinizer_variables(State(state): State<AppState>) -> Result<Json<Vec<Row>>, ApiError> {
	let rows = state.service.scrutinizer_variables().await?;
	Ok(Json(rows))
}

async fn scrutinizer_locations(State(state): State<AppState>) -> Result<Json<Vec<Row>>, ApiError> {
	let rows = state.service.scrutinizer_locations().await?;
	Ok(Json(rows))
}

async fn scrutinizer_measurements(
	State(state): State<AppState>,
	Query(params): Query<Params>,
) -> Result<Json<Vec<Row>>, ApiError> {
	let rows = state.service.scrutinizer_measurements(&params).await?;
	Ok(Json(rows))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		tracing::error!(error = %err, "Request failed.");

		match err {
			ServiceError::Storage { message } =>
				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", message),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
