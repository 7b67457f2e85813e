use axum::{
    Router,
    routing::{get, post},
    extract::{State, Json, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::core::PointsEngine;
use crate::error::Error;
use crate::settlement::balance_book::PayerPoints;
use crate::types::{Payer, Points, Timestamp};

pub struct ApiState {
    pub engine: PointsEngine,
}

type ApiError = (StatusCode, String);

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/transactions/add", post(add_transaction))
        .route("/points/spend", post(spend_points))
        .route("/points/list", get(list_payer_balances))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
pub struct AddTransactionRequest {
    pub payer: Payer,
    pub points: Points,
    // Defaults to arrival time when omitted
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct AddTransactionResponse {
    pub point_balance: Points,
}

#[derive(Debug, Deserialize)]
pub struct SpendPointsRequest {
    pub points: Points,
}

#[derive(Debug, Serialize)]
pub struct ListPayerBalancesResponse {
    pub payer_balances: Vec<PayerPoints>,
}

/// Client mistakes map to 422, ledger faults to 500.
fn ledger_error(e: Error) -> ApiError {
    let status = if e.is_rejection() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, e.to_string())
}

fn bad_request(rejection: JsonRejection) -> ApiError {
    (StatusCode::BAD_REQUEST, rejection.body_text())
}

async fn add_transaction(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<AddTransactionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddTransactionResponse>), ApiError> {
    let Json(req) = payload.map_err(bad_request)?;
    let timestamp = req.timestamp.unwrap_or_else(Timestamp::now);

    let point_balance = state.engine
        .add_record(req.payer, req.points, timestamp)
        .await
        .map_err(ledger_error)?;

    Ok((StatusCode::CREATED, Json(AddTransactionResponse { point_balance })))
}

async fn spend_points(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<SpendPointsRequest>, JsonRejection>,
) -> Result<Json<Vec<PayerPoints>>, ApiError> {
    let Json(req) = payload.map_err(bad_request)?;

    let debits = state.engine
        .spend_points(req.points)
        .await
        .map_err(ledger_error)?;

    Ok(Json(debits))
}

async fn list_payer_balances(
    State(state): State<Arc<ApiState>>,
) -> Json<ListPayerBalancesResponse> {
    Json(ListPayerBalancesResponse {
        payer_balances: state.engine.list_balances().await,
    })
}

async fn metrics() -> Result<String, ApiError> {
    crate::observability::metrics::gather_text().map_err(ledger_error)
}
