use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::context::RequestContext;
use crate::errors::AppError;
use crate::ledger::accounts;
use crate::models::{Transaction, TransactionKind};
use crate::AppState;

#[derive(Deserialize)]
pub struct TransactionRequest {
    pub kind: TransactionKind,
    pub amount: Decimal,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub balance: Decimal,
}

pub async fn request(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Transaction>>), AppError> {
    let transaction = accounts::request_transaction(&state.db, &ctx, req.kind, req.amount).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(transaction))))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ApiResponse<Vec<Transaction>>>, AppError> {
    let transactions = accounts::list_transactions(&state.db, &ctx, ctx.user_id).await?;
    Ok(Json(ApiResponse::ok(transactions)))
}

pub async fn balance(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ApiResponse<BalanceResponse>>, AppError> {
    let balance = accounts::get_balance(&state.db, &ctx, ctx.user_id).await?;
    Ok(Json(ApiResponse::ok(BalanceResponse { balance })))
}
