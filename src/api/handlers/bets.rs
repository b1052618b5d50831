use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::ApiResponse;
use crate::context::RequestContext;
use crate::errors::AppError;
use crate::ledger::bets::{self, PlacedBet, SelectionRequest};
use crate::ledger::odds::{self, Quote};
use crate::models::BetWithSelections;
use crate::AppState;

#[derive(Deserialize)]
pub struct PlaceBetRequest {
    pub stake: Decimal,
    pub selections: Vec<SelectionRequest>,
}

/// Calculator input is kept loose so malformed odds can be reported per
/// selection instead of failing the whole body.
#[derive(Deserialize)]
pub struct CalcRequest {
    #[serde(default)]
    pub stake: Option<Value>,
    #[serde(default)]
    pub selections: Vec<Value>,
}

pub async fn place(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<PlaceBetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlacedBet>>), AppError> {
    let placed = bets::place_bet(&state.db, &ctx, req.stake, &req.selections).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(placed))))
}

pub async fn history(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ApiResponse<Vec<BetWithSelections>>>, AppError> {
    let history = bets::list_bet_history(&state.db, &ctx, ctx.user_id).await?;
    Ok(Json(ApiResponse::ok(history)))
}

pub async fn calc(Json(req): Json<CalcRequest>) -> Result<Json<ApiResponse<Quote>>, AppError> {
    let stake = match &req.stake {
        None | Some(Value::Null) => Decimal::ZERO,
        Some(raw) => odds::decimal_from_json(raw)
            .filter(|s| *s >= Decimal::ZERO)
            .ok_or_else(|| AppError::BadRequest("stake must be a non-negative number".into()))?,
    };

    let odds_list = req
        .selections
        .iter()
        .enumerate()
        .map(|(index, selection)| odds::parse_odd(index, selection.get("odd")))
        .collect::<Result<Vec<_>, _>>()?;

    let quote = odds::quote(stake, &odds_list)?;
    Ok(Json(ApiResponse::ok(quote)))
}
