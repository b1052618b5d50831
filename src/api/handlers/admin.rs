use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiResponse;
use crate::context::RequestContext;
use crate::db::match_repo::MatchUpdate;
use crate::errors::AppError;
use crate::ledger::accounts::{self, ApprovalResult};
use crate::ledger::bets::{self, SettledBet};
use crate::ledger::catalog::{self, NewMatch};
use crate::ledger::{self, ClearedHistory};
use crate::models::{
    BetStatus, BetWithSelections, ExtraMarket, Match, MatchWithExtras, Outcome, Selection,
    Transaction, TransactionWithOwner,
};
use crate::AppState;

#[derive(Serialize)]
pub struct Dashboard {
    pub pending_transactions: Vec<TransactionWithOwner>,
    pub pending_bets: Vec<BetWithSelections>,
    pub settled_bets: Vec<BetWithSelections>,
    pub matches: Vec<MatchWithExtras>,
}

#[derive(Deserialize)]
pub struct UpdateMatchRequest {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_odd: Option<Decimal>,
    pub draw_odd: Option<Decimal>,
    pub away_odd: Option<Decimal>,
    pub kickoff_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl From<UpdateMatchRequest> for MatchUpdate {
    fn from(req: UpdateMatchRequest) -> Self {
        MatchUpdate {
            home_team: req.home_team,
            away_team: req.away_team,
            home_odd: req.home_odd,
            draw_odd: req.draw_odd,
            away_odd: req.away_odd,
            kickoff_at: req.kickoff_at,
            is_active: req.is_active,
        }
    }
}

#[derive(Deserialize)]
pub struct NewExtraRequest {
    pub description: String,
    pub odd: Decimal,
}

#[derive(Deserialize)]
pub struct SettleRequest {
    pub outcome: Outcome,
}

#[derive(Deserialize)]
pub struct SelectionResultRequest {
    pub result: Outcome,
}

#[derive(Serialize)]
pub struct Deleted {
    pub id: Uuid,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ApiResponse<Dashboard>>, AppError> {
    let pending_transactions = accounts::list_pending_transactions(&state.db, &ctx).await?;
    let pending_bets = bets::list_bets_by_status(&state.db, &ctx, &[BetStatus::Pending]).await?;
    let settled_bets =
        bets::list_bets_by_status(&state.db, &ctx, &[BetStatus::Won, BetStatus::Lost]).await?;
    let matches = catalog::list_all_matches(&state.db, &ctx).await?;

    Ok(Json(ApiResponse::ok(Dashboard {
        pending_transactions,
        pending_bets,
        settled_bets,
        matches,
    })))
}

// ---------------------------------------------------------------------------
// Matches and extra markets
// ---------------------------------------------------------------------------

pub async fn list_matches(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ApiResponse<Vec<MatchWithExtras>>>, AppError> {
    let matches = catalog::list_all_matches(&state.db, &ctx).await?;
    Ok(Json(ApiResponse::ok(matches)))
}

pub async fn create_match(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(req): Json<NewMatch>,
) -> Result<(StatusCode, Json<ApiResponse<Match>>), AppError> {
    let fixture = catalog::create_match(&state.db, &ctx, &req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(fixture))))
}

pub async fn update_match(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMatchRequest>,
) -> Result<Json<ApiResponse<Match>>, AppError> {
    let fixture = catalog::update_match(&state.db, &ctx, id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(fixture)))
}

pub async fn delete_match(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    catalog::delete_match(&state.db, &ctx, id).await?;
    Ok(Json(ApiResponse::ok(Deleted { id })))
}

pub async fn add_extra(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(match_id): Path<Uuid>,
    Json(req): Json<NewExtraRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ExtraMarket>>), AppError> {
    let extra = catalog::add_extra(&state.db, &ctx, match_id, &req.description, req.odd).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(extra))))
}

pub async fn delete_extra(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    catalog::delete_extra(&state.db, &ctx, id).await?;
    Ok(Json(ApiResponse::ok(Deleted { id })))
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

pub async fn settle_bet(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<SettleRequest>,
) -> Result<Json<ApiResponse<SettledBet>>, AppError> {
    let settled = bets::settle_bet(&state.db, &ctx, id, req.outcome).await?;
    Ok(Json(ApiResponse::ok(settled)))
}

pub async fn selection_result(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectionResultRequest>,
) -> Result<Json<ApiResponse<Selection>>, AppError> {
    let selection = bets::record_selection_result(&state.db, &ctx, id, req.result).await?;
    Ok(Json(ApiResponse::ok(selection)))
}

// ---------------------------------------------------------------------------
// Deposits and withdrawals
// ---------------------------------------------------------------------------

pub async fn approve_transaction(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ApprovalResult>>, AppError> {
    let result = accounts::approve_transaction(&state.db, &ctx, id).await?;
    Ok(Json(ApiResponse::ok(result)))
}

pub async fn reject_transaction(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Transaction>>, AppError> {
    let transaction = accounts::reject_transaction(&state.db, &ctx, id).await?;
    Ok(Json(ApiResponse::ok(transaction)))
}

pub async fn clear_history(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ApiResponse<ClearedHistory>>, AppError> {
    let cleared = ledger::clear_history(&state.db, &ctx).await?;
    Ok(Json(ApiResponse::ok(cleared)))
}
