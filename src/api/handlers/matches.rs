use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use super::ApiResponse;
use crate::errors::AppError;
use crate::ledger::catalog;
use crate::models::MatchWithExtras;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MatchWithExtras>>>, AppError> {
    let matches = catalog::list_active_matches(&state.db).await?;
    Ok(Json(ApiResponse::ok(matches)))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MatchWithExtras>>, AppError> {
    let fixture = catalog::get_active_match(&state.db, id).await?;
    Ok(Json(ApiResponse::ok(fixture)))
}
