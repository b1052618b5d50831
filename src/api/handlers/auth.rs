use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::api::auth::SessionToken;
use crate::context::RequestContext;
use crate::errors::AppError;
use crate::models::User;
use crate::users::{self, LoginSession};
use crate::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub login: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoggedOut {
    pub logged_out: bool,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = users::register(&state.db, &req.username, req.email.as_deref(), &req.password).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginSession>>, AppError> {
    let session = users::login(&state.db, &state.config, &req.login, &req.password).await?;
    Ok(Json(ApiResponse::ok(session)))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<Json<ApiResponse<LoggedOut>>, AppError> {
    users::logout(&state.db, &token).await?;
    tracing::info!(user_id = %ctx.user_id, "User logged out");
    Ok(Json(ApiResponse::ok(LoggedOut { logged_out: true })))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = users::current_user(&state.db, &ctx).await?;
    Ok(Json(ApiResponse::ok(user)))
}
