use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::context::RequestContext;
use crate::errors::AppError;
use crate::users;
use crate::AppState;

/// Raw bearer token of the current request, kept so logout can revoke it.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Session middleware.
///
/// Every request must carry `Authorization: Bearer <token>` for an unexpired
/// session. The resolved [`RequestContext`] is placed in the request
/// extensions for handlers to extract.
pub async fn require_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        return AppError::Unauthorized.into_response();
    };

    match users::authenticate(&state.db, &token).await {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx);
            req.extensions_mut().insert(SessionToken(token));
            next.run(req).await
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Admin gate; must run inside [`require_session`].
pub async fn require_admin(req: Request, next: Next) -> Response {
    match req.extensions().get::<RequestContext>() {
        Some(ctx) if ctx.is_admin => next.run(req).await,
        Some(ctx) => {
            tracing::warn!(user_id = %ctx.user_id, path = %req.uri().path(), "Admin route refused");
            AppError::Forbidden.into_response()
        }
        None => AppError::Unauthorized.into_response(),
    }
}
