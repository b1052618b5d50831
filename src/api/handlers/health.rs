use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let db_ok = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();

    let (code, status, database) = if db_ok {
        (StatusCode::OK, "healthy", "connected")
    } else {
        tracing::error!("Health check: database unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "disconnected")
    };

    (
        code,
        Json(HealthStatus {
            status,
            database,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
