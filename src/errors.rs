use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::ledger::LedgerError;
use crate::users::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Ledger(LedgerError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".into()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".into()),
            AppError::Ledger(e) => {
                let status = match e {
                    LedgerError::Validation(_) | LedgerError::InvalidBet(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    LedgerError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
                    LedgerError::AlreadySettled(_) | LedgerError::AlreadyProcessed(_) => {
                        StatusCode::CONFLICT
                    }
                    LedgerError::Forbidden => StatusCode::FORBIDDEN,
                    LedgerError::Database(err) => {
                        tracing::error!("Database error: {err:?}");
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "Internal server error".into(),
                        );
                    }
                };
                (status, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        metrics::counter!("ledger_errors_total", "kind" => e.kind()).increment(1);
        AppError::Ledger(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => AppError::BadRequest(msg),
            AuthError::InvalidCredentials => AppError::Unauthorized,
            AuthError::Credential(e) => AppError::Internal(e.into()),
            AuthError::Database(e) => AppError::Internal(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn status_of(e: LedgerError) -> StatusCode {
        AppError::Ledger(e).status_and_message().0
    }

    #[test]
    fn ledger_errors_map_to_http_statuses() {
        assert_eq!(status_of(LedgerError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(LedgerError::InvalidBet("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(LedgerError::InsufficientFunds {
                required: Decimal::from(10),
                available: Decimal::from(5),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(LedgerError::NotFound("bet".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(LedgerError::AlreadySettled(Uuid::nil())), StatusCode::CONFLICT);
        assert_eq!(status_of(LedgerError::AlreadyProcessed(Uuid::nil())), StatusCode::CONFLICT);
        assert_eq!(status_of(LedgerError::Forbidden), StatusCode::FORBIDDEN);
    }

    #[test]
    fn database_errors_are_not_leaked() {
        let (status, message) =
            AppError::Ledger(LedgerError::Database(sqlx::Error::RowNotFound)).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }

    #[test]
    fn invalid_credentials_are_unauthorized() {
        let err: AppError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
