use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("{0} not found")]
    NotFound(String),

    #[error("bet {0} is already settled")]
    AlreadySettled(Uuid),

    #[error("transaction {0} is already processed")]
    AlreadyProcessed(Uuid),

    #[error("invalid bet: {0}")]
    InvalidBet(String),

    #[error("admin privileges required")]
    Forbidden,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl LedgerError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "validation",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
            LedgerError::NotFound(_) => "not_found",
            LedgerError::AlreadySettled(_) => "already_settled",
            LedgerError::AlreadyProcessed(_) => "already_processed",
            LedgerError::InvalidBet(_) => "invalid_bet",
            LedgerError::Forbidden => "forbidden",
            LedgerError::Database(_) => "database",
        }
    }
}
