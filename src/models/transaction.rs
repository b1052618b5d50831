use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::{parse_column, TransactionKind, TransactionStatus};

/// Database row for transactions table.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl<'r> FromRow<'r, PgRow> for Transaction {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            kind: parse_column(row, "kind")?,
            amount: row.try_get("amount")?,
            status: parse_column(row, "status")?,
            created_at: row.try_get("created_at")?,
            resolved_at: row.try_get("resolved_at")?,
        })
    }
}

/// Transaction joined with the requesting user's name (admin views).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransactionWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transaction: Transaction,
    pub username: String,
}
