use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{Transaction, TransactionKind, TransactionStatus, TransactionWithOwner};

pub async fn insert_transaction<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    kind: TransactionKind,
    amount: Decimal,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (user_id, kind, amount, status)
        VALUES ($1, $2, $3, 'pending')
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(amount)
    .fetch_one(executor)
    .await
}

/// Fetch a transaction and lock it against concurrent approval.
pub async fn lock_transaction<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn resolve<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    status: TransactionStatus,
) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "UPDATE transactions SET status = $2, resolved_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_one(executor)
    .await
}

pub async fn get_transactions_by_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC, id",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Pending requests awaiting an admin, oldest first.
pub async fn get_pending_with_owner<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<TransactionWithOwner>, sqlx::Error> {
    sqlx::query_as::<_, TransactionWithOwner>(
        r#"
        SELECT t.*, u.username
        FROM transactions t
        JOIN users u ON u.id = t.user_id
        WHERE t.status = 'pending'
        ORDER BY t.created_at ASC, t.id
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn delete_all_transactions<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions").execute(executor).await?;
    Ok(result.rows_affected())
}
