use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::User;

/// Insert a new user with a zero balance.
pub async fn create_user<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
    email: Option<&str>,
    password_hash: &str,
    is_admin: bool,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, is_admin)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(executor)
    .await
}

pub async fn get_user<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Look up a user by username or email.
pub async fn find_by_login<'e, E: PgExecutor<'e>>(
    executor: E,
    login: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE username = $1 OR email = $1 ORDER BY username = $1 DESC LIMIT 1",
    )
    .bind(login)
    .fetch_optional(executor)
    .await
}

pub async fn admin_exists<'e, E: PgExecutor<'e>>(executor: E) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE is_admin)")
        .fetch_one(executor)
        .await?;

    Ok(row.0)
}

pub async fn get_balance<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Decimal>, sqlx::Error> {
    let row: Option<(Decimal,)> = sqlx::query_as("SELECT balance FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(|r| r.0))
}

/// Read a balance and hold the row lock until the surrounding transaction ends.
pub async fn lock_balance<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Decimal>, sqlx::Error> {
    let row: Option<(Decimal,)> =
        sqlx::query_as("SELECT balance FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

    Ok(row.map(|r| r.0))
}

pub async fn set_balance<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    balance: Decimal,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET balance = $2 WHERE id = $1")
        .bind(id)
        .bind(balance)
        .execute(executor)
        .await?;

    Ok(())
}
