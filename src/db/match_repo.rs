use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{ExtraMarket, Match};

/// Fields accepted when an admin edits a match; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct MatchUpdate {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_odd: Option<Decimal>,
    pub draw_odd: Option<Decimal>,
    pub away_odd: Option<Decimal>,
    pub kickoff_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
pub async fn create_match<'e, E: PgExecutor<'e>>(
    executor: E,
    home_team: &str,
    away_team: &str,
    home_odd: Decimal,
    draw_odd: Decimal,
    away_odd: Decimal,
    kickoff_at: Option<DateTime<Utc>>,
) -> Result<Match, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"
        INSERT INTO matches (home_team, away_team, home_odd, draw_odd, away_odd, kickoff_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(home_team)
    .bind(away_team)
    .bind(home_odd)
    .bind(draw_odd)
    .bind(away_odd)
    .bind(kickoff_at)
    .fetch_one(executor)
    .await
}

pub async fn update_match<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    update: &MatchUpdate,
) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"
        UPDATE matches
        SET home_team  = COALESCE($2, home_team),
            away_team  = COALESCE($3, away_team),
            home_odd   = COALESCE($4, home_odd),
            draw_odd   = COALESCE($5, draw_odd),
            away_odd   = COALESCE($6, away_odd),
            kickoff_at = COALESCE($7, kickoff_at),
            is_active  = COALESCE($8, is_active)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(update.home_team.as_deref())
    .bind(update.away_team.as_deref())
    .bind(update.home_odd)
    .bind(update.draw_odd)
    .bind(update.away_odd)
    .bind(update.kickoff_at)
    .bind(update.is_active)
    .fetch_optional(executor)
    .await
}

/// Delete a match; its extras cascade and selections keep their snapshot.
pub async fn delete_match<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_match<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>("SELECT * FROM matches WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list_active_matches<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        "SELECT * FROM matches WHERE is_active ORDER BY kickoff_at ASC NULLS LAST, created_at ASC",
    )
    .fetch_all(executor)
    .await
}

pub async fn list_all_matches<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        "SELECT * FROM matches ORDER BY kickoff_at ASC NULLS LAST, created_at ASC",
    )
    .fetch_all(executor)
    .await
}

// ---------------------------------------------------------------------------
// Extra markets
// ---------------------------------------------------------------------------

pub async fn create_extra<'e, E: PgExecutor<'e>>(
    executor: E,
    match_id: Uuid,
    description: &str,
    odd: Decimal,
) -> Result<ExtraMarket, sqlx::Error> {
    sqlx::query_as::<_, ExtraMarket>(
        r#"
        INSERT INTO extras (match_id, description, odd)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(match_id)
    .bind(description)
    .bind(odd)
    .fetch_one(executor)
    .await
}

pub async fn delete_extra<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM extras WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_extra<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<ExtraMarket>, sqlx::Error> {
    sqlx::query_as::<_, ExtraMarket>("SELECT * FROM extras WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Extras for a batch of matches, ordered by creation within each match.
pub async fn extras_for_matches<'e, E: PgExecutor<'e>>(
    executor: E,
    match_ids: &[Uuid],
) -> Result<Vec<ExtraMarket>, sqlx::Error> {
    sqlx::query_as::<_, ExtraMarket>(
        "SELECT * FROM extras WHERE match_id = ANY($1) ORDER BY match_id, created_at",
    )
    .bind(match_ids)
    .fetch_all(executor)
    .await
}
