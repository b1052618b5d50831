use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::{Bet, BetStatus, BetWithOwner, MarketKind, Selection, SelectionResult};

/// Selection values captured at placement time.
#[derive(Debug, Clone)]
pub struct NewSelection {
    pub match_id: Uuid,
    pub extra_id: Option<Uuid>,
    pub market_kind: MarketKind,
    pub choice: String,
    pub odd: Decimal,
    pub home_team: String,
    pub away_team: String,
    pub kickoff_at: Option<DateTime<Utc>>,
}

pub async fn insert_bet<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    stake: Decimal,
    combined_odds: Decimal,
    potential: Decimal,
) -> Result<Bet, sqlx::Error> {
    sqlx::query_as::<_, Bet>(
        r#"
        INSERT INTO bets (user_id, stake, combined_odds, potential, status)
        VALUES ($1, $2, $3, $4, 'pending')
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(stake)
    .bind(combined_odds)
    .bind(potential)
    .fetch_one(executor)
    .await
}

pub async fn insert_selection<'e, E: PgExecutor<'e>>(
    executor: E,
    bet_id: Uuid,
    position: i32,
    selection: &NewSelection,
) -> Result<Selection, sqlx::Error> {
    sqlx::query_as::<_, Selection>(
        r#"
        INSERT INTO bet_selections
            (bet_id, position, match_id, extra_id, market_kind, choice, odd, home_team, away_team, kickoff_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(bet_id)
    .bind(position)
    .bind(selection.match_id)
    .bind(selection.extra_id)
    .bind(selection.market_kind.as_str())
    .bind(&selection.choice)
    .bind(selection.odd)
    .bind(&selection.home_team)
    .bind(&selection.away_team)
    .bind(selection.kickoff_at)
    .fetch_one(executor)
    .await
}

/// Fetch a bet and lock it against concurrent settlement.
pub async fn lock_bet<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Bet>, sqlx::Error> {
    sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Move a bet to a terminal status and stamp the settlement time.
pub async fn settle<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    status: BetStatus,
) -> Result<Bet, sqlx::Error> {
    sqlx::query_as::<_, Bet>(
        "UPDATE bets SET status = $2, settled_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_one(executor)
    .await
}

pub async fn get_bets_by_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<Bet>, sqlx::Error> {
    sqlx::query_as::<_, Bet>(
        "SELECT * FROM bets WHERE user_id = $1 ORDER BY created_at DESC, id",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn get_bets_by_status<'e, E: PgExecutor<'e>>(
    executor: E,
    statuses: &[BetStatus],
) -> Result<Vec<BetWithOwner>, sqlx::Error> {
    let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

    sqlx::query_as::<_, BetWithOwner>(
        r#"
        SELECT b.*, u.username
        FROM bets b
        JOIN users u ON u.id = b.user_id
        WHERE b.status = ANY($1)
        ORDER BY b.created_at DESC, b.id
        "#,
    )
    .bind(statuses)
    .fetch_all(executor)
    .await
}

/// Selections for a batch of bets, in placement order.
pub async fn selections_for_bets<'e, E: PgExecutor<'e>>(
    executor: E,
    bet_ids: &[Uuid],
) -> Result<Vec<Selection>, sqlx::Error> {
    sqlx::query_as::<_, Selection>(
        "SELECT * FROM bet_selections WHERE bet_id = ANY($1) ORDER BY bet_id, position",
    )
    .bind(bet_ids)
    .fetch_all(executor)
    .await
}

pub async fn set_selection_result<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    result: SelectionResult,
) -> Result<Option<Selection>, sqlx::Error> {
    sqlx::query_as::<_, Selection>(
        "UPDATE bet_selections SET result = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(result.as_str())
    .fetch_optional(executor)
    .await
}

/// Remove every bet; selections cascade.
pub async fn delete_all_bets<'e, E: PgExecutor<'e>>(executor: E) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bets").execute(executor).await?;
    Ok(result.rows_affected())
}
