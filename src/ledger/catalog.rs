//! Match and extra-market catalogue. Bettors only ever see active matches;
//! everything that changes the catalogue is admin-only.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::db::match_repo::{self, MatchUpdate};
use crate::models::{ExtraMarket, Match, MatchWithExtras};

use super::odds::ODDS_DP;
use super::LedgerError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewMatch {
    pub home_team: String,
    pub away_team: String,
    #[serde(default = "default_odd")]
    pub home_odd: Decimal,
    #[serde(default = "default_odd")]
    pub draw_odd: Decimal,
    #[serde(default = "default_odd")]
    pub away_odd: Decimal,
    #[serde(default)]
    pub kickoff_at: Option<DateTime<Utc>>,
}

fn default_odd() -> Decimal {
    Decimal::ONE
}

fn ensure_team(name: &str, side: &str) -> Result<(), LedgerError> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(format!("{side} team name is required")));
    }
    Ok(())
}

/// Published odds are stored as `NUMERIC(12,6)`.
const MAX_ODD: i64 = 1_000_000;

fn ensure_odd(odd: Decimal, what: &str) -> Result<(), LedgerError> {
    if odd <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "{what} odd must be positive, got {odd}"
        )));
    }
    if odd >= Decimal::from(MAX_ODD) || odd.normalize().scale() > ODDS_DP {
        return Err(LedgerError::Validation(format!(
            "{what} odd {odd} must be below {MAX_ODD} with at most {ODDS_DP} decimal places"
        )));
    }
    Ok(())
}

/// Active matches ordered by kickoff, each with its extra markets.
pub async fn list_active_matches(pool: &PgPool) -> Result<Vec<MatchWithExtras>, LedgerError> {
    let matches = match_repo::list_active_matches(pool).await?;
    with_extras(pool, matches).await
}

/// Every match including inactive ones (admin view).
pub async fn list_all_matches(
    pool: &PgPool,
    ctx: &RequestContext,
) -> Result<Vec<MatchWithExtras>, LedgerError> {
    ctx.require_admin()?;
    let matches = match_repo::list_all_matches(pool).await?;
    with_extras(pool, matches).await
}

/// One match as a bettor sees it; inactive matches are reported missing.
pub async fn get_active_match(pool: &PgPool, match_id: Uuid) -> Result<MatchWithExtras, LedgerError> {
    let fixture = match_repo::get_match(pool, match_id)
        .await?
        .filter(|m| m.is_active)
        .ok_or_else(|| LedgerError::NotFound(format!("match {match_id}")))?;

    let mut found = with_extras(pool, vec![fixture]).await?;
    found
        .pop()
        .ok_or_else(|| LedgerError::NotFound(format!("match {match_id}")))
}

pub async fn create_match(
    pool: &PgPool,
    ctx: &RequestContext,
    new: &NewMatch,
) -> Result<Match, LedgerError> {
    ctx.require_admin()?;
    ensure_team(&new.home_team, "home")?;
    ensure_team(&new.away_team, "away")?;
    ensure_odd(new.home_odd, "home")?;
    ensure_odd(new.draw_odd, "draw")?;
    ensure_odd(new.away_odd, "away")?;

    let fixture = match_repo::create_match(
        pool,
        new.home_team.trim(),
        new.away_team.trim(),
        new.home_odd,
        new.draw_odd,
        new.away_odd,
        new.kickoff_at,
    )
    .await?;

    tracing::info!(
        match_id = %fixture.id,
        home = %fixture.home_team,
        away = %fixture.away_team,
        "Match created"
    );
    Ok(fixture)
}

/// Edit a match. Odds changes only affect bets placed afterwards.
pub async fn update_match(
    pool: &PgPool,
    ctx: &RequestContext,
    match_id: Uuid,
    update: &MatchUpdate,
) -> Result<Match, LedgerError> {
    ctx.require_admin()?;
    if let Some(name) = &update.home_team {
        ensure_team(name, "home")?;
    }
    if let Some(name) = &update.away_team {
        ensure_team(name, "away")?;
    }
    for (odd, what) in [
        (update.home_odd, "home"),
        (update.draw_odd, "draw"),
        (update.away_odd, "away"),
    ] {
        if let Some(odd) = odd {
            ensure_odd(odd, what)?;
        }
    }

    let fixture = match_repo::update_match(pool, match_id, update)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("match {match_id}")))?;

    tracing::info!(match_id = %match_id, active = fixture.is_active, "Match updated");
    Ok(fixture)
}

pub async fn delete_match(
    pool: &PgPool,
    ctx: &RequestContext,
    match_id: Uuid,
) -> Result<(), LedgerError> {
    ctx.require_admin()?;
    if !match_repo::delete_match(pool, match_id).await? {
        return Err(LedgerError::NotFound(format!("match {match_id}")));
    }
    tracing::info!(match_id = %match_id, "Match deleted");
    Ok(())
}

pub async fn add_extra(
    pool: &PgPool,
    ctx: &RequestContext,
    match_id: Uuid,
    description: &str,
    odd: Decimal,
) -> Result<ExtraMarket, LedgerError> {
    ctx.require_admin()?;
    if description.trim().is_empty() {
        return Err(LedgerError::Validation("extra market description is required".into()));
    }
    ensure_odd(odd, "extra market")?;

    if match_repo::get_match(pool, match_id).await?.is_none() {
        return Err(LedgerError::NotFound(format!("match {match_id}")));
    }

    let extra = match_repo::create_extra(pool, match_id, description.trim(), odd).await?;
    tracing::info!(match_id = %match_id, extra_id = %extra.id, "Extra market added");
    Ok(extra)
}

pub async fn delete_extra(
    pool: &PgPool,
    ctx: &RequestContext,
    extra_id: Uuid,
) -> Result<(), LedgerError> {
    ctx.require_admin()?;
    if !match_repo::delete_extra(pool, extra_id).await? {
        return Err(LedgerError::NotFound(format!("extra market {extra_id}")));
    }
    tracing::info!(extra_id = %extra_id, "Extra market deleted");
    Ok(())
}

async fn with_extras(
    pool: &PgPool,
    matches: Vec<Match>,
) -> Result<Vec<MatchWithExtras>, LedgerError> {
    let ids: Vec<Uuid> = matches.iter().map(|m| m.id).collect();

    let mut by_match: HashMap<Uuid, Vec<ExtraMarket>> = HashMap::new();
    for extra in match_repo::extras_for_matches(pool, &ids).await? {
        by_match.entry(extra.match_id).or_default().push(extra);
    }

    Ok(matches
        .into_iter()
        .map(|fixture| {
            let extras = by_match.remove(&fixture.id).unwrap_or_default();
            MatchWithExtras { fixture, extras }
        })
        .collect())
}
