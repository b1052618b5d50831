//! Bet lifecycle: placement with atomic stake debit, and admin settlement.
//!
//! ```text
//! pending ──settle(won)──▶ won   (potential credited)
//!    └────settle(lost)──▶ lost
//! ```

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::db::bet_repo::{self, NewSelection};
use crate::db::match_repo;
use crate::models::{
    Bet, BetStatus, BetWithSelections, MainChoice, MarketKind, Outcome, Selection, SelectionView,
};

use super::odds::{self, CURRENCY_DP};
use super::{accounts, LedgerError};

/// One leg of a bet as submitted by the bettor.
///
/// `odd` is optional: when present it is the odd the bettor saw (number or
/// numeric string), and the bet is refused if the published odd has changed
/// since.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "market_kind", rename_all = "lowercase")]
pub enum SelectionRequest {
    Main {
        match_id: Uuid,
        choice: MainChoice,
        #[serde(default)]
        odd: Option<Value>,
    },
    Extra {
        match_id: Uuid,
        extra_id: Uuid,
        #[serde(default)]
        odd: Option<Value>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacedBet {
    pub bet_id: Uuid,
    pub combined_odds: Decimal,
    pub potential: Decimal,
    pub balance: Decimal,
    pub bet: Bet,
    pub selections: Vec<SelectionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettledBet {
    pub bet: Bet,
    /// Amount credited to the bettor (zero for a lost bet).
    pub credited: Decimal,
}

fn ensure_stake(stake: Decimal) -> Result<(), LedgerError> {
    if stake <= Decimal::ZERO {
        return Err(LedgerError::InvalidBet(format!(
            "stake must be positive, got {stake}"
        )));
    }
    if stake.normalize().scale() > CURRENCY_DP {
        return Err(LedgerError::InvalidBet(format!(
            "stake {stake} has more than {CURRENCY_DP} decimal places"
        )));
    }
    if stake >= odds::value_ceiling() {
        return Err(LedgerError::InvalidBet(format!("stake {stake} is too large")));
    }
    Ok(())
}

/// Place a single or multiple bet for the caller.
///
/// Odds are read from the published match and extra markets inside the same
/// database transaction that debits the stake and writes the bet, so either
/// everything persists or nothing does.
pub async fn place_bet(
    pool: &PgPool,
    ctx: &RequestContext,
    stake: Decimal,
    selections: &[SelectionRequest],
) -> Result<PlacedBet, LedgerError> {
    ensure_stake(stake)?;
    if selections.is_empty() {
        return Err(LedgerError::InvalidBet("at least one selection is required".into()));
    }

    let mut tx = pool.begin().await?;

    let mut resolved = Vec::with_capacity(selections.len());
    for (index, request) in selections.iter().enumerate() {
        resolved.push(resolve_selection(&mut tx, index, request).await?);
    }

    let odds_list: Vec<Decimal> = resolved.iter().map(|s| s.odd).collect();
    let quote = odds::quote(stake, &odds_list)?;

    let balance = accounts::debit(&mut tx, ctx.user_id, stake).await?;

    let bet = bet_repo::insert_bet(
        &mut *tx,
        ctx.user_id,
        stake,
        quote.combined_odds,
        quote.potential,
    )
    .await?;

    let mut stored = Vec::with_capacity(resolved.len());
    for (position, selection) in resolved.iter().enumerate() {
        let row = bet_repo::insert_selection(&mut *tx, bet.id, position as i32, selection).await?;
        stored.push(SelectionView::from(row));
    }

    tx.commit().await?;

    metrics::counter!("bets_placed_total").increment(1);
    metrics::histogram!("bet_stake").record(stake.to_f64().unwrap_or_default());
    tracing::info!(
        bet_id = %bet.id,
        user_id = %ctx.user_id,
        stake = %stake,
        legs = stored.len(),
        combined_odds = %quote.combined_odds,
        potential = %quote.potential,
        "Bet placed"
    );

    Ok(PlacedBet {
        bet_id: bet.id,
        combined_odds: bet.combined_odds,
        potential: bet.potential,
        balance,
        bet,
        selections: stored,
    })
}

/// Look up the live odd for one leg and snapshot it with the match details.
async fn resolve_selection(
    conn: &mut PgConnection,
    index: usize,
    request: &SelectionRequest,
) -> Result<NewSelection, LedgerError> {
    let (match_id, claimed) = match request {
        SelectionRequest::Main { match_id, odd, .. } => (*match_id, odd.as_ref()),
        SelectionRequest::Extra { match_id, odd, .. } => (*match_id, odd.as_ref()),
    };
    let expected = claimed
        .map(|raw| odds::parse_odd(index, Some(raw)))
        .transpose()?;

    let fixture = match_repo::get_match(&mut *conn, match_id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("match {match_id}")))?;

    if !fixture.is_active {
        return Err(LedgerError::Validation(format!(
            "selection {}: match {} is closed for betting",
            index + 1,
            match_id
        )));
    }

    let (extra_id, market_kind, choice, odd) = match request {
        SelectionRequest::Main { choice, .. } => (
            None,
            MarketKind::Main,
            choice.as_str().to_string(),
            fixture.odd_for(*choice),
        ),
        SelectionRequest::Extra { extra_id, .. } => {
            let extra = match_repo::get_extra(&mut *conn, *extra_id)
                .await?
                .filter(|e| e.match_id == match_id)
                .ok_or_else(|| LedgerError::NotFound(format!("extra market {extra_id}")))?;
            (Some(extra.id), MarketKind::Extra, extra.description, extra.odd)
        }
    };

    odds::ensure_positive_odd(index, odd)?;
    if let Some(expected) = expected {
        if expected != odd {
            return Err(LedgerError::Validation(format!(
                "selection {}: odds changed from {expected} to {odd}",
                index + 1
            )));
        }
    }

    Ok(NewSelection {
        match_id,
        extra_id,
        market_kind,
        choice,
        odd,
        home_team: fixture.home_team,
        away_team: fixture.away_team,
        kickoff_at: fixture.kickoff_at,
    })
}

/// Resolve a pending bet. A won bet credits its potential to the owner.
pub async fn settle_bet(
    pool: &PgPool,
    ctx: &RequestContext,
    bet_id: Uuid,
    outcome: Outcome,
) -> Result<SettledBet, LedgerError> {
    ctx.require_admin()?;

    let mut tx = pool.begin().await?;

    let bet = bet_repo::lock_bet(&mut *tx, bet_id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("bet {bet_id}")))?;

    if bet.status.is_terminal() {
        tracing::warn!(bet_id = %bet_id, status = %bet.status, "Settlement refused: bet already settled");
        return Err(LedgerError::AlreadySettled(bet_id));
    }

    // Sub-unit odds can round a potential down to zero; such a win pays nothing.
    let credited = match outcome {
        Outcome::Won if bet.potential > Decimal::ZERO => {
            accounts::credit(&mut tx, bet.user_id, bet.potential).await?;
            bet.potential
        }
        Outcome::Won | Outcome::Lost => Decimal::ZERO,
    };

    let bet = bet_repo::settle(&mut *tx, bet_id, BetStatus::from(outcome)).await?;

    tx.commit().await?;

    metrics::counter!("bets_settled_total", "outcome" => bet.status.as_str()).increment(1);
    tracing::info!(
        bet_id = %bet_id,
        user_id = %bet.user_id,
        status = %bet.status,
        credited = %credited,
        admin = %ctx.username,
        "Bet settled"
    );

    Ok(SettledBet { bet, credited })
}

/// Record the informational result of one leg. Payout is driven only by the
/// parent bet's status, so balances are never touched here.
pub async fn record_selection_result(
    pool: &PgPool,
    ctx: &RequestContext,
    selection_id: Uuid,
    outcome: Outcome,
) -> Result<Selection, LedgerError> {
    ctx.require_admin()?;

    bet_repo::set_selection_result(pool, selection_id, outcome.into())
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("selection {selection_id}")))
}

/// A user's bets, newest first, each with its legs.
pub async fn list_bet_history(
    pool: &PgPool,
    ctx: &RequestContext,
    user_id: Uuid,
) -> Result<Vec<BetWithSelections>, LedgerError> {
    ctx.require_owner_or_admin(user_id)?;

    let bets = bet_repo::get_bets_by_user(pool, user_id).await?;
    let rows: Vec<(Bet, Option<String>)> = bets.into_iter().map(|b| (b, None)).collect();
    attach_selections(pool, rows).await
}

/// All bets in the given statuses with owner names (admin dashboard).
pub async fn list_bets_by_status(
    pool: &PgPool,
    ctx: &RequestContext,
    statuses: &[BetStatus],
) -> Result<Vec<BetWithSelections>, LedgerError> {
    ctx.require_admin()?;

    let bets = bet_repo::get_bets_by_status(pool, statuses).await?;
    let rows = bets.into_iter().map(|b| (b.bet, Some(b.username))).collect();
    attach_selections(pool, rows).await
}

async fn attach_selections(
    pool: &PgPool,
    bets: Vec<(Bet, Option<String>)>,
) -> Result<Vec<BetWithSelections>, LedgerError> {
    let ids: Vec<Uuid> = bets.iter().map(|(b, _)| b.id).collect();

    let mut by_bet: HashMap<Uuid, Vec<SelectionView>> = HashMap::new();
    for selection in bet_repo::selections_for_bets(pool, &ids).await? {
        by_bet
            .entry(selection.bet_id)
            .or_default()
            .push(SelectionView::from(selection));
    }

    Ok(bets
        .into_iter()
        .map(|(bet, username)| {
            let selections = by_bet.remove(&bet.id).unwrap_or_default();
            BetWithSelections {
                bet,
                username,
                selections,
            }
        })
        .collect())
}
