//! Ledger & bet settlement engine.
//!
//! - [`odds`]: combined odds and potential payout.
//! - [`bets`]: bet placement and settlement.
//! - [`accounts`]: balances and the deposit/withdrawal workflow.
//! - [`catalog`]: matches and extra markets offered for betting.

pub mod accounts;
pub mod bets;
pub mod catalog;
pub mod error;
pub mod odds;

pub use error::LedgerError;

use serde::Serialize;
use sqlx::PgPool;

use crate::context::RequestContext;
use crate::db::{bet_repo, transaction_repo};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClearedHistory {
    pub bets: u64,
    pub transactions: u64,
}

/// Wipe every bet and transaction. Users, balances and matches are kept.
pub async fn clear_history(
    pool: &PgPool,
    ctx: &RequestContext,
) -> Result<ClearedHistory, LedgerError> {
    ctx.require_admin()?;

    let mut tx = pool.begin().await?;
    let bets = bet_repo::delete_all_bets(&mut *tx).await?;
    let transactions = transaction_repo::delete_all_transactions(&mut *tx).await?;
    tx.commit().await?;

    tracing::warn!(bets, transactions, admin = %ctx.username, "History cleared");
    Ok(ClearedHistory { bets, transactions })
}
