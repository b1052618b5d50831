//! Account ledger: relative balance mutations and the deposit/withdrawal
//! approval workflow.
//!
//! Every check-and-mutate runs on a connection inside an open transaction and
//! locks the user row first, so concurrent placements, settlements and
//! approvals for the same user serialise on that row.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::db::{transaction_repo, user_repo};
use crate::models::{Transaction, TransactionKind, TransactionStatus, TransactionWithOwner};

use super::odds::{self, CURRENCY_DP};
use super::LedgerError;

/// Result of an admin approving a pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Approval {
    Approved,
    /// Withdrawal exceeded the balance at approval time and was rejected instead.
    AutoRejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalResult {
    pub outcome: Approval,
    pub transaction: Transaction,
    pub balance: Decimal,
}

/// Reject zero, negative, and sub-cent amounts.
pub fn ensure_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "amount must be positive, got {amount}"
        )));
    }
    if amount.normalize().scale() > CURRENCY_DP {
        return Err(LedgerError::Validation(format!(
            "amount {amount} has more than {CURRENCY_DP} decimal places"
        )));
    }
    if amount >= odds::value_ceiling() {
        return Err(LedgerError::Validation(format!("amount {amount} is too large")));
    }
    Ok(())
}

/// Add `amount` to a user's balance. Returns the new balance.
pub async fn credit(
    conn: &mut PgConnection,
    user_id: Uuid,
    amount: Decimal,
) -> Result<Decimal, LedgerError> {
    ensure_amount(amount)?;

    let balance = user_repo::lock_balance(&mut *conn, user_id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("user {user_id}")))?;

    let new_balance = balance + amount;
    if new_balance >= odds::value_ceiling() {
        return Err(LedgerError::Validation(format!(
            "balance of user {user_id} would exceed the maximum of {}",
            odds::value_ceiling()
        )));
    }
    user_repo::set_balance(&mut *conn, user_id, new_balance).await?;

    tracing::debug!(
        user_id = %user_id,
        amount = %amount,
        new_balance = %new_balance,
        "Ledger: credited"
    );
    Ok(new_balance)
}

/// Remove `amount` from a user's balance, refusing to go negative.
/// Returns the new balance.
pub async fn debit(
    conn: &mut PgConnection,
    user_id: Uuid,
    amount: Decimal,
) -> Result<Decimal, LedgerError> {
    ensure_amount(amount)?;

    let balance = user_repo::lock_balance(&mut *conn, user_id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("user {user_id}")))?;

    if amount > balance {
        return Err(LedgerError::InsufficientFunds {
            required: amount,
            available: balance,
        });
    }

    let new_balance = balance - amount;
    user_repo::set_balance(&mut *conn, user_id, new_balance).await?;

    tracing::debug!(
        user_id = %user_id,
        amount = %amount,
        new_balance = %new_balance,
        "Ledger: debited"
    );
    Ok(new_balance)
}

pub async fn get_balance(
    pool: &PgPool,
    ctx: &RequestContext,
    user_id: Uuid,
) -> Result<Decimal, LedgerError> {
    ctx.require_owner_or_admin(user_id)?;

    user_repo::get_balance(pool, user_id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("user {user_id}")))
}

/// Open a pending deposit or withdrawal for the caller. Withdrawals are not
/// checked against the balance here; that happens at approval.
pub async fn request_transaction(
    pool: &PgPool,
    ctx: &RequestContext,
    kind: TransactionKind,
    amount: Decimal,
) -> Result<Transaction, LedgerError> {
    ensure_amount(amount)?;

    let transaction = transaction_repo::insert_transaction(pool, ctx.user_id, kind, amount).await?;

    metrics::counter!("transactions_requested_total", "kind" => kind.as_str()).increment(1);
    tracing::info!(
        transaction_id = %transaction.id,
        user_id = %ctx.user_id,
        kind = %kind,
        amount = %amount,
        "Transaction requested"
    );
    Ok(transaction)
}

pub async fn approve_transaction(
    pool: &PgPool,
    ctx: &RequestContext,
    transaction_id: Uuid,
) -> Result<ApprovalResult, LedgerError> {
    ctx.require_admin()?;

    let mut tx = pool.begin().await?;

    let pending = lock_pending(&mut tx, transaction_id).await?;

    let (outcome, balance) = match pending.kind {
        TransactionKind::Deposit => {
            let balance = credit(&mut tx, pending.user_id, pending.amount).await?;
            (Approval::Approved, balance)
        }
        TransactionKind::Withdrawal => match debit(&mut tx, pending.user_id, pending.amount).await {
            Ok(balance) => (Approval::Approved, balance),
            Err(LedgerError::InsufficientFunds { available, .. }) => {
                (Approval::AutoRejected, available)
            }
            Err(e) => return Err(e),
        },
    };

    let status = match outcome {
        Approval::Approved => TransactionStatus::Approved,
        Approval::AutoRejected => TransactionStatus::Rejected,
    };
    let transaction = transaction_repo::resolve(&mut *tx, transaction_id, status).await?;

    tx.commit().await?;

    metrics::counter!("transactions_resolved_total", "status" => status.as_str()).increment(1);
    match outcome {
        Approval::Approved => tracing::info!(
            transaction_id = %transaction_id,
            user_id = %transaction.user_id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            new_balance = %balance,
            admin = %ctx.username,
            "Transaction approved"
        ),
        Approval::AutoRejected => tracing::warn!(
            transaction_id = %transaction_id,
            user_id = %transaction.user_id,
            amount = %transaction.amount,
            balance = %balance,
            admin = %ctx.username,
            "Withdrawal exceeds balance, auto-rejected"
        ),
    }

    Ok(ApprovalResult {
        outcome,
        transaction,
        balance,
    })
}

pub async fn reject_transaction(
    pool: &PgPool,
    ctx: &RequestContext,
    transaction_id: Uuid,
) -> Result<Transaction, LedgerError> {
    ctx.require_admin()?;

    let mut tx = pool.begin().await?;
    lock_pending(&mut tx, transaction_id).await?;
    let transaction =
        transaction_repo::resolve(&mut *tx, transaction_id, TransactionStatus::Rejected).await?;
    tx.commit().await?;

    metrics::counter!("transactions_resolved_total", "status" => TransactionStatus::Rejected.as_str())
        .increment(1);
    tracing::info!(
        transaction_id = %transaction_id,
        user_id = %transaction.user_id,
        admin = %ctx.username,
        "Transaction rejected"
    );
    Ok(transaction)
}

pub async fn list_transactions(
    pool: &PgPool,
    ctx: &RequestContext,
    user_id: Uuid,
) -> Result<Vec<Transaction>, LedgerError> {
    ctx.require_owner_or_admin(user_id)?;
    Ok(transaction_repo::get_transactions_by_user(pool, user_id).await?)
}

pub async fn list_pending_transactions(
    pool: &PgPool,
    ctx: &RequestContext,
) -> Result<Vec<TransactionWithOwner>, LedgerError> {
    ctx.require_admin()?;
    Ok(transaction_repo::get_pending_with_owner(pool).await?)
}

async fn lock_pending(
    conn: &mut PgConnection,
    transaction_id: Uuid,
) -> Result<Transaction, LedgerError> {
    let transaction = transaction_repo::lock_transaction(&mut *conn, transaction_id)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("transaction {transaction_id}")))?;

    if transaction.status != TransactionStatus::Pending {
        return Err(LedgerError::AlreadyProcessed(transaction_id));
    }
    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn amounts_must_be_positive_cents() {
        assert!(ensure_amount(Decimal::from(50)).is_ok());
        assert!(ensure_amount(Decimal::from_str("0.01").unwrap()).is_ok());
        assert!(ensure_amount(Decimal::from_str("10.500").unwrap()).is_ok());
        assert!(ensure_amount(Decimal::ZERO).is_err());
        assert!(ensure_amount(Decimal::from(-5)).is_err());
        assert!(ensure_amount(Decimal::from_str("1.005").unwrap()).is_err());
    }

    #[test]
    fn amounts_must_fit_the_balance_column() {
        assert!(ensure_amount(Decimal::from_str("999999999999.99").unwrap()).is_ok());
        assert!(matches!(
            ensure_amount(Decimal::from(1_000_000_000_000_i64)),
            Err(LedgerError::Validation(_))
        ));
    }
}
