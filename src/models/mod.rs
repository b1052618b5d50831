pub mod bet;
pub mod sport_match;
pub mod transaction;
pub mod user;

pub use bet::{Bet, BetWithOwner, BetWithSelections, Selection, SelectionView};
pub use sport_match::{ExtraMarket, Match, MatchWithExtras};
pub use transaction::{Transaction, TransactionWithOwner};
pub use user::User;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// A text column held a value outside its enum.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Read a TEXT column and parse it into a typed enum.
pub(crate) fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: UnknownVariant| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

// ---------------------------------------------------------------------------
// BetStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

impl BetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BetStatus::Pending)
    }
}

impl FromStr for BetStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BetStatus::Pending),
            "won" => Ok(BetStatus::Won),
            "lost" => Ok(BetStatus::Lost),
            other => Err(UnknownVariant {
                kind: "bet status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome an admin can assign to a pending bet or a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
}

impl From<Outcome> for BetStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => BetStatus::Won,
            Outcome::Lost => BetStatus::Lost,
        }
    }
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Main,
    Extra,
}

impl MarketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketKind::Main => "main",
            MarketKind::Extra => "extra",
        }
    }
}

impl FromStr for MarketKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(MarketKind::Main),
            "extra" => Ok(MarketKind::Extra),
            other => Err(UnknownVariant {
                kind: "market kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome picked on a match's main 1X2 market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainChoice {
    #[serde(alias = "A", alias = "1")]
    Home,
    #[serde(alias = "X")]
    Draw,
    #[serde(alias = "B", alias = "2")]
    Away,
}

impl MainChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            MainChoice::Home => "home",
            MainChoice::Draw => "draw",
            MainChoice::Away => "away",
        }
    }
}

impl fmt::Display for MainChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionResult {
    Pending,
    Won,
    Lost,
}

impl SelectionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionResult::Pending => "pending",
            SelectionResult::Won => "won",
            SelectionResult::Lost => "lost",
        }
    }
}

impl From<Outcome> for SelectionResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => SelectionResult::Won,
            Outcome::Lost => SelectionResult::Lost,
        }
    }
}

impl FromStr for SelectionResult {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SelectionResult::Pending),
            "won" => Ok(SelectionResult::Won),
            "lost" => Ok(SelectionResult::Lost),
            other => Err(UnknownVariant {
                kind: "selection result",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            other => Err(UnknownVariant {
                kind: "transaction kind",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "approved" => Ok(TransactionStatus::Approved),
            "rejected" => Ok(TransactionStatus::Rejected),
            other => Err(UnknownVariant {
                kind: "transaction status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
