use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::{parse_column, BetStatus, MarketKind, SelectionResult};

/// Database row for bets table.
#[derive(Debug, Clone, Serialize)]
pub struct Bet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stake: Decimal,
    pub combined_odds: Decimal,
    pub potential: Decimal,
    pub status: BetStatus,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl<'r> FromRow<'r, PgRow> for Bet {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            stake: row.try_get("stake")?,
            combined_odds: row.try_get("combined_odds")?,
            potential: row.try_get("potential")?,
            status: parse_column(row, "status")?,
            created_at: row.try_get("created_at")?,
            settled_at: row.try_get("settled_at")?,
        })
    }
}

/// Database row for bet_selections table.
///
/// Team names and kickoff are copied from the match when the bet is placed,
/// so later edits to the match never change what a historical bet shows.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub id: Uuid,
    pub bet_id: Uuid,
    pub position: i32,
    pub match_id: Option<Uuid>,
    pub extra_id: Option<Uuid>,
    pub market_kind: MarketKind,
    pub choice: String,
    pub odd: Decimal,
    pub home_team: String,
    pub away_team: String,
    pub kickoff_at: Option<DateTime<Utc>>,
    pub result: SelectionResult,
}

impl Selection {
    /// Human-readable pick: the team backed, "Draw", or the extra market text.
    pub fn label(&self) -> String {
        match (self.market_kind, self.choice.as_str()) {
            (MarketKind::Main, "home") => self.home_team.clone(),
            (MarketKind::Main, "away") => self.away_team.clone(),
            (MarketKind::Main, "draw") => "Draw".to_string(),
            _ => self.choice.clone(),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Selection {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            bet_id: row.try_get("bet_id")?,
            position: row.try_get("position")?,
            match_id: row.try_get("match_id")?,
            extra_id: row.try_get("extra_id")?,
            market_kind: parse_column(row, "market_kind")?,
            choice: row.try_get("choice")?,
            odd: row.try_get("odd")?,
            home_team: row.try_get("home_team")?,
            away_team: row.try_get("away_team")?,
            kickoff_at: row.try_get("kickoff_at")?,
            result: parse_column(row, "result")?,
        })
    }
}

/// Bet joined with the bettor's name (admin views).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BetWithOwner {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub bet: Bet,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    #[serde(flatten)]
    pub selection: Selection,
    pub label: String,
}

impl From<Selection> for SelectionView {
    fn from(selection: Selection) -> Self {
        let label = selection.label();
        Self { selection, label }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BetWithSelections {
    #[serde(flatten)]
    pub bet: Bet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub selections: Vec<SelectionView>,
}
