use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::MainChoice;

/// Database row for matches table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Match {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub home_odd: Decimal,
    pub draw_odd: Decimal,
    pub away_odd: Decimal,
    pub kickoff_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Published odd for an outcome of the main market.
    pub fn odd_for(&self, choice: MainChoice) -> Decimal {
        match choice {
            MainChoice::Home => self.home_odd,
            MainChoice::Draw => self.draw_odd,
            MainChoice::Away => self.away_odd,
        }
    }
}

/// Database row for extras table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExtraMarket {
    pub id: Uuid,
    pub match_id: Uuid,
    pub description: String,
    pub odd: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchWithExtras {
    #[serde(flatten)]
    pub fixture: Match,
    pub extras: Vec<ExtraMarket>,
}
