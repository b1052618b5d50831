use serde::Serialize;

pub mod admin;
pub mod auth;
pub mod bets;
pub mod health;
pub mod matches;
pub mod metrics;
pub mod transactions;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}
