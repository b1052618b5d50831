pub mod api;
pub mod config;
pub mod context;
pub mod credentials;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod users;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
