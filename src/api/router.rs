use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::{require_admin, require_session};
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes: no session required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/calc", post(handlers::bets::calc));

    // Bettor routes: require a session token
    let bettor = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/me", get(handlers::auth::me))
        .route("/api/balance", get(handlers::transactions::balance))
        // Matches
        .route("/api/matches", get(handlers::matches::list))
        .route("/api/matches/:id", get(handlers::matches::detail))
        // Bets
        .route("/api/bets", get(handlers::bets::history).post(handlers::bets::place))
        // Deposits and withdrawals
        .route(
            "/api/transactions",
            get(handlers::transactions::list).post(handlers::transactions::request),
        );

    // Admin routes: require a session belonging to an admin
    let admin = Router::new()
        .route("/api/admin/dashboard", get(handlers::admin::dashboard))
        .route(
            "/api/admin/matches",
            get(handlers::admin::list_matches).post(handlers::admin::create_match),
        )
        .route(
            "/api/admin/matches/:id",
            put(handlers::admin::update_match).delete(handlers::admin::delete_match),
        )
        .route("/api/admin/matches/:id/extras", post(handlers::admin::add_extra))
        .route("/api/admin/extras/:id", delete(handlers::admin::delete_extra))
        .route("/api/admin/bets/:id/settle", post(handlers::admin::settle_bet))
        .route("/api/admin/selections/:id/result", post(handlers::admin::selection_result))
        .route("/api/admin/transactions/:id/approve", post(handlers::admin::approve_transaction))
        .route("/api/admin/transactions/:id/reject", post(handlers::admin::reject_transaction))
        .route("/api/admin/clear-history", post(handlers::admin::clear_history))
        .layer(middleware::from_fn(require_admin));

    let protected = bettor
        .merge(admin)
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    let mut router = public.merge(protected);

    if state.config.cors_allow_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
