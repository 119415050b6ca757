pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::placements::handlers as placements;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Account flow
        .route("/api/v1/users/register", post(accounts::handle_register))
        .route("/api/v1/users/login", post(accounts::handle_login))
        .route("/api/v1/users/logout", post(accounts::handle_logout))
        .route(
            "/api/v1/users/me",
            get(accounts::handle_me).patch(accounts::handle_update_profile),
        )
        // Placement flow
        .route("/api/v1/placements/report", get(placements::handle_report))
        .route(
            "/api/v1/placements/:slot",
            post(placements::handle_attach).get(placements::handle_get_slot),
        )
        .route("/api/v1/students/by-roll", post(placements::handle_by_roll))
        // Identity-card scans and offer letters exceed the 2 MB default cap.
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
