use crate::{AppState, handlers};
use axum::{Router, routing::post};

/// Admin Router Module
///
/// Defines the routes exclusively usable by administrators. The admin role check
/// is performed inside the ad service, after the authentication check and before
/// the existence check — the order is part of the contract (a non-admin is told
/// 403 even for an ad that does not exist).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // POST /ads/{id}/moderate
        // Marks an ad publicly visible. One-way and idempotent: re-moderating an
        // already visible ad succeeds silently.
        .route("/ads/{id}/moderate", post(handlers::moderate_ad))
}
