use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any client
/// (anonymous or logged-in). These routes handle the identity flow (registration,
/// login) and read-only access to data that has passed moderation.
///
/// Security Mandate:
/// Both ad retrieval handlers in this module must request `only_moderated = true`
/// from the ad service. This prevents anonymous viewing of ads pending review.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load balancer checks.
        // Returns "ok" immediately to verify the service is running and responsive.
        .route("/health", get(|| async { "ok" }))
        // POST /users/registration
        // Endpoint for new user creation. The password is hashed before storage;
        // a duplicate email is rejected by the database constraint.
        .route("/users/registration", post(handlers::register_user))
        // POST /users/login
        // Exchanges credentials for the opaque bearer token used on write endpoints.
        .route("/users/login", post(handlers::login))
        // GET /ads
        // Lists all moderated ads. The moderation filter is unconditional.
        .route("/ads", get(handlers::get_ads))
        // GET /ads/{id}
        // Retrieves the detailed view of a single moderated ad.
        .route("/ads/{id}", get(handlers::get_ad))
}
