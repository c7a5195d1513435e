use crate::{AppState, handlers};
use axum::{Router, routing::post};

/// Authenticated Router Module
///
/// Defines the routes that require an authenticated caller. The `Identity`
/// extractor resolves the bearer credential on every request; when resolution
/// yields `Anonymous`, the ad service rejects the operation with a typed
/// `AuthenticationRequired` failure, which the API boundary maps to 401.
///
/// Access Control Strategy:
/// There is intentionally no rejecting middleware here. Keeping the gate inside
/// the service means the same rule is enforced no matter how the service is
/// invoked, and the handlers stay free of authorization logic.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // POST /ads
        // Submits a new ad owned by the authenticated user. The new row starts
        // unmoderated and stays invisible on public reads until an admin acts.
        .route("/ads", post(handlers::create_ad))
}
