use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{
    AdRepositoryState, InMemoryAdRepository, InMemoryUserRepository, PostgresAdRepository,
    PostgresUserRepository, UserRepositoryState,
};
pub use services::{AdService, UserService};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the application.
/// It aggregates all API paths and data schemas that have been decorated with
/// the `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register_user, handlers::login, handlers::get_ads,
        handlers::get_ad, handlers::create_ad, handlers::moderate_ad
    ),
    components(
        schemas(
            models::User, models::Ad, models::RegisterUserRequest, models::LoginRequest,
            models::CreateAdRequest, models::RegistrationResponse, models::TokenResponse,
            models::AdCreatedResponse, models::MessageResponse,
        )
    ),
    tags(
        (name = "auto-board", description = "Vehicle Ads Marketplace API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**. This is the single, thread-safe, and
/// immutable container holding all essential application dependencies, shared
/// across all incoming requests. The repositories are held as trait objects so the
/// Postgres implementations can be swapped for the in-memory ones in tests.
#[derive(Clone)]
pub struct AppState {
    /// User persistence, also consulted by the identity resolver.
    pub users: UserRepositoryState,
    /// Ad persistence.
    pub ads: AdRepositoryState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations let handlers and extractors selectively pull components
// from the shared AppState. The services are stateless facades over an Arc'd
// repository, so constructing one per request is a pointer clone.

impl FromRef<AppState> for UserRepositoryState {
    fn from_ref(app_state: &AppState) -> UserRepositoryState {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for AdRepositoryState {
    fn from_ref(app_state: &AppState) -> AdRepositoryState {
        app_state.ads.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(app_state: &AppState) -> UserService {
        UserService::new(app_state.users.clone())
    }
}

impl FromRef<AppState> for AdService {
    fn from_ref(app_state: &AppState) -> AdService {
        AdService::new(app_state.ads.clone())
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global
/// middleware, and registers the application state.
///
/// Note there is no authentication middleware layer: the `Identity` extractor
/// deliberately resolves a bad credential to `Anonymous` instead of rejecting, and
/// the services decide per operation whether anonymity is acceptable.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: registration, login, moderated reads.
        .merge(public::public_routes())
        // Authenticated routes: ad submission.
        .merge(authenticated::authenticated_routes())
        // Admin routes: moderation.
        .merge(admin::admin_routes())
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: wraps the request/response lifecycle in a
                // tracing span correlated by the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: returns x-request-id to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize the tracing span creation.
/// It extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI, so every log
/// line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
