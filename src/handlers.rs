use crate::{
    auth::Identity,
    error::ApiError,
    models::{
        Ad, AdCreatedResponse, AdFilter, CreateAdRequest, LoginRequest, MessageResponse,
        RegisterUserRequest, RegistrationResponse, TokenResponse,
    },
    services::{AdService, UserService},
};
use axum::{
    Json,
    extract::{Path, State},
};

// --- Handlers ---

/// register_user
///
/// [Public Route] Creates a new user account.
///
/// *Note*: A duplicate email surfaces as a generic server error — the storage
/// constraint violation is propagated opaquely, per the error-handling policy.
#[utoipa::path(
    post,
    path = "/users/registration",
    request_body = RegisterUserRequest,
    responses((status = 200, description = "Registered", body = RegistrationResponse))
)]
pub async fn register_user(
    State(service): State<UserService>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let user = service.register(payload).await?;
    Ok(Json(RegistrationResponse {
        user_id: user.id,
        message: "User registered successfully".to_string(),
    }))
}

/// login
///
/// [Public Route] Exchanges an email/password pair for an opaque bearer token.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Wrong email or password")
    )
)]
pub async fn login(
    State(service): State<UserService>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = service.login(payload).await?;
    Ok(Json(TokenResponse { token }))
}

/// get_ads
///
/// [Public Route] Lists all moderated ads.
///
/// *Security*: the moderation filter is applied **unconditionally** here, so ads
/// pending review never leak to anonymous readers.
#[utoipa::path(
    get,
    path = "/ads",
    responses((status = 200, description = "Moderated ads", body = [Ad]))
)]
pub async fn get_ads(State(service): State<AdService>) -> Result<Json<Vec<Ad>>, ApiError> {
    let ads = service
        .list(&AdFilter {
            id: None,
            only_moderated: true,
        })
        .await?;
    Ok(Json(ads))
}

/// get_ad
///
/// [Public Route] Retrieves a single ad by id, only if it has been moderated.
/// An unmoderated ad yields the same 404 as a missing one.
#[utoipa::path(
    get,
    path = "/ads/{id}",
    params(("id" = i64, Path, description = "Ad ID")),
    responses(
        (status = 200, description = "Found", body = Ad),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_ad(
    State(service): State<AdService>,
    Path(id): Path<i64>,
) -> Result<Json<Ad>, ApiError> {
    let ad = service.get(id, true).await?;
    Ok(Json(ad))
}

/// create_ad
///
/// [Authenticated Route] Submits a new ad. The author is taken from the resolved
/// identity, never from the payload; an anonymous caller gets 401 from the
/// service's auth gate rather than from a transport-level rejection.
#[utoipa::path(
    post,
    path = "/ads",
    request_body = CreateAdRequest,
    responses(
        (status = 200, description = "Ad applied", body = AdCreatedResponse),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn create_ad(
    identity: Identity,
    State(service): State<AdService>,
    Json(payload): Json<CreateAdRequest>,
) -> Result<Json<AdCreatedResponse>, ApiError> {
    let id = service.submit(&identity, payload).await?;
    Ok(Json(AdCreatedResponse {
        message: "Ad applied successfully".to_string(),
        id,
    }))
}

/// moderate_ad
///
/// [Admin Route] Marks an ad publicly visible.
///
/// *RBAC*: the service enforces authentication before the admin role before
/// existence, in that order, so the failure statuses are 401, then 403, then 404.
#[utoipa::path(
    post,
    path = "/ads/{id}/moderate",
    params(("id" = i64, Path, description = "Ad ID")),
    responses(
        (status = 200, description = "Moderated", body = MessageResponse),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn moderate_ad(
    identity: Identity,
    State(service): State<AdService>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.moderate(&identity, id).await?;
    Ok(Json(MessageResponse {
        message: "moderation_completed".to_string(),
    }))
}
