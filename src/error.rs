use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The closed set of failure kinds a service operation can produce. The first four
/// variants are business-rule outcomes with a fixed HTTP mapping; everything coming
/// out of the persistence layer is carried opaquely in `Storage` and surfaced as a
/// generic server error — the API boundary never tries to guess its cause.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An operation that needs an identity was invoked anonymously.
    #[error("Unauthorized")]
    AuthenticationRequired,

    /// The authenticated user lacks the administrator role required by the operation.
    #[error("Forbidden")]
    InsufficientPrivilege,

    /// The referenced ad does not exist, or is filtered out on a public read path.
    #[error("Item not found")]
    ItemNotFound,

    /// Login found no user matching the supplied credentials.
    #[error("Wrong email or password")]
    InvalidCredentials,

    /// Any underlying persistence failure (constraint violation, connectivity loss).
    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    /// Non-storage internal failures, e.g. a corrupt password hash.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    /// Translates the typed failure into an HTTP response. The match is exhaustive:
    /// adding a variant forces this mapping to be revisited.
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::AuthenticationRequired => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::InsufficientPrivilege => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::ItemNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::InvalidCredentials => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_failures_map_to_client_statuses() {
        assert_eq!(
            ApiError::AuthenticationRequired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InsufficientPrivilege.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::ItemNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_failures_surface_as_generic_server_errors() {
        let err = ApiError::Storage(sqlx::Error::RowNotFound);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
