use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Represents the user's canonical identity record stored in the `users` table.
/// This is the shape resolved during authentication; the secret columns (`password`,
/// `token`) never leave the repository layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct User {
    // Primary key, assigned by the database on registration.
    pub id: i64,
    // The user's primary identifier. Unique.
    pub email: String,
    pub name: String,
    pub surname: String,
    // The RBAC flag: administrators may moderate ads. Fixed at registration.
    pub is_admin: bool,
}

/// Ad
///
/// Represents a vehicle listing from the `ads` table. This is the primary data
/// structure for the core business logic. `is_moderated` controls public visibility
/// (enforced at the repository layer) and only ever moves from false to true.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default)]
pub struct Ad {
    pub id: i64,
    pub vin: String,
    // Vehicle registration certificate number.
    pub vrc: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub mileage: i32,
    pub engine_capacity: i32,
    pub price: i64,
    pub description: String,
    pub city: String,
    pub phone: String,

    #[schema(value_type = String)]
    pub posted_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,

    // FK to users.id (the submitting author).
    pub author_id: i64,
    pub is_moderated: bool,
}

/// AdFilter
///
/// The enumerated filter consumed by the ads listing query. Both predicates are
/// optional and combine conjunctively (AND) — never OR. An empty filter selects
/// every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdFilter {
    /// Restrict the result to a single ad id.
    pub id: Option<i64>,
    /// When true, only rows with `is_moderated = true` are returned.
    pub only_moderated: bool,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterUserRequest
///
/// Input payload for the public registration endpoint (POST /users/registration).
/// The password is hashed by the user service before it reaches the repository.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub password: String,
    pub is_admin: bool,
}

/// LoginRequest
///
/// Input payload for the login endpoint (POST /users/login).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// CreateAdRequest
///
/// Input payload for submitting a new ad (POST /ads). No field-level semantics
/// (e.g. VIN format) are validated here; the service only decides who may submit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct CreateAdRequest {
    pub vin: String,
    pub vrc: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub mileage: i32,
    pub engine_capacity: i32,
    pub price: i64,
    pub description: String,
    pub city: String,
    pub phone: String,
}

// --- Response Payloads (Output Schemas) ---

/// RegistrationResponse
///
/// Output of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    pub user_id: i64,
    pub message: String,
}

/// TokenResponse
///
/// Output of a successful login: the opaque bearer credential for subsequent requests.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// AdCreatedResponse
///
/// Output of a successful ad submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdCreatedResponse {
    pub message: String,
    pub id: i64,
}

/// MessageResponse
///
/// Generic confirmation payload for operations with no data to return.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
