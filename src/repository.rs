use crate::models::{Ad, AdFilter, CreateAdRequest, RegisterUserRequest, User};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgPool, Postgres, query_builder::QueryBuilder};
use std::sync::{Arc, Mutex, MutexGuard};

/// StoredCredentials
///
/// The secret columns fetched during login. This shape never crosses the service
/// boundary; only the user id survives into the issued token.
#[derive(Debug, Clone, FromRow)]
pub struct StoredCredentials {
    pub id: i64,
    pub password: String,
}

/// UserRepository
///
/// Defines the abstract contract for user persistence. This is the core of the
/// Repository Abstraction pattern, allowing the services to interact with the data
/// layer without knowing the specific implementation (Postgres, in-memory, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn UserRepository>`) safely shareable across Axum's asynchronous task
/// boundaries. No business rules live here: storage errors propagate unclassified.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user record and returns the persisted identity including the
    /// assigned id. A duplicate email is left to the unique constraint to reject.
    async fn create_user(
        &self,
        req: &RegisterUserRequest,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>;

    /// Fetches the stored credential columns for an email, if the email is known.
    async fn find_credentials(&self, email: &str) -> Result<Option<StoredCredentials>, sqlx::Error>;

    /// Resolves an opaque bearer token to the user it identifies, if any.
    async fn find_by_token(&self, token: &str) -> Result<Option<User>, sqlx::Error>;

    /// Records a freshly issued session token for the user.
    async fn store_token(&self, user_id: i64, token: &str) -> Result<(), sqlx::Error>;
}

/// AdRepository
///
/// The persistence contract for vehicle ads: insert, filtered fetch, and the
/// moderation flag update. Authorization decisions belong to the ad service;
/// this layer only translates operations into SQL.
#[async_trait]
pub trait AdRepository: Send + Sync {
    /// Inserts an ad owned by `author_id` with `is_moderated = false` and both
    /// timestamps stamped at insertion time. Returns the assigned id.
    async fn insert_ad(&self, author_id: i64, ad: &CreateAdRequest) -> Result<i64, sqlx::Error>;

    /// Fetches ads matching the filter. The filter predicates compose
    /// conjunctively; an empty result is a valid empty list.
    async fn fetch_ads(&self, filter: &AdFilter) -> Result<Vec<Ad>, sqlx::Error>;

    /// Unconditionally sets `is_moderated = true` for the ad. Idempotent in
    /// effect; existence is checked by the caller beforehand.
    async fn set_moderated(&self, ad_id: i64) -> Result<(), sqlx::Error>;
}

/// Shared handles used across the application state.
pub type UserRepositoryState = Arc<dyn UserRepository>;
pub type AdRepositoryState = Arc<dyn AdRepository>;

// --- Postgres Implementations ---

const AD_COLUMNS: &str = "id, vin, vrc, license_plate, brand, model, mileage, \
     engine_capacity, price, description, city, phone, posted_at, created_at, \
     author_id, is_moderated";

/// ads_query
///
/// Builds the ads SELECT from the enumerated filter using QueryBuilder for safe
/// parameterization. Each optional predicate is appended only when requested and
/// all predicates are joined with AND, mirroring a dynamic WHERE clause without
/// free-form string concatenation.
fn ads_query(filter: &AdFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM ads", AD_COLUMNS));

    let mut prefix = " WHERE ";

    if let Some(id) = filter.id {
        builder.push(prefix);
        builder.push("id = ");
        builder.push_bind(id);
        prefix = " AND ";
    }

    if filter.only_moderated {
        builder.push(prefix);
        builder.push("is_moderated = TRUE");
    }

    builder.push(" ORDER BY id");
    builder
}

/// PostgresUserRepository
///
/// The concrete implementation of `UserRepository`, backed by the PostgreSQL database.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(
        &self,
        req: &RegisterUserRequest,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, surname, password, is_admin, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, name, surname, is_admin
            "#,
        )
        .bind(&req.email)
        .bind(&req.name)
        .bind(&req.surname)
        .bind(password_hash)
        .bind(req.is_admin)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, sqlx::Error> {
        sqlx::query_as::<_, StoredCredentials>("SELECT id, password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, surname, is_admin FROM users WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    async fn store_token(&self, user_id: i64, token: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET token = $1 WHERE id = $2")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// PostgresAdRepository
///
/// The concrete implementation of `AdRepository`, backed by the PostgreSQL database.
pub struct PostgresAdRepository {
    pool: PgPool,
}

impl PostgresAdRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdRepository for PostgresAdRepository {
    async fn insert_ad(&self, author_id: i64, ad: &CreateAdRequest) -> Result<i64, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO ads (
                vin, vrc, license_plate, brand, model, mileage, engine_capacity,
                price, description, city, phone, posted_at, created_at,
                author_id, is_moderated
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, FALSE
            ) RETURNING id
            "#,
        )
        .bind(&ad.vin)
        .bind(&ad.vrc)
        .bind(&ad.license_plate)
        .bind(&ad.brand)
        .bind(&ad.model)
        .bind(ad.mileage)
        .bind(ad.engine_capacity)
        .bind(ad.price)
        .bind(&ad.description)
        .bind(&ad.city)
        .bind(&ad.phone)
        .bind(now)
        .bind(now)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn fetch_ads(&self, filter: &AdFilter) -> Result<Vec<Ad>, sqlx::Error> {
        ads_query(filter)
            .build_query_as::<Ad>()
            .fetch_all(&self.pool)
            .await
    }

    async fn set_moderated(&self, ad_id: i64) -> Result<(), sqlx::Error> {
        // Unconditional update: re-moderating an already moderated ad is a no-op
        // that still succeeds.
        sqlx::query("UPDATE ads SET is_moderated = TRUE WHERE id = $1")
            .bind(ad_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// --- In-Memory Implementations (For Tests) ---

struct UserRow {
    user: User,
    password: String,
    token: Option<String>,
}

/// InMemoryUserRepository
///
/// An in-memory implementation of `UserRepository` used for unit and integration
/// testing. It reproduces the observable contract of the Postgres implementation —
/// including the unique-email rejection — without requiring a database, isolating
/// the test boundary at the repository trait.
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: Mutex<Vec<UserRow>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<UserRow>> {
        self.inner.lock().expect("user repository mutex poisoned")
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(
        &self,
        req: &RegisterUserRequest,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let mut rows = self.rows();

        // Mirror the unique constraint on users.email.
        if rows.iter().any(|row| row.user.email == req.email) {
            return Err(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint \"users_email_key\"".into(),
            ));
        }

        let user = User {
            id: rows.len() as i64 + 1,
            email: req.email.clone(),
            name: req.name.clone(),
            surname: req.surname.clone(),
            is_admin: req.is_admin,
        };
        rows.push(UserRow {
            user: user.clone(),
            password: password_hash.to_string(),
            token: None,
        });
        Ok(user)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, sqlx::Error> {
        Ok(self.rows().iter().find(|row| row.user.email == email).map(
            |row| StoredCredentials {
                id: row.user.id,
                password: row.password.clone(),
            },
        ))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .rows()
            .iter()
            .find(|row| row.token.as_deref() == Some(token))
            .map(|row| row.user.clone()))
    }

    async fn store_token(&self, user_id: i64, token: &str) -> Result<(), sqlx::Error> {
        if let Some(row) = self.rows().iter_mut().find(|row| row.user.id == user_id) {
            row.token = Some(token.to_string());
        }
        Ok(())
    }
}

/// InMemoryAdRepository
///
/// The in-memory counterpart of `PostgresAdRepository`. Filtering applies the same
/// conjunctive semantics as the SQL query builder.
#[derive(Default)]
pub struct InMemoryAdRepository {
    inner: Mutex<Vec<Ad>>,
}

impl InMemoryAdRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<Ad>> {
        self.inner.lock().expect("ad repository mutex poisoned")
    }
}

#[async_trait]
impl AdRepository for InMemoryAdRepository {
    async fn insert_ad(&self, author_id: i64, ad: &CreateAdRequest) -> Result<i64, sqlx::Error> {
        let mut rows = self.rows();
        let now = Utc::now();
        let id = rows.len() as i64 + 1;
        rows.push(Ad {
            id,
            vin: ad.vin.clone(),
            vrc: ad.vrc.clone(),
            license_plate: ad.license_plate.clone(),
            brand: ad.brand.clone(),
            model: ad.model.clone(),
            mileage: ad.mileage,
            engine_capacity: ad.engine_capacity,
            price: ad.price,
            description: ad.description.clone(),
            city: ad.city.clone(),
            phone: ad.phone.clone(),
            posted_at: now,
            created_at: now,
            author_id,
            is_moderated: false,
        });
        Ok(id)
    }

    async fn fetch_ads(&self, filter: &AdFilter) -> Result<Vec<Ad>, sqlx::Error> {
        Ok(self
            .rows()
            .iter()
            .filter(|ad| filter.id.is_none_or(|id| ad.id == id))
            .filter(|ad| !filter.only_moderated || ad.is_moderated)
            .cloned()
            .collect())
    }

    async fn set_moderated(&self, ad_id: i64) -> Result<(), sqlx::Error> {
        if let Some(ad) = self.rows().iter_mut().find(|ad| ad.id == ad_id) {
            ad.is_moderated = true;
        }
        Ok(())
    }
}
