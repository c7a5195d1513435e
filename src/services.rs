use crate::{
    auth::{self, Identity},
    error::ApiError,
    models::{Ad, AdFilter, CreateAdRequest, LoginRequest, RegisterUserRequest, User},
    repository::{AdRepositoryState, UserRepositoryState},
};

/// UserService
///
/// Business rules for registration and login. Storage is delegated to the injected
/// `UserRepository`; this layer owns credential hashing, token issuance, and the
/// translation of "no matching record" into a typed credentials failure.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepositoryState,
}

impl UserService {
    pub fn new(repo: UserRepositoryState) -> Self {
        Self { repo }
    }

    /// register
    ///
    /// Hashes the candidate's password and inserts the record, returning the
    /// persisted identity including the assigned id. There is deliberately no
    /// uniqueness pre-check here: a duplicate email is rejected by the storage
    /// constraint and propagated as an opaque storage failure.
    pub async fn register(&self, req: RegisterUserRequest) -> Result<User, ApiError> {
        let password_hash = auth::hash_password(&req.password)?;
        let user = self.repo.create_user(&req, &password_hash).await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// login
    ///
    /// Verifies the supplied credentials against the stored hash. Both an unknown
    /// email and a wrong password collapse into the same `InvalidCredentials`
    /// failure, so the response does not reveal which part was wrong. On success a
    /// fresh opaque token is issued and recorded for the user.
    pub async fn login(&self, creds: LoginRequest) -> Result<String, ApiError> {
        let stored = self
            .repo
            .find_credentials(&creds.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !auth::verify_password(&creds.password, &stored.password)? {
            return Err(ApiError::InvalidCredentials);
        }

        let token = auth::generate_token();
        self.repo.store_token(stored.id, &token).await?;
        tracing::debug!(user_id = stored.id, "session token issued");
        Ok(token)
    }
}

/// AdService
///
/// Business rules for submission, listing, and moderation of ads. The caller's
/// resolved `Identity` arrives as an explicit parameter on every operation that
/// needs one; this service decides whether anonymity or a missing admin role is
/// acceptable, and drives the one-way unmoderated -> moderated state machine.
#[derive(Clone)]
pub struct AdService {
    repo: AdRepositoryState,
}

impl AdService {
    pub fn new(repo: AdRepositoryState) -> Self {
        Self { repo }
    }

    /// submit
    ///
    /// Inserts a new ad owned by the authenticated caller. There is no anonymous
    /// submission path: an `Anonymous` identity fails before storage is touched.
    /// The new row starts unmoderated with both timestamps stamped now.
    pub async fn submit(&self, identity: &Identity, ad: CreateAdRequest) -> Result<i64, ApiError> {
        let Identity::Authenticated(user) = identity else {
            return Err(ApiError::AuthenticationRequired);
        };

        let id = self.repo.insert_ad(user.id, &ad).await?;
        tracing::info!(ad_id = id, author_id = user.id, "ad submitted");
        Ok(id)
    }

    /// list
    ///
    /// Returns all ads matching the filter. An empty result is a valid empty
    /// list, not an error.
    pub async fn list(&self, filter: &AdFilter) -> Result<Vec<Ad>, ApiError> {
        Ok(self.repo.fetch_ads(filter).await?)
    }

    /// get
    ///
    /// Returns the single ad with the given id, further constrained to moderated
    /// rows when `only_moderated` is set. No matching row is `ItemNotFound` —
    /// on public read paths an unmoderated ad is indistinguishable from a
    /// missing one.
    pub async fn get(&self, id: i64, only_moderated: bool) -> Result<Ad, ApiError> {
        let filter = AdFilter {
            id: Some(id),
            only_moderated,
        };
        self.repo
            .fetch_ads(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or(ApiError::ItemNotFound)
    }

    /// moderate
    ///
    /// Marks an ad publicly visible. The check order is significant and fixed:
    /// authentication, then the admin role, then existence. A non-admin caller is
    /// therefore told "forbidden" even for an ad that does not exist. The final
    /// update is unconditional, which makes the operation idempotent: moderating
    /// an already moderated ad succeeds silently.
    pub async fn moderate(&self, identity: &Identity, item_id: i64) -> Result<(), ApiError> {
        let Identity::Authenticated(user) = identity else {
            return Err(ApiError::AuthenticationRequired);
        };

        if !user.is_admin {
            return Err(ApiError::InsufficientPrivilege);
        }

        // Existence check with no moderation filter, so re-moderation still
        // resolves the ad.
        let ad = self.get(item_id, false).await?;

        self.repo.set_moderated(ad.id).await?;
        tracing::info!(ad_id = ad.id, admin_id = user.id, "ad moderated");
        Ok(())
    }
}
