//! Bearer-token verification.
//!
//! Tokens are issued elsewhere (the login service); this crate only checks the
//! HS256 signature and expiry and reads the claims. Handlers opt in by taking
//! an [`AuthUser`] or [`AdminUser`] argument.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use pharmacy::ApiError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

pub const ADMIN_ROLE: &str = "admin";

/// Claims carried by every access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: u64,
}

impl Claims {
    /// Claims for `user_id` expiring `ttl_secs` from now
    #[must_use]
    pub fn new(user_id: Uuid, email: impl Into<String>, role: impl Into<String>, ttl_secs: u64) -> Self {
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        Self {
            sub: user_id.to_string(),
            email: email.into(),
            role: role.into(),
            exp: now + ttl_secs,
        }
    }
}

/// Signs and verifies HS256 tokens with one shared secret
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// # Errors
    ///
    /// Returns the `jsonwebtoken` error when encoding fails.
    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }

    /// # Errors
    ///
    /// Returns the `jsonwebtoken` error for a bad signature, an expired token
    /// or malformed claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

/// The caller of a route that requires any valid token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// The caller of a route that requires the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(ApiError::unauthorized)?;
        let state = AppState::from_ref(state);

        let claims = state.tokens.verify(token).map_err(|err| {
            tracing::debug!(error = %err, "Rejected bearer token");
            ApiError::unauthorized()
        })?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| {
            tracing::debug!(sub = %claims.sub, "Token subject is not a user id");
            ApiError::unauthorized()
        })?;

        Ok(Self {
            id,
            email: claims.email,
            role: claims.role,
        })
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::forbidden());
        }
        Ok(Self(user))
    }
}
