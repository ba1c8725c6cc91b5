use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::TokenVerifier;

/// Shared by every handler. Immutable after startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenVerifier>,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_secret: &str) -> Self {
        Self {
            db,
            tokens: Arc::new(TokenVerifier::new(jwt_secret)),
        }
    }
}
