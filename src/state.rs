use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::PasswordHasher;
use crate::store::CredentialStore;
use crate::token::{TokenIssuer, TokenValidator};
use std::sync::Arc;

/// Everything a request handler needs, built once at startup and shared
/// read-only between workers through `web::Data`.
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub hasher: PasswordHasher,
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
    /// Verified against when the username is unknown so both login failures
    /// cost one bcrypt run.
    pub(crate) dummy_hash: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
        validator: TokenValidator,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash("dummy password for unknown users")?;
        Ok(Self {
            store,
            hasher,
            issuer,
            validator,
            dummy_hash,
        })
    }

    pub fn from_config(
        config: &AuthConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, AuthError> {
        let secret = config.jwt_secret.as_bytes();
        Self::new(
            store,
            PasswordHasher::new(config.bcrypt_cost),
            TokenIssuer::new(secret, config.token_ttl),
            TokenValidator::new(secret),
        )
    }
}
