use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored account. Never mutated after the store is built.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Form body of `POST /login`.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    pub exp: i64,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub menu: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub message: &'static str,
    pub username: String,
}

#[derive(Deserialize)]
pub struct HashQuery {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HashResponse {
    pub password_hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
