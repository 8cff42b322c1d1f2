use crate::models::ErrorBody;
use actix_web::{
    error::BlockingError,
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use std::fmt;

/// Why a token was refused. Logged, never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Malformed,
    BadSignature,
    Expired,
    MissingSubject,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Malformed => "malformed",
            RejectReason::BadSignature => "bad_signature",
            RejectReason::Expired => "expired",
            RejectReason::MissingSubject => "missing_subject",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("token rejected: {reason}")]
pub struct TokenRejected {
    pub reason: RejectReason,
}

impl From<RejectReason> for TokenRejected {
    fn from(reason: RejectReason) -> Self {
        Self { reason }
    }
}

/// Failures of the login and protected-resource flows.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    AuthenticationFailed,

    #[error("invalid token ({0})")]
    TokenInvalid(RejectReason),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// The short text placed in the `detail` field of the response.
    pub fn detail(&self) -> &'static str {
        match self {
            AuthError::AuthenticationFailed => "Invalid username or password",
            AuthError::TokenInvalid(_) => "Invalid token",
            AuthError::Signing(_) | AuthError::Hashing(_) | AuthError::Internal(_) => {
                "Internal server error"
            }
        }
    }
}

impl From<TokenRejected> for AuthError {
    fn from(rejected: TokenRejected) -> Self {
        AuthError::TokenInvalid(rejected.reason)
    }
}

impl From<BlockingError> for AuthError {
    fn from(err: BlockingError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AuthenticationFailed | AuthError::TokenInvalid(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Signing(_) | AuthError::Hashing(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let mut builder = HttpResponse::build(status);
        if matches!(self, AuthError::TokenInvalid(_)) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(ErrorBody {
            detail: self.detail().to_string(),
        })
    }
}

/// Failures of the gateway's call to the auth service.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("auth service unavailable: {0}")]
    UpstreamUnavailable(#[source] reqwest::Error),

    #[error("auth service returned an invalid response: {0}")]
    InvalidUpstreamResponse(#[source] reqwest::Error),
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "upstream call failed");
        let detail = match self {
            GatewayError::UpstreamUnavailable(_) => "Auth service unavailable",
            GatewayError::InvalidUpstreamResponse(_) => "Auth service returned an invalid response",
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: detail.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read user file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse user file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate username {0:?}")]
    DuplicateUser(String),
}
