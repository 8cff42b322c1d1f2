//! HS256 session tokens.
//!
//! A token is a compact JWS (`header.payload.signature`) whose payload is
//! [`Claims`]. Nothing is stored server side: a token is valid exactly when its
//! signature checks out under the service secret, `exp` lies in the future and
//! `sub` is non-empty.

use crate::config::DEFAULT_TOKEN_TTL_MINUTES;
use crate::error::{AuthError, RejectReason, TokenRejected};
use crate::models::Claims;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

const ALGORITHM: Algorithm = Algorithm::HS256;

pub fn default_ttl() -> Duration {
    Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES)
}

#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issues a token for `subject` that expires after the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_for(subject, self.ttl)
    }

    pub fn issue_for(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    /// Same inputs and timestamp always give the same token.
    ///
    /// `exp` is in whole seconds, so the issue time counts as `now` truncated
    /// to the second: the token is valid for `[floor(now), floor(now) + ttl)`
    /// and may expire up to a second before `now + ttl`.
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let exp = now
            .timestamp()
            .checked_add(ttl.num_seconds())
            .ok_or_else(|| AuthError::Internal(format!("token expiry out of range: {ttl}")))?;

        let claims = Claims {
            sub: subject.to_owned(),
            exp,
        };

        tracing::debug!(subject, exp = claims.exp, "issuing token");
        Ok(encode(&Header::new(ALGORITHM), &claims, &self.key)?)
    }
}

#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // expiry is checked against an explicit clock in `validate_at`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenRejected> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenRejected> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                let reason = match err.kind() {
                    ErrorKind::InvalidSignature => RejectReason::BadSignature,
                    ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => {
                        RejectReason::MissingSubject
                    }
                    _ => RejectReason::Malformed,
                };
                tracing::debug!(error = %err, %reason, "token rejected");
                TokenRejected::from(reason)
            })?;

        if claims.exp <= now.timestamp() {
            tracing::debug!(subject = %claims.sub, exp = claims.exp, "token expired");
            return Err(RejectReason::Expired.into());
        }
        if claims.sub.is_empty() {
            tracing::debug!("token has an empty subject");
            return Err(RejectReason::MissingSubject.into());
        }

        Ok(claims)
    }
}
