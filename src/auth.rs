use crate::error::{AuthError, RejectReason};
use crate::models::{Claims, LoginForm, UserRecord};
use crate::state::AppState;
use actix_web::{dev::Payload, http::header::Header, web, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use std::future::{ready, Ready};

/// Checks a username/password pair against the store.
///
/// Unknown users and wrong passwords fail identically, and both run bcrypt
/// once so response timing does not reveal which usernames exist.
pub fn authenticate(state: &AppState, form: &LoginForm) -> Result<UserRecord, AuthError> {
    match state.store.lookup(&form.username) {
        Some(user) if state.hasher.verify(&form.password, &user.password_hash) => Ok(user),
        Some(_) => {
            tracing::warn!(username = %form.username, "login failed: wrong password");
            Err(AuthError::AuthenticationFailed)
        }
        None => {
            let _ = state.hasher.verify(&form.password, &state.dummy_hash);
            tracing::warn!(username = %form.username, "login failed: unknown user");
            Err(AuthError::AuthenticationFailed)
        }
    }
}

/// Verifies credentials and issues a token for the account.
pub fn login(state: &AppState, form: &LoginForm) -> Result<String, AuthError> {
    let user = authenticate(state, form)?;
    let token = state.issuer.issue(&user.username)?;
    tracing::info!(username = %user.username, "login succeeded");
    Ok(token)
}

/// Claims of a request that carried a valid `Authorization: Bearer` token.
///
/// A missing header, another scheme and a bad token are all rejected with the
/// same `401 Invalid token`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.0.sub
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AuthError::Internal("AppState is not registered".to_string()))?;

    let bearer = Authorization::<Bearer>::parse(req)
        .map_err(|_| {
            tracing::debug!(path = %req.path(), "missing or malformed bearer header");
            AuthError::TokenInvalid(RejectReason::Malformed)
        })?
        .into_scheme();

    let claims = state.validator.validate(bearer.token())?;
    Ok(AuthenticatedUser(claims))
}
