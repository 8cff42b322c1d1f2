//! Startup configuration for both binaries.
//!
//! Values come from the process environment (after `.env` is loaded by
//! `dotenv`). Both config types are built once and handed to the components
//! that need them; nothing reads the environment afterwards.

use crate::error::ConfigError;
use crate::password::{MAX_COST, MIN_COST};
use chrono::Duration;
use std::fmt;
use std::str::FromStr;

/// Well-known fallback secret, only used with `ALLOW_INSECURE_SECRET=true`.
pub const INSECURE_DEFAULT_SECRET: &str = "your_secret_key";

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Clone)]
pub struct AuthConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_origin: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub users_file: Option<String>,
    pub expose_hash_utility: bool,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let allow_insecure: bool = parse_or(&lookup, "ALLOW_INSECURE_SECRET", false)?;
        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if allow_insecure => {
                tracing::warn!(
                    "JWT_SECRET is not set, signing tokens with the insecure default secret"
                );
                INSECURE_DEFAULT_SECRET.to_string()
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let ttl_minutes: i64 = parse_or(&lookup, "TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        let token_ttl = Duration::try_minutes(ttl_minutes)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| ConfigError::Invalid {
                name: "TOKEN_TTL_MINUTES",
                value: ttl_minutes.to_string(),
            })?;

        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let frontend_origin =
            lookup("FRONTEND_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());
        // CORS with credentials needs one concrete origin, never "*"
        if !(frontend_origin.starts_with("http://") || frontend_origin.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "FRONTEND_ORIGIN",
                value: frontend_origin,
            });
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8001)?,
            jwt_secret,
            frontend_origin,
            token_ttl,
            bcrypt_cost,
            users_file: lookup("USERS_FILE").filter(|s| !s.is_empty()),
            expose_hash_utility: parse_or(&lookup, "EXPOSE_HASH_UTILITY", false)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("frontend_origin", &self.frontend_origin)
            .field("token_ttl_minutes", &self.token_ttl.num_minutes())
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("users_file", &self.users_file)
            .field("expose_hash_utility", &self.expose_hash_utility)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub auth_service_url: String,
    pub timeout: std::time::Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = parse_or(&lookup, "GATEWAY_TIMEOUT_SECS", 5)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "GATEWAY_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
            });
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "GATEWAY_PORT", 8000)?,
            auth_service_url: lookup("AUTH_SERVICE_URL")
                .unwrap_or_else(|| "http://localhost:8001".to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: std::time::Duration::from_secs(timeout_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}
