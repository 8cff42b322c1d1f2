//! Token-based authentication service and its status gateway.
//!
//! The auth service verifies credentials against a [`store::CredentialStore`],
//! issues HS256 session tokens and guards `/menu` and `/protected` with the
//! [`auth::AuthenticatedUser`] extractor. The gateway relays `/auth/status`.

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod password;
pub mod state;
pub mod store;
pub mod token;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global `tracing` subscriber. `RUST_LOG` overrides the default
/// filter; actix's `log` records are bridged into it.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate=info,gateway=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
