use actix_web::{middleware, web, App, HttpServer};
use authgate::{
    config::AuthConfig,
    handlers,
    password::PasswordHasher,
    state::AppState,
    store::{CredentialStore, FileStore, InMemoryStore, DEMO_USERNAME},
};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    authgate::init_logging();

    let config = AuthConfig::from_env().map_err(io::Error::other)?;
    tracing::info!(?config, "starting auth service");

    let store: Arc<dyn CredentialStore> = match &config.users_file {
        Some(path) => {
            let store = FileStore::load(path).await.map_err(io::Error::other)?;
            let other_cost = store.users_with_other_cost(config.bcrypt_cost);
            if !other_cost.is_empty() {
                tracing::warn!(
                    bcrypt_cost = config.bcrypt_cost,
                    users = ?other_cost,
                    "stored hashes use a different bcrypt cost; login timing can reveal these usernames"
                );
            }
            Arc::new(store)
        }
        None => {
            tracing::warn!(
                username = DEMO_USERNAME,
                "USERS_FILE is not set, seeding the demo account"
            );
            let hasher = PasswordHasher::new(config.bcrypt_cost);
            Arc::new(InMemoryStore::with_demo_user(&hasher).map_err(io::Error::other)?)
        }
    };

    let state = web::Data::new(AppState::from_config(&config, store).map_err(io::Error::other)?);
    if config.expose_hash_utility {
        tracing::warn!("GET /generate-hash is exposed without authentication");
    }

    let addr = config.bind_addr();
    let frontend_origin = config.frontend_origin.clone();
    let expose_hash_utility = config.expose_hash_utility;

    tracing::info!("Listening on: {}", addr);

    HttpServer::new(move || {
        App::new()
            .wrap(handlers::cors(&frontend_origin))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(|cfg| handlers::configure(cfg, expose_hash_utility))
    })
    .bind(addr)?
    .run()
    .await
}
