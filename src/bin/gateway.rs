use actix_web::{middleware, web, App, HttpServer};
use authgate::{config::GatewayConfig, gateway};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    authgate::init_logging();

    let config = GatewayConfig::from_env().map_err(io::Error::other)?;
    let client = web::Data::new(gateway::StatusClient::new(&config).map_err(io::Error::other)?);

    let addr = config.bind_addr();
    tracing::info!(
        upstream = %client.status_url(),
        timeout_secs = config.timeout.as_secs(),
        "Listening on: {}",
        addr
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(client.clone())
            .configure(gateway::configure)
    })
    .bind(addr)?
    .run()
    .await
}
