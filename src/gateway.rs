//! Pass-through gateway in front of the auth service.
//!
//! `GET /auth/status` is forwarded to the auth service and its JSON body is
//! relayed unchanged with the upstream status code. There is a single
//! bounded-timeout attempt per request; connection failures and timeouts
//! become `502` rather than being retried or defaulted.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use actix_web::{get, http::StatusCode, web, HttpResponse};
use serde_json::Value;

pub struct StatusClient {
    client: reqwest::Client,
    status_url: String,
}

impl StatusClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            status_url: format!("{}/auth/status", config.auth_service_url),
        })
    }

    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    pub async fn fetch_status(&self) -> Result<(StatusCode, Value), GatewayError> {
        let response = self
            .client
            .get(&self.status_url)
            .send()
            .await
            .map_err(GatewayError::UpstreamUnavailable)?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let body = response.json::<Value>().await.map_err(|err| {
            if err.is_timeout() {
                GatewayError::UpstreamUnavailable(err)
            } else {
                GatewayError::InvalidUpstreamResponse(err)
            }
        })?;

        tracing::debug!(url = %self.status_url, %status, "relayed auth status");
        Ok((status, body))
    }
}

#[get("/auth/status")]
pub async fn auth_status(client: web::Data<StatusClient>) -> Result<HttpResponse, GatewayError> {
    let (status, body) = client.fetch_status().await?;
    Ok(HttpResponse::build(status).json(body))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth_status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorBody;
    use actix_web::{dev::ServerHandle, test, App, HttpServer};
    use serde_json::json;
    use std::time::Duration;

    async fn spawn_downstream() -> (String, ServerHandle) {
        let server = HttpServer::new(|| {
            App::new()
                .service(crate::handlers::auth_status)
                .route(
                    "/down/auth/status",
                    web::get().to(|| async {
                        HttpResponse::ServiceUnavailable().json(json!({"status": "down"}))
                    }),
                )
                .route(
                    "/text/auth/status",
                    web::get().to(|| async { HttpResponse::Ok().body("not json") }),
                )
                .route(
                    "/slow/auth/status",
                    web::get().to(|| async {
                        actix_web::rt::time::sleep(Duration::from_secs(3)).await;
                        HttpResponse::Ok().json(json!({"status": "ok"}))
                    }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        (format!("http://{addr}"), handle)
    }

    fn client_for(base: &str) -> web::Data<StatusClient> {
        let config = GatewayConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            auth_service_url: base.to_string(),
            timeout: Duration::from_secs(1),
        };
        web::Data::new(StatusClient::new(&config).unwrap())
    }

    async fn call_gateway(base: &str) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(client_for(base))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/auth/status").to_request();
        test::call_service(&app, req).await
    }

    #[actix_web::test]
    async fn relays_downstream_json() {
        let (base, handle) = spawn_downstream().await;

        let resp = call_gateway(&base).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"status": "ok", "service": "auth"}));

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn relays_downstream_status_code() {
        let (base, handle) = spawn_downstream().await;

        let resp = call_gateway(&format!("{base}/down")).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"status": "down"}));

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn non_json_body_is_bad_gateway() {
        let (base, handle) = spawn_downstream().await;

        let resp = call_gateway(&format!("{base}/text")).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Auth service returned an invalid response");

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn timeout_is_bad_gateway() {
        let (base, handle) = spawn_downstream().await;

        let resp = call_gateway(&format!("{base}/slow")).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Auth service unavailable");

        handle.stop(false).await;
    }

    #[actix_web::test]
    async fn connection_refused_is_bad_gateway() {
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = closed.local_addr().unwrap();
        drop(closed);

        let resp = call_gateway(&format!("http://{addr}")).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.detail, "Auth service unavailable");
    }

    #[actix_web::test]
    async fn status_url_joins_base() {
        let client = client_for("http://auth:8001");
        assert_eq!(client.status_url(), "http://auth:8001/auth/status");
    }
}
