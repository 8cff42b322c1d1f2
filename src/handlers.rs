use crate::auth::{self, AuthenticatedUser};
use crate::error::AuthError;
use crate::models::{
    HashQuery, HashResponse, LoginForm, MenuResponse, ProtectedResponse, StatusResponse,
    TokenResponse,
};
use crate::state::AppState;
use actix_cors::Cors;
use actix_web::{get, post, web, HttpResponse, Responder};

#[post("/login")]
pub async fn login(
    data: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AuthError> {
    let form = form.into_inner();
    // bcrypt is deliberately slow; keep it off the worker thread
    let token = web::block(move || auth::login(&data, &form)).await??;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

#[get("/menu")]
pub async fn menu(_user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(MenuResponse {
        menu: "Welcome to your protected menu, authenticated user!",
    })
}

#[get("/protected")]
pub async fn protected(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(ProtectedResponse {
        message: "Access granted!",
        username: user.0.sub,
    })
}

/// Development helper that hashes an arbitrary password. Only mounted when
/// `EXPOSE_HASH_UTILITY=true`.
#[get("/generate-hash")]
pub async fn generate_hash(
    data: web::Data<AppState>,
    query: web::Query<HashQuery>,
) -> Result<HttpResponse, AuthError> {
    let HashQuery { password } = query.into_inner();
    let password_hash = web::block(move || data.hasher.hash(&password)).await??;
    Ok(HttpResponse::Ok().json(HashResponse { password_hash }))
}

#[get("/auth/status")]
pub async fn auth_status() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        status: "ok".to_string(),
        service: "auth".to_string(),
    })
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Cross-origin policy for the frontend: one origin, with credentials, any
/// method and any header.
pub fn cors(frontend_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_origin)
        .supports_credentials()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

/// Registers the auth service routes.
pub fn configure(cfg: &mut web::ServiceConfig, expose_hash_utility: bool) {
    cfg.service(login)
        .service(menu)
        .service(protected)
        .service(auth_status)
        .service(health);
    if expose_hash_utility {
        cfg.service(generate_hash);
    }
}
