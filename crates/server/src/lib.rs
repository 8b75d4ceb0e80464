//! Realtor Backend Server
//!
//! Wires configuration, storage, and the authentication surface into a
//! single actix-web server.
//!
//! ## Submodules
//!
//! - [`config`] — Command line and environment configuration
mod config;

pub use config::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::middleware::from_fn;
use actix_web::web;
use rlt_auth::Manager;
use rlt_auth::Member;
use rlt_auth::Members;
use rlt_auth::Session;
use rlt_auth::Sessions;
use rlt_auth::authenticate;
use std::sync::Arc;
use tokio_postgres::Client;

async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

/// Credentialed CORS for exactly one trusted origin.
fn cors(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .supports_credentials()
}

/// Authentication routes over any store `R`. Expects `web::Data<R>`,
/// `web::Data<Manager>` and `web::Data<Hasher>` on the app.
#[rustfmt::skip]
pub fn routes<R: Members + Sessions + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(rlt_auth::register::<R>))
            .route("/login",    web::post().to(rlt_auth::login::<R>))
            .route("/token",    web::post().to(rlt_auth::token::<R>))
            .route("/refresh",  web::get().to(rlt_auth::refresh::<R>))
            .route("/refresh",  web::post().to(rlt_auth::exchange::<R>))
            .route("/logout",   web::delete().to(rlt_auth::logout))
            .route("/me",       web::get().to(rlt_auth::me)),
    );
}

#[rustfmt::skip]
pub async fn run(config: Config) -> anyhow::Result<()> {
    let client = rlt_pg::db(&config.db_url).await?;
    rlt_pg::migrate::<Member>(&client).await?;
    rlt_pg::migrate::<Session>(&client).await?;
    let tokens = web::Data::new(Manager::new(config.jwt_access_secret.as_bytes(), config.settings()));
    let hasher = web::Data::new(config.hasher()?);
    let client = web::Data::new(client);
    let origin = config.trusted_origin.clone();
    log::info!("starting server on {} ({:?})", config.bind, config.environment);
    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(authenticate::<Arc<Client>, _>))
            .wrap(cors(&origin))
            .wrap(Logger::new("%r %s %Ts"))
            .app_data(rlt_auth::json_config())
            .app_data(tokens.clone())
            .app_data(hasher.clone())
            .app_data(client.clone())
            .route("/health", web::get().to(health))
            .configure(routes::<Arc<Client>>)
    })
    .workers(config.workers)
    .client_request_timeout(config.read_timeout)
    .client_disconnect_timeout(config.write_timeout)
    .keep_alive(config.idle_timeout)
    .bind(&config.bind)?
    .run()
    .await?;
    Ok(())
}
