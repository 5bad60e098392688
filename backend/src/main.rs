//! Backend entry-point: wires the HTTP adapter over in-memory stores.

use std::env;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::{TokenAuthService, TokenCodec, ValidatedItemService};
use backend::inbound::http;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::{
    seed_demo_principals, InMemoryItemStore, InMemoryPrincipalStore, InMemoryRevocationStore,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let secret = env::var("AUTH_TOKEN_SECRET").map_err(|_| {
        std::io::Error::other("AUTH_TOKEN_SECRET must be set to a non-empty signing secret")
    })?;
    if secret.is_empty() {
        return Err(std::io::Error::other("AUTH_TOKEN_SECRET must not be empty"));
    }

    let principals = Arc::new(InMemoryPrincipalStore::new());
    if env::var("SEED_DEMO_PRINCIPALS").ok().as_deref() == Some("1") {
        seed_demo_principals(&principals)
            .await
            .map_err(std::io::Error::other)?;
    }

    let auth = Arc::new(TokenAuthService::new(
        Arc::clone(&principals),
        Arc::new(InMemoryRevocationStore::new()),
        Arc::new(TokenCodec::new(secret.as_bytes())),
    ));
    let items = Arc::new(ValidatedItemService::new(Arc::new(InMemoryItemStore::new())));
    let state = HttpState::new(auth, items);

    let bind = env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".into());
    info!(%bind, "starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().error_handler(http::error::json_error_handler))
            .configure(http::configure)
    })
    .bind(bind)?
    .run()
    .await
}
