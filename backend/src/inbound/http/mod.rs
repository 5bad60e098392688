//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod items;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

/// Register every route the adapter serves.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health).service(
        web::scope("/api/v1")
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me)
            .service(items::create_item)
            .service(items::update_item),
    );
}
