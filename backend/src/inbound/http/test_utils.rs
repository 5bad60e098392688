//! Shared fixtures for HTTP adapter tests.

use std::sync::Arc;

use actix_web::{test as actix_test, web, App};
use serde_json::json;

use crate::domain::{TokenAuthService, TokenCodec, ValidatedItemService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    seed_demo_principals, InMemoryItemStore, InMemoryPrincipalStore, InMemoryRevocationStore,
};

pub const TEST_SECRET: &[u8] = b"http-adapter-test-secret";

/// State wired with in-memory adapters and the demo principals
/// (`admin@reportify.com` and `user@reportify.com`, both `password123`).
pub async fn seeded_state() -> HttpState {
    let principals = Arc::new(InMemoryPrincipalStore::new());
    seed_demo_principals(&principals)
        .await
        .expect("seed demo principals");
    let auth = TokenAuthService::new(
        principals,
        Arc::new(InMemoryRevocationStore::new()),
        Arc::new(TokenCodec::new(TEST_SECRET)),
    );
    let items = ValidatedItemService::new(Arc::new(InMemoryItemStore::new()));
    HttpState::new(Arc::new(auth), Arc::new(items))
}

/// App exposing the full route table over the given state.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(crate::inbound::http::error::json_error_handler))
        .configure(crate::inbound::http::configure)
}

/// Log in through the HTTP surface and return the issued token.
pub async fn login_for_token(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> String {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": email, "password": password}))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed");
    let body: serde_json::Value = actix_test::read_body_json(response).await;
    body["data"]["token"]
        .as_str()
        .expect("token in login body")
        .to_owned()
}
