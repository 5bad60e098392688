//! Authentication endpoints and the bearer-token request gate.
//!
//! ```text
//! POST /api/v1/auth/login   Exchange credentials for a signed token
//! POST /api/v1/auth/logout  Revoke the presented token
//! GET  /api/v1/auth/me      Describe the authenticated principal
//! ```

use actix_web::http::header;
use actix_web::{dev::Payload, get, post, web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use serde_json::Value;

use crate::domain::{Claims, Error, Principal, PrincipalSummary};
use crate::inbound::http::error::{message_body, success_body, success_message};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// The authenticated caller, extracted from the `Authorization` header.
///
/// Using this as a handler parameter makes the endpoint token-gated:
/// extraction runs the full gate (decode, revocation check, principal
/// lookup) and any failure short-circuits the handler with the generic
/// `401` body.
pub struct RequestPrincipal {
    pub principal: Principal,
    pub claims: Claims,
}

impl FromRequest for RequestPrincipal {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state not configured"))?;
            let session = state.auth.authenticate(authorization.as_deref()).await?;
            Ok(Self {
                principal: session.principal,
                claims: session.claims,
            })
        })
    }
}

/// Exchange email and password for a bearer token.
///
/// The token is returned both in the body and echoed as an
/// `Authorization: Bearer <token>` response header.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let outcome = state.auth.login(payload.into_inner()).await?;
    let echoed = format!("Bearer {}", outcome.token);
    Ok(HttpResponse::Ok()
        .insert_header((header::AUTHORIZATION, echoed))
        .json(success_message("Login successful", &outcome)))
}

/// Revoke the presented token. Idempotent: logging out twice with the
/// same token still succeeds, but the token stops passing the gate
/// after the first call.
#[post("/auth/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    caller: RequestPrincipal,
) -> ApiResult<HttpResponse> {
    state.auth.revoke(&caller.claims).await?;
    Ok(HttpResponse::Ok().json(message_body("Logged out successfully")))
}

/// Describe the authenticated principal.
#[get("/auth/me")]
pub async fn me(caller: RequestPrincipal) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(success_body(PrincipalSummary::from(&caller.principal))))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
