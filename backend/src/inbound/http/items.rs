//! Item endpoints: ownership-gated creation and update.
//!
//! ```text
//! POST /api/v1/items       Create an item owned by the caller
//! PUT  /api/v1/items/{id}  Update an item (owner or admin only)
//! ```

use actix_web::{post, put, web, HttpResponse};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ItemId;
use crate::inbound::http::auth::RequestPrincipal;
use crate::inbound::http::error::success_body;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    caller: RequestPrincipal,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let item = state
        .items
        .create(&caller.principal, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(success_body(item)))
}

#[put("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    caller: RequestPrincipal,
    id: web::Path<Uuid>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let item = state
        .items
        .update(
            &caller.principal,
            ItemId::from(id.into_inner()),
            payload.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(success_body(item)))
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
