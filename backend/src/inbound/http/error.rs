//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and
//! status codes. Every response body uses the same envelope: successes
//! carry `{"success": true, "data": ...}`, failures carry
//! `{"success": false, "message": ..., "errors": {...}?}`.

use actix_web::{http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::domain::{Error, ErrorCode, FieldErrors};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Wrap a payload in the success envelope.
pub fn success_body(data: impl Serialize) -> serde_json::Value {
    json!({ "success": true, "data": data })
}

/// Success envelope with a human-readable message alongside the data.
pub fn success_message(message: &str, data: impl Serialize) -> serde_json::Value {
    json!({ "success": true, "message": message, "data": data })
}

/// Success envelope carrying only a message, for operations with no
/// payload to return.
pub fn message_body(message: &str) -> serde_json::Value {
    json!({ "success": true, "message": message })
}

/// Failure half of the response envelope.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
}

impl<'a> From<&'a Error> for ErrorBody<'a> {
    fn from(error: &'a Error) -> Self {
        Self {
            success: false,
            message: error.message(),
            errors: error.field_errors(),
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = %self.message(), "internal error reached the HTTP boundary");
        }
        let redacted = redact_if_internal(self);
        HttpResponse::build(self.status_code()).json(ErrorBody::from(&redacted))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Replace Actix's default JSON deserialization failure with the
/// envelope shape, keeping undecodable bodies at 400.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    Error::invalid_request(format!("invalid JSON body: {err}")).into()
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
