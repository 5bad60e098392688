//! Domain-level error type.
//!
//! Transport agnostic: inbound adapters map [`Error`] onto HTTP status
//! codes and the JSON envelope. Every authentication failure is reduced
//! to the same code and message before it leaves the component that
//! detected it, so responses carry no signal about which check failed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Violation messages keyed by the offending field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// The one message used for every authentication failure: missing,
/// malformed, expired, or revoked tokens, inactive principals, and bad
/// login credentials all read identically to a client.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid credentials";

/// Stable machine-readable code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or missing a required parameter.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// One or more fields failed schema validation.
    Validation,
    /// An unexpected failure inside the domain.
    InternalError,
}

/// Failure payload carried by every [`Outcome`](super::Outcome).
///
/// ## Invariants
/// - Immutable once constructed; combinators build a new value instead
///   of mutating in place.
/// - `field_errors` is only populated for `Validation` failures.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    field_errors: Option<FieldErrors>,
}

impl Error {
    /// Create an error with an explicit code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: None,
        }
    }

    /// Malformed request or missing required parameter (HTTP 400).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Authentication failure (HTTP 401).
    ///
    /// Takes no message on purpose: every caller gets the same generic
    /// text so the endpoint cannot be used as a credential or token
    /// oracle.
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized, UNAUTHORIZED_MESSAGE)
    }

    /// Authorization denial (HTTP 403).
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Missing resource (HTTP 404).
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Schema validation failure carrying every violated field (HTTP 422).
    pub fn validation(field_errors: FieldErrors) -> Self {
        Self {
            code: ErrorCode::Validation,
            message: "Validation failed".to_owned(),
            field_errors: Some(field_errors),
        }
    }

    /// Unexpected failure (HTTP 500). The adapter redacts the message
    /// before it reaches a client.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Field-level violations, present for validation failures.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.field_errors.as_ref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
