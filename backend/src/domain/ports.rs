//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain expects to reach externally
//! persisted state (principals, revocation entries, items); each trait
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants. Driving ports are the use-case surfaces the
//! inbound adapters call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error as ThisError;

use super::auth::{AuthenticatedSession, LoginSuccess};
use super::claims::{Claims, TokenFingerprint};
use super::error::Error;
use super::items::{Item, ItemId};
use super::outcome::Outcome;
use super::principal::{Email, Principal, PrincipalId};

/// Failures raised by the driven stores.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
    #[error("store query failed: {message}")]
    Query { message: String },
    #[error("email already taken: {email}")]
    DuplicateEmail { email: String },
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::internal(err.to_string())
    }
}

/// Read access to the externally owned principal records.
///
/// Lookups are read-only and row-granular; email uniqueness is
/// case-insensitive (emails are normalized before they reach here).
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, StoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<Principal>, StoreError>;
    /// Insert a new principal, rejecting duplicate emails.
    async fn insert(&self, principal: Principal) -> Result<(), StoreError>;
}

/// Denylist of tokens invalidated before their natural expiry.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Record a revocation. Idempotent: revoking twice has the same
    /// effect as once.
    async fn revoke(
        &self,
        fingerprint: &TokenFingerprint,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn is_revoked(&self, fingerprint: &TokenFingerprint) -> Result<bool, StoreError>;

    /// Drop entries whose tokens have naturally expired. Returns the
    /// number of entries removed. Must never make `is_revoked` report
    /// true for a token that was never revoked.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// Persistence for the example item resource.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn insert(&self, item: Item) -> Result<Item, StoreError>;
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, StoreError>;
    async fn update(&self, item: Item) -> Result<Item, StoreError>;
}

/// Driving port: the authentication use-cases exposed to inbound
/// adapters.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Credential check; success issues a freshly signed token.
    async fn login(&self, payload: Value) -> Outcome<LoginSuccess>;

    /// Run the bearer gate over a raw `Authorization` header value.
    async fn authenticate(&self, header: Option<&str>) -> Outcome<AuthenticatedSession>;

    /// Invalidate the presented token until its natural expiry.
    async fn revoke(&self, claims: &Claims) -> Outcome<()>;
}

/// Driving port: ownership-gated item mutations.
#[async_trait]
pub trait ItemCommand: Send + Sync {
    async fn create(&self, actor: &Principal, payload: Value) -> Outcome<Item>;
    async fn update(&self, actor: &Principal, id: ItemId, payload: Value) -> Outcome<Item>;
}
