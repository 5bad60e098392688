//! Bearer-token authentication service.
//!
//! Hosts the login pipeline (validate → find → verify → issue), the
//! per-request authenticate staging the HTTP gate runs (extract →
//! decode → revocation check → principal lookup), and idempotent
//! revocation. Every failure along either path collapses into the one
//! generic unauthorized error; only debug logs keep the distinction.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use super::claims::Claims;
use super::error::Error;
use super::outcome::{Outcome, Pipeline};
use super::ports::{AuthService, PrincipalStore, RevocationStore};
use super::principal::{Email, Principal, PrincipalSummary};
use super::token::TokenCodec;
use super::validation::{Attributes, LOGIN_SCHEMA};

use async_trait::async_trait;

/// Tokens are valid for 24 hours from issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Successful login: the signed token plus a response-safe principal
/// summary. Serializes as `{"token": ..., "user": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSuccess {
    pub token: String,
    #[serde(rename = "user")]
    pub principal: PrincipalSummary,
}

/// Result of a successful bearer gate pass, attached to the request
/// context for downstream steps.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub principal: Principal,
    pub claims: Claims,
}

/// Validated login credentials. The raw password is wiped on drop.
struct Credentials {
    email: Email,
    password: Zeroizing<String>,
}

impl Credentials {
    fn from_attributes(attrs: Attributes) -> Outcome<Self> {
        let email = Email::parse(attrs.require_str("email")?)?;
        let password = Zeroizing::new(
            attrs
                .string("password")
                .ok_or_else(|| Error::internal("validated attribute missing: password"))?,
        );
        Ok(Self { email, password })
    }
}

/// Default [`AuthService`] implementation over the driven ports.
pub struct TokenAuthService<P, R> {
    principals: Arc<P>,
    revocations: Arc<R>,
    codec: Arc<TokenCodec>,
    token_ttl: Duration,
}

impl<P, R> TokenAuthService<P, R> {
    /// Wire the service with the standard 24 hour token ttl.
    pub fn new(principals: Arc<P>, revocations: Arc<R>, codec: Arc<TokenCodec>) -> Self {
        Self::with_ttl(principals, revocations, codec, Duration::hours(TOKEN_TTL_HOURS))
    }

    /// Wire the service with an explicit ttl.
    pub fn with_ttl(
        principals: Arc<P>,
        revocations: Arc<R>,
        codec: Arc<TokenCodec>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            principals,
            revocations,
            codec,
            token_ttl,
        }
    }
}

impl<P, R> TokenAuthService<P, R>
where
    P: PrincipalStore,
    R: RevocationStore,
{
    fn issue(&self, principal: &Principal) -> Outcome<LoginSuccess> {
        let token = self.codec.encode(principal, self.token_ttl)?;
        Ok(LoginSuccess {
            token,
            principal: principal.into(),
        })
    }
}

#[async_trait]
impl<P, R> AuthService for TokenAuthService<P, R>
where
    P: PrincipalStore,
    R: RevocationStore,
{
    async fn login(&self, payload: Value) -> Outcome<LoginSuccess> {
        let credentials = Pipeline::start(payload)
            .then(|raw| LOGIN_SCHEMA.validate(&raw))
            .then(Credentials::from_attributes)
            .finish()?;

        let found = self.principals.find_by_email(&credentials.email).await?;

        Pipeline::start(found)
            .then(|found| verify_credentials(found, &credentials.password))
            .then(|principal| self.issue(&principal))
            .finish()
    }

    async fn authenticate(&self, header: Option<&str>) -> Outcome<AuthenticatedSession> {
        let token = bearer_token(header).ok_or_else(Error::unauthorized)?;
        let claims = self.codec.decode(token)?;

        if self.revocations.is_revoked(&claims.fingerprint()).await? {
            debug!(sub = %claims.sub, "revoked token presented");
            return Err(Error::unauthorized());
        }

        match self.principals.find_by_id(claims.sub).await? {
            Some(principal) if principal.active => Ok(AuthenticatedSession { principal, claims }),
            _ => {
                debug!(sub = %claims.sub, "principal missing or inactive");
                Err(Error::unauthorized())
            }
        }
    }

    async fn revoke(&self, claims: &Claims) -> Outcome<()> {
        // Piggyback the expiry sweep on the only write path.
        let purged = self.revocations.purge_expired(Utc::now()).await?;
        if purged > 0 {
            debug!(purged, "dropped naturally expired revocation entries");
        }
        self.revocations
            .revoke(&claims.fingerprint(), claims.expires_at())
            .await?;
        Ok(())
    }
}

/// One failure shape for unknown email, wrong password, and inactive
/// accounts, so login responses carry no probe signal.
fn verify_credentials(found: Option<Principal>, password: &str) -> Outcome<Principal> {
    match found {
        Some(principal) if principal.active && principal.verify_password(password) => {
            Ok(principal)
        }
        _ => Err(Error::unauthorized()),
    }
}

/// Extract the token from a `Bearer <token>` header value.
fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
