//! Bearer token signing and verification.
//!
//! One fixed symmetric algorithm (HS256) and one server-held secret.
//! Decoding never panics and never tells the caller *why* a token was
//! rejected: signature mismatch, malformed structure, and expiry all
//! collapse into the same generic unauthorized failure. The specific
//! reason survives only in debug logs.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use super::claims::Claims;
use super::error::Error;
use super::outcome::Outcome;
use super::principal::Principal;

/// Signs and verifies bearer tokens; owns the expiry contract.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec around the server-held secret. The caller is
    /// responsible for failing startup when no secret is configured.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is invalid the second it expires.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a fresh token for the principal with `exp = now + ttl`.
    pub fn encode(&self, principal: &Principal, ttl: Duration) -> Outcome<String> {
        self.encode_at(principal, ttl, Utc::now())
    }

    /// Sign with an explicit issuance instant. Exposed to the crate so
    /// tests can mint backdated tokens.
    pub(crate) fn encode_at(
        &self,
        principal: &Principal,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Outcome<String> {
        let claims = Claims::for_principal(principal, ttl, now);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign token: {err}")))
    }

    /// Verify the signature byte-exactly, reject malformed structure,
    /// and reject expired tokens. All failures look identical to the
    /// caller.
    pub fn decode(&self, token: &str) -> Outcome<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                let reason = DecodeFailure::from(err.kind());
                debug!(?reason, "bearer token rejected");
                Error::unauthorized()
            })
    }
}

/// Internal taxonomy of decode failures, kept for logging only.
#[derive(Debug)]
enum DecodeFailure {
    Expired,
    BadSignature,
    Malformed,
}

impl From<&ErrorKind> for DecodeFailure {
    fn from(kind: &ErrorKind) -> Self {
        match kind {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::BadSignature,
            _ => Self::Malformed,
        }
    }
}
