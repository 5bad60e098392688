//! Signed token payload.
//!
//! A [`Claims`] value is immutable once issued; every successful login
//! produces a fresh pair of claims and token. The revocation
//! fingerprint is derived from the claims alone, so issuance and
//! logout agree on token identity without a stored session table.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::principal::{Principal, PrincipalId, Role};

/// Payload embedded in every bearer token.
///
/// ## Invariants
/// - `exp` is strictly greater than `iat` for any positive ttl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal's id.
    pub sub: PrincipalId,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Issued-at, epoch seconds.
    pub iat: i64,
    /// Expiry, epoch seconds.
    pub exp: i64,
}

impl Claims {
    /// Build claims for a principal, stamping `iat = now` and
    /// `exp = now + ttl`.
    pub(crate) fn for_principal(principal: &Principal, ttl: Duration, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            sub: principal.id,
            email: principal.email.to_string(),
            name: principal.name.clone(),
            role: principal.role,
            iat,
            exp: iat + ttl.num_seconds(),
        }
    }

    /// Deterministic revocation identifier: SHA-256 over the subject id
    /// and issued-at. Two tokens for the same principal issued at
    /// different instants fingerprint differently.
    pub fn fingerprint(&self) -> TokenFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(self.sub.as_uuid().as_bytes());
        hasher.update(self.iat.to_be_bytes());
        TokenFingerprint(hex::encode(hasher.finalize()))
    }

    /// Absolute expiry instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Hex-encoded SHA-256 identifier of a token, used as the revocation
/// store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    /// Borrow the hex digest.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::principal::{hash_password, Email};

    fn fixture_principal() -> Principal {
        Principal {
            id: PrincipalId::random(),
            email: Email::parse("user@example.com").expect("valid email"),
            name: "Test User".to_owned(),
            role: Role::User,
            active: true,
            password_hash: hash_password("password123").expect("hashing succeeds"),
        }
    }

    #[test]
    fn expiry_is_strictly_after_issuance() {
        let claims = Claims::for_principal(&fixture_principal(), Duration::hours(24), Utc::now());
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let now = Utc::now();
        let principal = fixture_principal();
        let a = Claims::for_principal(&principal, Duration::hours(1), now);
        let b = Claims::for_principal(&principal, Duration::hours(1), now);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_differs_across_issuance_instants() {
        let principal = fixture_principal();
        let now = Utc::now();
        let a = Claims::for_principal(&principal, Duration::hours(1), now);
        let b = Claims::for_principal(&principal, Duration::hours(1), now + Duration::seconds(1));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_differs_across_principals() {
        let now = Utc::now();
        let a = Claims::for_principal(&fixture_principal(), Duration::hours(1), now);
        let b = Claims::for_principal(&fixture_principal(), Duration::hours(1), now);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
