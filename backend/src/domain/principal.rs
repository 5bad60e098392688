//! Principal identity model.
//!
//! A [`Principal`] is owned by the external user store; the domain only
//! reads it. Emails are normalized (trimmed, lower-cased) at the type
//! boundary so case-insensitive uniqueness holds everywhere by
//! construction.

use std::fmt;
use std::str::FromStr;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::Error;
use super::outcome::Outcome;
use super::validation::email_pattern;

/// Stable principal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PrincipalId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role carried by a principal. The set is closed; `Admin` is granted
/// every operation by the authorization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Canonical lower-case label, as stored and serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(Error::invalid_request(format!("unknown role: {other}"))),
        }
    }
}

/// Normalized email address.
///
/// ## Invariants
/// - Trimmed and lower-cased on construction.
/// - Matches the address shape the validation schemas enforce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Normalize and validate a raw address.
    pub fn parse(raw: &str) -> Outcome<Self> {
        let normalized = raw.trim().to_lowercase();
        if !email_pattern().is_match(&normalized) {
            return Err(Error::invalid_request(format!(
                "not a valid email address: {raw}"
            )));
        }
        Ok(Self(normalized))
    }

    /// Borrow the normalized address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Identity record read from the principal store.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: Email,
    pub name: String,
    pub role: Role,
    pub active: bool,
    /// Argon2id PHC string; never serialized.
    pub password_hash: String,
}

impl Principal {
    /// Whether the principal holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Verify a raw password against the stored PHC hash. Any parse or
    /// verification failure reads as a mismatch.
    pub fn verify_password(&self, raw: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(raw.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

/// Hash a raw password into an Argon2id PHC string.
pub fn hash_password(raw: &str) -> Outcome<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|err| Error::internal(format!("failed to draw salt: {err}")))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| Error::internal(format!("failed to encode salt: {err}")))?;
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|err| Error::internal(format!("failed to hash password: {err}")))?;
    Ok(hash.to_string())
}

/// Response-safe projection of a principal: no active flag, no hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipalSummary {
    pub id: PrincipalId,
    pub email: Email,
    pub name: String,
    pub role: Role,
}

impl From<&Principal> for PrincipalSummary {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id,
            email: principal.email.clone(),
            name: principal.name.clone(),
            role: principal.role,
        }
    }
}
