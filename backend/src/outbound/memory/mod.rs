//! In-memory port adapters.
//!
//! Individual operations are independently atomic at row granularity;
//! there is no cross-row transaction, matching the storage contract the
//! core relies on.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::ports::{ItemStore, PrincipalStore, RevocationStore, StoreError};
use crate::domain::principal::{hash_password, Email, Principal, PrincipalId, Role};
use crate::domain::{Item, ItemId, TokenFingerprint};

fn poisoned(what: &str) -> StoreError {
    StoreError::Unavailable {
        message: format!("{what} lock poisoned"),
    }
}

/// Principal records keyed by id.
#[derive(Default)]
pub struct InMemoryPrincipalStore {
    rows: RwLock<HashMap<PrincipalId, Principal>>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipalStore {
    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned("principals"))?;
        Ok(rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Principal>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned("principals"))?;
        Ok(rows.values().find(|row| &row.email == email).cloned())
    }

    async fn insert(&self, principal: Principal) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned("principals"))?;
        // Emails are normalized at the type boundary, so equality here
        // is case-insensitive uniqueness.
        if rows.values().any(|row| row.email == principal.email) {
            return Err(StoreError::DuplicateEmail {
                email: principal.email.to_string(),
            });
        }
        rows.insert(principal.id, principal);
        Ok(())
    }
}

/// Revocation entries: fingerprint → original token expiry.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    rows: RwLock<HashMap<TokenFingerprint, DateTime<Utc>>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(
        &self,
        fingerprint: &TokenFingerprint,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned("revocations"))?;
        // Idempotent: a second revocation of the same token is a no-op.
        rows.entry(fingerprint.clone()).or_insert(expires_at);
        Ok(())
    }

    async fn is_revoked(&self, fingerprint: &TokenFingerprint) -> Result<bool, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned("revocations"))?;
        Ok(rows.contains_key(fingerprint))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned("revocations"))?;
        let before = rows.len();
        rows.retain(|_, expires_at| *expires_at > now);
        Ok(before - rows.len())
    }
}

/// Item rows keyed by id.
#[derive(Default)]
pub struct InMemoryItemStore {
    rows: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn insert(&self, item: Item) -> Result<Item, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned("items"))?;
        rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned("items"))?;
        Ok(rows.get(&id).cloned())
    }

    async fn update(&self, item: Item) -> Result<Item, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned("items"))?;
        if !rows.contains_key(&item.id) {
            return Err(StoreError::Query {
                message: format!("no item with id {}", item.id),
            });
        }
        rows.insert(item.id, item.clone());
        Ok(item)
    }
}

/// Seed a demo admin and regular user, skipping any email already
/// present so repeated startups stay idempotent.
pub async fn seed_demo_principals(store: &InMemoryPrincipalStore) -> Result<(), StoreError> {
    let demo = [
        ("Admin User", "admin@reportify.com", Role::Admin),
        ("Regular User", "user@reportify.com", Role::User),
    ];
    for (name, email, role) in demo {
        let email = Email::parse(email).map_err(|err| StoreError::Query {
            message: format!("demo email rejected: {err}"),
        })?;
        if store.find_by_email(&email).await?.is_some() {
            continue;
        }
        let password_hash = hash_password("password123").map_err(|err| StoreError::Query {
            message: format!("demo password hash failed: {err}"),
        })?;
        let principal = Principal {
            id: PrincipalId::random(),
            email,
            name: name.to_owned(),
            role,
            active: true,
            password_hash,
        };
        info!(email = %principal.email, role = %principal.role, "seeded demo principal");
        store.insert(principal).await?;
    }
    Ok(())
}
