//! Example orchestrator: ownership-gated item mutations.
//!
//! Demonstrates the standard mutating pipeline shape: validation runs
//! first, authorization second, and only then the port mutation — so a
//! denied or invalid request can never leave a partial write behind.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::authorization::{authorize, Operation};
use super::error::Error;
use super::outcome::{Outcome, Pipeline};
use super::ports::{ItemCommand, ItemStore};
use super::principal::{Principal, PrincipalId};
use super::validation::{Attributes, ITEM_SCHEMA};

/// Stable item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for ItemId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Item resource. Ownership is assigned from the authenticated caller
/// at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: i64,
    pub active: bool,
    pub owner_id: PrincipalId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    fn from_attributes(attrs: &Attributes, owner: PrincipalId, now: DateTime<Utc>) -> Outcome<Self> {
        Ok(Self {
            id: ItemId::random(),
            name: attrs.require_str("name")?.to_owned(),
            description: attrs.string("description"),
            category: attrs.string("category"),
            price: attrs.f64("price"),
            quantity: attrs.i64("quantity").unwrap_or(0),
            active: attrs.bool("active").unwrap_or(true),
            owner_id: owner,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(mut self, attrs: &Attributes, now: DateTime<Utc>) -> Outcome<Self> {
        self.name = attrs.require_str("name")?.to_owned();
        if let Some(description) = attrs.string("description") {
            self.description = Some(description);
        }
        if let Some(category) = attrs.string("category") {
            self.category = Some(category);
        }
        if let Some(price) = attrs.f64("price") {
            self.price = Some(price);
        }
        if let Some(quantity) = attrs.i64("quantity") {
            self.quantity = quantity;
        }
        if let Some(active) = attrs.bool("active") {
            self.active = active;
        }
        self.updated_at = now;
        Ok(self)
    }
}

/// Default [`ItemCommand`] implementation over the item store port.
pub struct ValidatedItemService<S> {
    items: Arc<S>,
}

impl<S> ValidatedItemService<S> {
    pub fn new(items: Arc<S>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl<S> ItemCommand for ValidatedItemService<S>
where
    S: ItemStore,
{
    async fn create(&self, actor: &Principal, payload: Value) -> Outcome<Item> {
        let item = Pipeline::start(payload)
            .then(|raw| ITEM_SCHEMA.validate(&raw))
            .then(|attrs| {
                authorize(actor, Operation::CreateItem, None)?;
                Item::from_attributes(&attrs, actor.id, Utc::now())
            })
            .finish()?;
        Ok(self.items.insert(item).await?)
    }

    async fn update(&self, actor: &Principal, id: ItemId, payload: Value) -> Outcome<Item> {
        let existing = self
            .items
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("Item not found"))?;
        let owner = existing.owner_id;

        let updated = Pipeline::start(payload)
            .then(|raw| ITEM_SCHEMA.validate(&raw))
            .then(|attrs| {
                authorize(actor, Operation::UpdateItem, Some(owner))?;
                existing.apply(&attrs, Utc::now())
            })
            .finish()?;
        Ok(self.items.update(updated).await?)
    }
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
