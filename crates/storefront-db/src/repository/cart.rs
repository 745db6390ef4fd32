//! # Cart Repository
//!
//! Stores the cart as a versioned JSON envelope under one key.
//!
//! ## Envelope
//! ```text
//! {
//!   "version": 1,
//!   "savedAt": "2026-10-17T09:30:00Z",
//!   "items": [
//!     { "id": "prod-001", "name": "...", "priceCents": 4999, ...,
//!       "quantity": 2, "selectedColor": "blue", "selectedSize": "S" }
//!   ]
//! }
//! ```
//!
//! Items are flat product snapshots; the catalog is never consulted on load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use storefront_core::{Cart, CartItem};

use super::kv::KvRepository;
use crate::error::{DbError, DbResult};

/// Envelope version written by this build.
pub const CART_FORMAT_VERSION: u32 = 1;

/// The persisted form of a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
}

impl PersistedCart {
    /// Snapshots a cart at the current time.
    pub fn from_cart(cart: &Cart) -> Self {
        PersistedCart {
            version: CART_FORMAT_VERSION,
            saved_at: Utc::now(),
            items: cart.items().to_vec(),
        }
    }

    /// Rebuilds the cart, restoring quantity and identity invariants.
    pub fn into_cart(self) -> Cart {
        Cart::from_items(self.items)
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Repository for the persisted cart.
#[derive(Debug, Clone)]
pub struct CartRepository {
    kv: KvRepository,
    key: String,
}

impl CartRepository {
    pub fn new(kv: KvRepository, key: impl Into<String>) -> Self {
        CartRepository {
            kv,
            key: key.into(),
        }
    }

    /// The storage key this repository reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the stored cart.
    ///
    /// ## Returns
    /// * `Ok(None)` - nothing stored yet
    /// * `Err(Serialization)` - the document is not a readable envelope
    /// * `Err(UnsupportedFormat)` - the envelope has another version
    /// * `Err(InvalidDocument)` - an item carries a negative price
    pub async fn load(&self) -> DbResult<Option<Cart>> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            debug!(key = %self.key, "No persisted cart");
            return Ok(None);
        };

        let probe: VersionProbe = serde_json::from_str(&raw)?;
        if probe.version != CART_FORMAT_VERSION {
            return Err(DbError::UnsupportedFormat {
                what: "cart".to_string(),
                version: probe.version,
            });
        }

        let persisted: PersistedCart = serde_json::from_str(&raw)?;
        if let Some(item) = persisted.items.iter().find(|i| i.product.price_cents < 0) {
            return Err(DbError::InvalidDocument {
                what: "cart".to_string(),
                reason: format!(
                    "item {} has negative price {}",
                    item.product.id, item.product.price_cents
                ),
            });
        }

        debug!(
            key = %self.key,
            items = persisted.items.len(),
            saved_at = %persisted.saved_at,
            "Loaded persisted cart"
        );
        Ok(Some(persisted.into_cart()))
    }

    /// Replaces the stored cart with `cart`.
    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        let persisted = PersistedCart::from_cart(cart);
        self.kv.put_json(&self.key, &persisted).await?;
        debug!(key = %self.key, items = persisted.items.len(), "Saved cart");
        Ok(())
    }

    /// Deletes the stored cart. Returns whether one existed.
    pub async fn clear(&self) -> DbResult<bool> {
        let existed = self.kv.delete(&self.key).await?;
        info!(key = %self.key, existed, "Cleared persisted cart");
        Ok(existed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
