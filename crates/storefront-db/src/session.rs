//! # Cart Session
//!
//! The cart as the storefront uses it: an in-memory [`Cart`] hydrated from
//! storage on open and written back after every mutation.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartSession::open(repo)                                                │
//! │       │   stored envelope?  ──► yes: hydrate (invariants restored)      │
//! │       │                     ──► no:  empty cart                         │
//! │       │                     ──► unreadable: warn, empty cart            │
//! │       ▼                                                                 │
//! │  mutate (add / increase / decrease / remove / clear)                    │
//! │       │   in-memory change first, then awaited save                     │
//! │       │   save failed? ──► dirty, error returned, retried on next       │
//! │       │                    mutation or flush                            │
//! │       ▼                                                                 │
//! │  close() ──► flush if dirty                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads (`cart`, `totals`, `is_in_cart`, `key_for`) never touch storage.

use tracing::{debug, info, warn};

use storefront_core::{AddOptions, Cart, CartTotals, LineKey, Product};

use crate::error::DbResult;
use crate::repository::cart::CartRepository;

/// A cart bound to its storage key.
#[derive(Debug)]
pub struct CartSession {
    cart: Cart,
    repo: CartRepository,
    dirty: bool,
}

impl CartSession {
    /// Opens the session, hydrating the cart from storage.
    ///
    /// An unreadable or unsupported stored document is discarded with a
    /// warning and the session starts empty. Only storage being unavailable
    /// is an error.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::{AddOptions, Catalog};
    /// use storefront_db::{CartSession, Database, DbConfig};
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let db = Database::new(DbConfig::in_memory()).await.unwrap();
    /// let catalog = Catalog::builtin().unwrap();
    ///
    /// let mut session = CartSession::open(db.carts("cart")).await.unwrap();
    /// session
    ///     .add_to_cart(catalog.get("prod-001").unwrap(), AddOptions::default())
    ///     .await
    ///     .unwrap();
    /// session.close().await.unwrap();
    ///
    /// let session = CartSession::open(db.carts("cart")).await.unwrap();
    /// assert_eq!(session.totals().total_items, 1);
    /// # });
    /// ```
    pub async fn open(repo: CartRepository) -> DbResult<Self> {
        let cart = match repo.load().await {
            Ok(Some(cart)) => {
                info!(
                    key = %repo.key(),
                    lines = cart.line_count(),
                    items = cart.total_items(),
                    "Hydrated cart"
                );
                cart
            }
            Ok(None) => {
                debug!(key = %repo.key(), "Starting with an empty cart");
                Cart::new()
            }
            Err(e) if e.is_corrupt_document() => {
                warn!(key = %repo.key(), error = %e, "Discarding unreadable persisted cart");
                Cart::new()
            }
            Err(e) => return Err(e),
        };

        Ok(CartSession {
            cart,
            repo,
            dirty: false,
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.cart.is_in_cart(product_id)
    }

    pub fn key_for(&self, product_id: &str) -> Option<LineKey> {
        self.cart.key_for(product_id)
    }

    /// Whether the last save failed and storage lags the in-memory cart.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of a product variant and persists the cart if it changed.
    ///
    /// Returns the line key and whether the cart changed.
    pub async fn add_to_cart(
        &mut self,
        product: &Product,
        options: AddOptions,
    ) -> DbResult<(LineKey, bool)> {
        let (key, changed) = self.cart.add_to_cart(product, options);
        debug!(product_id = %key.product_id, changed, "Added to cart");
        self.persist_if(changed).await?;
        Ok((key, changed))
    }

    pub async fn increase_quantity(&mut self, key: &LineKey) -> DbResult<bool> {
        let changed = self.cart.increase_quantity(key);
        self.persist_if(changed).await?;
        Ok(changed)
    }

    pub async fn decrease_quantity(&mut self, key: &LineKey) -> DbResult<bool> {
        let changed = self.cart.decrease_quantity(key);
        self.persist_if(changed).await?;
        Ok(changed)
    }

    pub async fn remove_from_cart(&mut self, key: &LineKey) -> DbResult<bool> {
        let changed = self.cart.remove_from_cart(key);
        self.persist_if(changed).await?;
        Ok(changed)
    }

    /// Empties the cart. The stored envelope is kept, with no items.
    pub async fn clear_cart(&mut self) -> DbResult<bool> {
        let changed = self.cart.clear_cart();
        self.persist_if(changed).await?;
        Ok(changed)
    }

    /// Writes the cart if a previous save failed.
    pub async fn flush(&mut self) -> DbResult<()> {
        if self.dirty {
            self.persist().await?;
        }
        Ok(())
    }

    /// Flushes and ends the session.
    pub async fn close(mut self) -> DbResult<()> {
        self.flush().await?;
        debug!(key = %self.repo.key(), "Cart session closed");
        Ok(())
    }

    async fn persist_if(&mut self, changed: bool) -> DbResult<()> {
        if changed || self.dirty {
            self.persist().await?;
        }
        Ok(())
    }

    async fn persist(&mut self) -> DbResult<()> {
        match self.repo.save(&self.cart).await {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                warn!(key = %self.repo.key(), error = %e, "Cart save failed");
                self.dirty = true;
                Err(e)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use storefront_core::{Catalog, MAX_ITEM_QUANTITY};

    async fn setup() -> (Database, Catalog) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (db, Catalog::builtin().unwrap())
    }

    #[tokio::test]
    async fn test_open_empty() {
        let (db, _) = setup().await;
        let session = CartSession::open(db.carts("cart")).await.unwrap();
        assert!(session.cart().is_empty());
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let (db, catalog) = setup().await;
        let jeans = catalog.get("prod-001").unwrap();
        let hoodie = catalog.get("prod-002").unwrap();

        let mut session = CartSession::open(db.carts("cart")).await.unwrap();
        let (jeans_key, _) = session.add_to_cart(jeans, AddOptions::default()).await.unwrap();
        session.add_to_cart(jeans, AddOptions::default()).await.unwrap();
        let (hoodie_key, _) = session.add_to_cart(hoodie, AddOptions::default()).await.unwrap();
        assert!(session.increase_quantity(&hoodie_key).await.unwrap());
        assert!(session.decrease_quantity(&jeans_key).await.unwrap());

        // Reopen without closing: every mutation already hit storage
        let reopened = CartSession::open(db.carts("cart")).await.unwrap();
        assert_eq!(reopened.cart(), session.cart());
        assert_eq!(reopened.cart().get(&jeans_key).unwrap().quantity, 1);
        assert_eq!(reopened.cart().get(&hoodie_key).unwrap().quantity, 2);

        assert!(session.remove_from_cart(&jeans_key).await.unwrap());
        let reopened = CartSession::open(db.carts("cart")).await.unwrap();
        assert!(!reopened.is_in_cart("prod-001"));
        assert!(reopened.is_in_cart("prod-002"));
        assert_eq!(reopened.key_for("prod-002"), Some(hoodie_key));
    }

    #[tokio::test]
    async fn test_noop_mutations_report_false() {
        let (db, catalog) = setup().await;
        let mut session = CartSession::open(db.carts("cart")).await.unwrap();
        let (key, _) = session
            .add_to_cart(catalog.get("prod-003").unwrap(), AddOptions::default())
            .await
            .unwrap();

        assert!(!session.decrease_quantity(&key).await.unwrap());
        for _ in 0..15 {
            session.increase_quantity(&key).await.unwrap();
        }
        assert_eq!(session.cart().get(&key).unwrap().quantity, MAX_ITEM_QUANTITY);
        assert!(!session.increase_quantity(&key).await.unwrap());

        let missing = LineKey::new("prod-999", None::<String>, None::<String>);
        assert!(!session.remove_from_cart(&missing).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_at_cap_skips_save() {
        let (db, catalog) = setup().await;
        let jeans = catalog.get("prod-001").unwrap();
        let mut session = CartSession::open(db.carts("cart")).await.unwrap();

        for _ in 0..MAX_ITEM_QUANTITY {
            let (_, changed) = session.add_to_cart(jeans, AddOptions::default()).await.unwrap();
            assert!(changed);
        }

        db.close().await;

        // Nothing changed, so the closed store is never touched
        let (key, changed) = session.add_to_cart(jeans, AddOptions::default()).await.unwrap();
        assert!(!changed);
        assert!(!session.is_dirty());
        assert_eq!(session.cart().get(&key).unwrap().quantity, MAX_ITEM_QUANTITY);
    }

    #[tokio::test]
    async fn test_clear_persists_empty_cart() {
        let (db, catalog) = setup().await;
        let mut session = CartSession::open(db.carts("cart")).await.unwrap();
        session
            .add_to_cart(catalog.get("prod-001").unwrap(), AddOptions::default())
            .await
            .unwrap();

        assert!(session.clear_cart().await.unwrap());
        assert!(!session.clear_cart().await.unwrap());

        let reopened = CartSession::open(db.carts("cart")).await.unwrap();
        assert!(reopened.cart().is_empty());
        assert_eq!(db.kv().keys().await.unwrap(), vec!["cart"]);
    }

    #[tokio::test]
    async fn test_discount_survives_reload() {
        let (db, catalog) = setup().await;
        let jeans = catalog.get("prod-001").unwrap();

        let mut session = CartSession::open(db.carts("cart")).await.unwrap();
        for _ in 0..3 {
            session.add_to_cart(jeans, AddOptions::default()).await.unwrap();
        }
        session.close().await.unwrap();

        let totals = CartSession::open(db.carts("cart")).await.unwrap().totals();
        assert_eq!(totals.raw_total.cents(), 14997);
        assert_eq!(totals.discount.cents(), 1500);
        assert_eq!(totals.total_price.cents(), 13497);
    }

    #[tokio::test]
    async fn test_corrupt_document_starts_empty() {
        let (db, _) = setup().await;
        db.kv().put("cart", "{\"items\": 7").await.unwrap();
        let session = CartSession::open(db.carts("cart")).await.unwrap();
        assert!(session.cart().is_empty());

        db.kv()
            .put("cart", r#"{"version": 9, "savedAt": "2026-01-01T00:00:00Z", "items": []}"#)
            .await
            .unwrap();
        let session = CartSession::open(db.carts("cart")).await.unwrap();
        assert!(session.cart().is_empty());

        db.kv()
            .put(
                "cart",
                r#"{"version": 1, "savedAt": "2026-01-01T00:00:00Z", "items": [
                    {"id": "prod-001", "name": "Jeans", "image": "/j.jpeg", "priceCents": -1,
                     "category": "Pants", "tags": [], "inStock": true, "sizes": [], "rating": 4.0,
                     "description": "", "colors": [], "reviews": [], "quantity": 1,
                     "selectedColor": null, "selectedSize": null}
                ]}"#,
            )
            .await
            .unwrap();
        let session = CartSession::open(db.carts("cart")).await.unwrap();
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_marks_dirty() {
        let (db, catalog) = setup().await;
        let mut session = CartSession::open(db.carts("cart")).await.unwrap();
        let (key, _) = session
            .add_to_cart(catalog.get("prod-001").unwrap(), AddOptions::default())
            .await
            .unwrap();

        db.close().await;

        let err = session.increase_quantity(&key).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
        assert!(session.is_dirty());
        // The in-memory cart still reflects the change
        assert_eq!(session.cart().get(&key).unwrap().quantity, 2);

        assert!(session.flush().await.is_err());
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_open_fails_when_storage_is_gone() {
        let (db, _) = setup().await;
        db.close().await;
        assert!(CartSession::open(db.carts("cart")).await.is_err());
    }
}
