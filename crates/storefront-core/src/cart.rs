//! # Cart
//!
//! The shopping cart: line items with variant identity and derived totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Presentation Action       Operation               Cart Change          │
//! │  ───────────────────       ─────────               ───────────          │
//! │                                                                         │
//! │  "Add to cart" ──────────► add_to_cart() ────────► push or qty + 1      │
//! │                                                                         │
//! │  "+" button ─────────────► increase_quantity() ──► qty + 1 (max 10)     │
//! │                                                                         │
//! │  "-" button ─────────────► decrease_quantity() ──► qty - 1 (min 1)      │
//! │                                                                         │
//! │  "Remove" ───────────────► remove_from_cart() ───► retain(!= key)       │
//! │                                                                         │
//! │  "Empty cart" ───────────► clear_cart() ─────────► items.clear()        │
//! │                                                                         │
//! │  Cart view ──────────────► totals() ─────────────► (derived, read only) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A line item is identified by [`LineKey`]: product ID plus the selected
//! color and size. The same product in two sizes is two line items. Every
//! mutating operation takes the full key; [`Cart::key_for`] recovers the
//! first matching key when only a product ID is at hand.
//!
//! ## Quantity Policy
//! Quantities stay within `1..=10`. Increments past the cap and decrements
//! below 1 are silent no-ops; removing a line is always explicit.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;
use crate::{DISCOUNT_THRESHOLD, MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY, VOLUME_DISCOUNT_BPS};

// =============================================================================
// Line Identity
// =============================================================================

/// Identity of a line item: (product ID, selected color, selected size).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineKey {
    pub product_id: String,
    pub color: Option<String>,
    pub size: Option<String>,
}

impl LineKey {
    pub fn new(
        product_id: impl Into<String>,
        color: Option<impl Into<String>>,
        size: Option<impl Into<String>>,
    ) -> Self {
        LineKey {
            product_id: product_id.into(),
            color: color.map(Into::into),
            size: size.map(Into::into),
        }
    }
}

/// Explicit variant selection for [`Cart::add_to_cart`].
///
/// Unset fields fall back to the product's first listed color/size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOptions {
    pub color: Option<String>,
    pub size: Option<String>,
}

impl AddOptions {
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the shopping cart.
///
/// ## Design Notes
/// - `product`: Frozen copy of the catalog record at time of adding. The cart
///   keeps showing (and charging) the snapshot even if the catalog changes.
/// - On the wire the product fields are flattened next to `quantity`,
///   `selectedColor` and `selectedSize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,

    /// Quantity in cart, always within `1..=10`.
    pub quantity: i64,

    pub selected_color: Option<String>,

    pub selected_size: Option<String>,
}

impl CartItem {
    /// Creates a line item with quantity 1 from a product snapshot.
    pub fn from_product(product: &Product, color: Option<String>, size: Option<String>) -> Self {
        CartItem {
            product: product.clone(),
            quantity: MIN_ITEM_QUANTITY,
            selected_color: color,
            selected_size: size,
        }
    }

    /// Returns this line's identity key.
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id.clone(),
            color: self.selected_color.clone(),
            size: self.selected_size.clone(),
        }
    }

    /// Checks identity without allocating a key.
    pub fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id
            && self.selected_color == key.color
            && self.selected_size == key.size
    }

    /// Price × quantity for this line.
    pub fn subtotal(&self) -> Money {
        self.product.price().multiply_quantity(self.quantity)
    }
}

/// Price × quantity for a given line item.
pub fn item_subtotal(item: &CartItem) -> Money {
    item.subtotal()
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by [`LineKey`] (adding the same variant increases quantity)
/// - Quantity is always within `MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY`
/// - Insertion order is preserved (the cart view lists oldest first)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from persisted items.
    ///
    /// Quantities are clamped into range and duplicate keys are merged
    /// (quantities added, then capped) so a hand-edited or older payload
    /// cannot break the invariants.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Cart::new();
        for mut item in items {
            item.quantity = item.quantity.clamp(MIN_ITEM_QUANTITY, MAX_ITEM_QUANTITY);
            let key = item.key();
            match cart.find_mut(&key) {
                Some(existing) => {
                    existing.quantity = (existing.quantity + item.quantity).min(MAX_ITEM_QUANTITY);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consumes the cart, returning its items.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - Variant comes from `options`, else the product's first color/size,
    ///   else none
    /// - Same variant already in cart: quantity + 1, unless already at 10
    /// - Otherwise: new line with quantity 1 and a snapshot of `product`
    ///
    /// ## Returns
    /// The key of the affected line, and whether the cart changed (`false`
    /// only when the line was already at 10).
    pub fn add_to_cart(&mut self, product: &Product, options: AddOptions) -> (LineKey, bool) {
        let color = options
            .color
            .or_else(|| product.default_color().map(str::to_string));
        let size = options
            .size
            .or_else(|| product.default_size().map(str::to_string));

        let key = LineKey {
            product_id: product.id.clone(),
            color,
            size,
        };

        let changed = match self.find_mut(&key) {
            Some(item) if item.quantity < MAX_ITEM_QUANTITY => {
                item.quantity += 1;
                true
            }
            Some(_) => false,
            None => {
                self.items.push(CartItem::from_product(
                    product,
                    key.color.clone(),
                    key.size.clone(),
                ));
                true
            }
        };

        (key, changed)
    }

    /// Increases a line's quantity by one, capped at 10.
    ///
    /// Returns `true` if the quantity changed.
    pub fn increase_quantity(&mut self, key: &LineKey) -> bool {
        match self.find_mut(key) {
            Some(item) if item.quantity < MAX_ITEM_QUANTITY => {
                item.quantity += 1;
                true
            }
            _ => false,
        }
    }

    /// Decreases a line's quantity by one, floored at 1.
    ///
    /// A line at quantity 1 stays in the cart; use
    /// [`remove_from_cart`](Self::remove_from_cart) to drop it.
    ///
    /// Returns `true` if the quantity changed.
    pub fn decrease_quantity(&mut self, key: &LineKey) -> bool {
        match self.find_mut(key) {
            Some(item) if item.quantity > MIN_ITEM_QUANTITY => {
                item.quantity -= 1;
                true
            }
            _ => false,
        }
    }

    /// Removes the line with exactly this key.
    ///
    /// Other variants of the same product are left in place.
    /// Returns `true` if a line was removed.
    pub fn remove_from_cart(&mut self, key: &LineKey) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| !i.matches(key));
        self.items.len() != initial_len
    }

    /// Clears all items from the cart.
    ///
    /// Returns `true` if the cart held anything.
    pub fn clear_cart(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// Checks whether any variant of the product is in the cart.
    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.items.iter().any(|i| i.product.id == product_id)
    }

    /// Key of the first line holding this product, if any.
    pub fn key_for(&self, product_id: &str) -> Option<LineKey> {
        self.items
            .iter()
            .find(|i| i.product.id == product_id)
            .map(CartItem::key)
    }

    /// Looks up a line by key.
    pub fn get(&self, key: &LineKey) -> Option<&CartItem> {
        self.items.iter().find(|i| i.matches(key))
    }

    fn find_mut(&mut self, key: &LineKey) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.matches(key))
    }

    /// Returns the number of line items in the cart.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of price × quantity over all lines, before discount.
    pub fn raw_total(&self) -> Money {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Computes the derived totals. Nothing is cached.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Cart totals summary, derived on every read.
///
/// ## Discount Rule
/// ```text
/// raw_total >  $100.00  ──► 10% off (1000 bps)
/// raw_total <= $100.00  ──► no discount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_items: i64,
    pub raw_total: Money,
    pub discount_bps: u32,
    pub discount: Money,
    pub total_price: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let raw_total = cart.raw_total();
        let discount_bps = if raw_total > DISCOUNT_THRESHOLD {
            VOLUME_DISCOUNT_BPS
        } else {
            0
        };
        let discount = raw_total.percentage_of(discount_bps);

        CartTotals {
            line_count: cart.line_count(),
            total_items: cart.total_items(),
            raw_total,
            discount_bps,
            discount,
            total_price: raw_total - discount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
