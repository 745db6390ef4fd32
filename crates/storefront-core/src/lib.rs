//! # storefront-core: Pure State Logic for the Storefront
//!
//! This crate holds the client-side state logic of the storefront as pure,
//! synchronous code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Presentation (forms, product pages, cart)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  Schema   │  │   │
//! │  │   │  Review   │  │ discounts │  │  LineKey  │  │ FormState │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • SYNCHRONOUS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          storefront-db (key-value storage, cart session)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog record types (Product, Review)
//! - [`catalog`] - The embedded, read-only product catalog
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Line items, variant identity and derived totals
//! - [`validation`] - Declarative schemas and the reactive form engine
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::cart::{AddOptions, Cart};
//! use storefront_core::catalog::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let jeans = catalog.get("prod-001").unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_to_cart(jeans, AddOptions::default());
//! cart.add_to_cart(jeans, AddOptions::default());
//!
//! let totals = cart.totals();
//! assert_eq!(totals.total_items, 2);
//! assert_eq!(totals.raw_total.cents(), 9998);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOptions, Cart, CartItem, CartTotals, LineKey};
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::{FieldSchema, FormConfig, FormState, ObjectSchema, Schema, ValidationMode};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest quantity a line item can hold.
///
/// Decrementing never goes below this; removal is an explicit operation.
pub const MIN_ITEM_QUANTITY: i64 = 1;

/// Maximum quantity of a single line item in the cart.
///
/// Adding or increasing past this is a silent no-op.
pub const MAX_ITEM_QUANTITY: i64 = 10;

/// Subtotal a cart must exceed (strictly) before the volume discount applies.
pub const DISCOUNT_THRESHOLD: Money = Money::from_cents(10_000);

/// Volume discount in basis points (1000 = 10%).
pub const VOLUME_DISCOUNT_BPS: u32 = 1000;
