//! # storefront-db: Local Storage for the Storefront
//!
//! Durable client-side state for the storefront: a SQLite key-value store,
//! the versioned persisted cart and the [`CartSession`] that keeps the two
//! in step.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  Cart view: "Add to cart"                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │  CartSession  │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │ (session.rs)  │───►│  cart.rs      │    │  (embedded)  │   │   │
//! │  │   │               │    │  kv.rs        │    │              │   │   │
//! │  │   │ Cart (core)   │    │               │    │ 001_kv_store │   │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘   │   │
//! │  │                                │                                │   │
//! │  │   ┌───────────────┐    ┌───────▼───────┐                        │   │
//! │  │   │  StoreConfig  │───►│   Database    │                        │   │
//! │  │   │  (config.rs)  │    │   (pool.rs)   │                        │   │
//! │  │   └───────────────┘    └───────────────┘                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite: <platform data dir>/storefront.db                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Key-value and cart repositories
//! - [`session`] - The persisted cart session
//! - [`config`] - Paths and keys from defaults and the environment
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{CartSession, Database, StoreConfig};
//!
//! let config = StoreConfig::from_env();
//! config.ensure_data_dir()?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let mut session = CartSession::open(db.carts(&config.cart_key)).await?;
//! session.add_to_cart(&product, AddOptions::default()).await?;
//! session.close().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use session::CartSession;

// Repository re-exports for convenience
pub use repository::cart::{CartRepository, PersistedCart, CART_FORMAT_VERSION};
pub use repository::kv::{KvEntry, KvRepository};
