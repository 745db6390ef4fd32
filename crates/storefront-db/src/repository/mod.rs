//! # Repository Module
//!
//! Storage repositories for the storefront.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartSession                                                            │
//! │       │  session.add_to_cart(&product, options)                         │
//! │       ▼                                                                 │
//! │  CartRepository        load / save / clear                              │
//! │       │  versioned JSON envelope {version, savedAt, items}              │
//! │       ▼                                                                 │
//! │  KvRepository          get / put / delete / keys                        │
//! │       │  one TEXT document per key                                      │
//! │       ▼                                                                 │
//! │  SQLite: kv_store                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`KvRepository`](kv::KvRepository) - Raw key-value documents
//! - [`CartRepository`](cart::CartRepository) - The persisted cart

pub mod cart;
pub mod kv;
