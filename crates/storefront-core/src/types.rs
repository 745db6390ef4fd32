//! # Domain Types
//!
//! Catalog record types shared by the cart and the display layers.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────┐                   │
//! │  │      Product        │ 1      * │     Review      │                   │
//! │  │  ─────────────────  │─────────►│  ─────────────  │                   │
//! │  │  id ("prod-001")    │          │  user           │                   │
//! │  │  name, image        │          │  rating         │                   │
//! │  │  price_cents        │          │  comment        │                   │
//! │  │  colors[], sizes[]  │          └─────────────────┘                   │
//! │  │  in_stock, tags[]   │                                                │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A product is copied by value into the cart when added; the stored copy is
//! never linked back to the catalog record.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Review
// =============================================================================

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Review {
    /// Display name of the reviewer.
    pub user: String,

    /// Star rating, 0.0 - 5.0 (half steps and tenths occur).
    pub rating: f64,

    pub comment: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product available in the storefront catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Catalog identifier (e.g. "prod-001").
    pub id: String,

    /// Display name.
    pub name: String,

    /// Image path relative to the site root.
    pub image: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,

    pub in_stock: bool,

    /// Selectable sizes, in display order. Empty for one-off accessories.
    #[serde(default)]
    pub sizes: Vec<String>,

    /// Aggregate star rating shown on the product card.
    pub rating: f64,

    pub description: String,

    /// Selectable colors, in display order.
    #[serde(default)]
    pub colors: Vec<String>,

    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// The color preselected when none is chosen: the first listed one.
    pub fn default_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    /// The size preselected when none is chosen: the first listed one.
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }

    /// Average of the individual review ratings, `None` without reviews.
    pub fn average_review_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }

        let sum: f64 = self.reviews.iter().map(|r| r.rating).sum();
        Some(sum / self.reviews.len() as f64)
    }

    /// Checks if the product carries the given tag (case-insensitive).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hoodie() -> Product {
        Product {
            id: "prod-002".to_string(),
            name: "Black Hoodie".to_string(),
            image: "/images/products/black-hoodie.jpeg".to_string(),
            price_cents: 3999,
            category: "Hoodies".to_string(),
            tags: vec!["hoodie".to_string(), "Casual".to_string()],
            in_stock: true,
            sizes: vec!["M".to_string(), "L".to_string()],
            rating: 4.2,
            description: "Soft black hoodie.".to_string(),
            colors: vec!["black".to_string(), "charcoal gray".to_string()],
            reviews: vec![
                Review {
                    user: "Emily R.".to_string(),
                    rating: 4.0,
                    comment: "Soft.".to_string(),
                },
                Review {
                    user: "Daniel W.".to_string(),
                    rating: 5.0,
                    comment: "Warm.".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_defaults_pick_first_variant() {
        let product = hoodie();
        assert_eq!(product.default_color(), Some("black"));
        assert_eq!(product.default_size(), Some("M"));

        let bare = Product {
            sizes: vec![],
            colors: vec![],
            ..hoodie()
        };
        assert_eq!(bare.default_color(), None);
        assert_eq!(bare.default_size(), None);
    }

    #[test]
    fn test_average_review_rating() {
        assert_eq!(hoodie().average_review_rating(), Some(4.5));

        let unrated = Product {
            reviews: vec![],
            ..hoodie()
        };
        assert_eq!(unrated.average_review_rating(), None);
    }

    #[test]
    fn test_has_tag_ignores_case() {
        let product = hoodie();
        assert!(product.has_tag("casual"));
        assert!(product.has_tag("HOODIE"));
        assert!(!product.has_tag("denim"));
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = serde_json::to_value(hoodie()).unwrap();
        assert_eq!(json["priceCents"], 3999);
        assert_eq!(json["inStock"], true);
        assert!(json.get("price_cents").is_none());
    }
}
