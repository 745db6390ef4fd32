//! # Product Catalog
//!
//! The static, read-only product list the storefront sells from.
//!
//! The data ships inside the binary (`data/products.json`) and is decoded
//! once by [`Catalog::builtin`]. Nothing in this crate mutates it; the cart
//! takes value snapshots of the records it needs.

use crate::error::{CoreError, CoreResult};
use crate::types::Product;

/// Embedded catalog data, prices in cents.
const BUILTIN_PRODUCTS: &str = include_str!("../data/products.json");

/// An immutable, ordered collection of products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Wraps an existing product list.
    pub fn new(products: Vec<Product>) -> Self {
        Catalog { products }
    }

    /// Decodes the catalog bundled with the crate.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::catalog::Catalog;
    ///
    /// let catalog = Catalog::builtin().unwrap();
    /// assert!(catalog.get("prod-001").is_some());
    /// ```
    pub fn builtin() -> CoreResult<Self> {
        Self::from_json(BUILTIN_PRODUCTS)
    }

    /// Decodes a catalog from a JSON array of product records.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Catalog { products })
    }

    /// All products, in catalog order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Looks up a product by ID.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a product by ID, failing with `ProductNotFound`.
    pub fn require(&self, id: &str) -> CoreResult<&Product> {
        self.get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    /// Products in the given category (exact, case-insensitive match).
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(category))
    }

    /// Products currently in stock.
    pub fn in_stock(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.in_stock)
    }

    /// Distinct categories, in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    /// Case-insensitive substring search over name, category and tags.
    ///
    /// An empty (or blank) term matches every product.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }

        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_decodes() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 19);

        let jeans = catalog.get("prod-001").unwrap();
        assert_eq!(jeans.name, "Classic Blue Jeans");
        assert_eq!(jeans.price_cents, 4999);
        assert_eq!(jeans.default_color(), Some("blue"));
        assert_eq!(jeans.default_size(), Some("S"));
        assert_eq!(jeans.reviews.len(), 3);
    }

    #[test]
    fn test_ids_are_unique() {
        let catalog = Catalog::builtin().unwrap();
        let mut ids: Vec<&str> = catalog.all().iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_product_without_sizes() {
        let catalog = Catalog::builtin().unwrap();
        let product = catalog.get("prod-014").unwrap();
        assert!(product.sizes.is_empty());
        assert_eq!(product.default_size(), None);
    }

    #[test]
    fn test_require_missing_product() {
        let catalog = Catalog::builtin().unwrap();
        let err = catalog.require("prod-999").unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "prod-999"));
    }

    #[test]
    fn test_filters() {
        let catalog = Catalog::builtin().unwrap();

        let trousers: Vec<_> = catalog.by_category("trousers").collect();
        assert_eq!(trousers.len(), 4);
        assert!(trousers.iter().all(|p| p.category == "Trousers"));

        assert!(catalog.in_stock().all(|p| p.in_stock));
        assert_eq!(catalog.in_stock().count(), 16);

        let categories = catalog.categories();
        assert_eq!(categories[0], "Trousers");
        assert_eq!(categories[1], "Hoodies");
    }

    #[test]
    fn test_search() {
        let catalog = Catalog::builtin().unwrap();

        let hits = catalog.search("  HOODIE ");
        assert!(!hits.is_empty());
        assert!(hits.iter().any(|p| p.id == "prod-002"));

        assert_eq!(catalog.search("").len(), catalog.len());
        assert!(catalog.search("no-such-thing").is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Catalog::from_json("{\"id\": 1}").unwrap_err();
        assert!(matches!(err, CoreError::InvalidCatalog(_)));
    }
}
