//! Domain types for the remote product catalog.
//!
//! Field names mirror the catalog's JSON wire format, so these types double
//! as the decode target for the REST client.

use driftwood_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An immutable catalog record.
///
/// Created only by the [`CatalogClient`](super::CatalogClient) on fetch;
/// never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Externally assigned, stable identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Unit price. The catalog sends a JSON number; decoding through
    /// `Decimal` keeps cart totals exact.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Long-form description.
    pub description: String,
    /// Category label (e.g., "electronics").
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Aggregate review rating.
    pub rating: Rating,
}

/// Aggregate review rating for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating on a 0-5 scale.
    pub rate: f64,
    /// Number of reviews behind the average.
    pub count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_decodes_catalog_json() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://example.com/81fPKd-2AYL.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(10995, 2));
        assert_eq!(product.category, "men's clothing");
        assert_eq!(product.rating.count, 120);
    }

    #[test]
    fn test_product_roundtrips_price_as_number() {
        let product = Product {
            id: ProductId::new(2),
            title: "Mug".to_string(),
            price: Decimal::new(550, 2),
            description: String::new(),
            category: "kitchen".to_string(),
            image: String::new(),
            rating: Rating {
                rate: 4.5,
                count: 3,
            },
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], serde_json::json!(5.5));
        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back.price, product.price);
    }
}
