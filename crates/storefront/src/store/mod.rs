//! Client state store.
//!
//! The [`Store`] is the single authoritative holder of the catalog snapshot,
//! the shopping cart, the product detail cache, and the transient filter and
//! load-status fields. It is the only place where the cart invariants are
//! enforced:
//!
//! - every line quantity stays within `[1, 10]`
//! - at most one cart line exists per product ID
//! - totals are always derivable as sum(price x quantity)
//!
//! The store is an explicit context object owned by the application state,
//! not a global. A subset of it (cart + product cache) is written to a local
//! snapshot file after every mutation; those writes are best-effort and never
//! surface failures to the caller.

mod snapshot;

pub use snapshot::{Snapshot, SnapshotError, SnapshotStorage};

use std::collections::HashMap;

use driftwood_core::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// Smallest quantity a cart line may hold.
pub const MIN_LINE_QUANTITY: u32 = 1;
/// Largest quantity a cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 10;

/// A quantity of one product held in the cart.
///
/// The line's own `id` equals the product's ID, which is what guarantees at
/// most one line per product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line identifier; always equal to `product.id`.
    pub id: ProductId,
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    /// How many units of the product, within `[1, 10]`.
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// In-memory application state with derived-read accessors.
#[derive(Debug, Default)]
pub struct Store {
    products: Vec<Product>,
    categories: Vec<String>,
    cart: Vec<CartLine>,
    cached_products: HashMap<ProductId, Product>,
    search_term: String,
    selected_category: String,
    loading: bool,
    error: Option<String>,
    storage: Option<SnapshotStorage>,
}

impl Store {
    /// Create an empty, non-persisting store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store backed by a snapshot file.
    ///
    /// The snapshot is read once here to restore the cart and product cache;
    /// an unreadable snapshot is logged and treated as empty rather than
    /// failing startup.
    #[must_use]
    pub fn with_storage(storage: SnapshotStorage) -> Self {
        let restored = storage.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to restore state snapshot, starting empty");
            Snapshot::default()
        });

        Self {
            cart: restored.cart,
            cached_products: restored.cached_products,
            storage: Some(storage),
            ..Self::default()
        }
    }

    // =========================================================================
    // Catalog and filter fields
    // =========================================================================

    /// Replace the catalog snapshot with the list as given.
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Replace the category list with the list as given.
    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    /// Replace the free-text search filter. No effect on the cart.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Replace the category filter; empty means "no filter". No effect on
    /// the cart.
    pub fn set_selected_category(&mut self, category: impl Into<String>) {
        self.selected_category = category.into();
    }

    /// Set the transient loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Set or clear the transient user-visible error message.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Current catalog snapshot.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Current category list.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Current search filter.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Current category filter ("" = no filter).
    #[must_use]
    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    /// Whether a catalog load is in flight.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    /// Last fetch failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The visible product subset under the current filters.
    ///
    /// A pure projection over the catalog snapshot: a product passes if its
    /// title contains the search term (case-insensitive) and, when a category
    /// filter is set, its category matches exactly.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.search_term, &self.selected_category)
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add `quantity` units of `product` to the cart.
    ///
    /// Merges by product ID: an existing line accumulates (never overwrites)
    /// and is capped at [`MAX_LINE_QUANTITY`] - the cap never reduces a
    /// quantity below what the line already held. A new line's quantity is
    /// clamped into `[1, 10]` rather than trusting the caller.
    pub fn add_to_cart(&mut self, product: Product, quantity: u32) {
        if let Some(line) = self.cart.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line
                .quantity
                .saturating_add(quantity)
                .min(MAX_LINE_QUANTITY);
        } else {
            self.cart.push(CartLine {
                id: product.id,
                quantity: quantity.clamp(MIN_LINE_QUANTITY, MAX_LINE_QUANTITY),
                product,
            });
        }
        self.persist();
    }

    /// Delete the cart line for `product_id`. A missing line is a no-op,
    /// not an error.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        self.cart.retain(|line| line.id != product_id);
        self.persist();
    }

    /// Replace the quantity of an existing cart line, clamped into `[1, 10]`.
    ///
    /// A missing line is silently ignored.
    pub fn update_cart_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(line) = self.cart.iter_mut().find(|line| line.id == product_id) {
            line.quantity = quantity.clamp(MIN_LINE_QUANTITY, MAX_LINE_QUANTITY);
        }
        self.persist();
    }

    /// Remove all cart lines.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Current cart lines.
    #[must_use]
    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    /// Sum of `price x quantity` over all cart lines; zero for an empty cart.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all cart lines; zero for an empty cart.
    #[must_use]
    pub fn cart_items_count(&self) -> u32 {
        self.cart.iter().map(|line| line.quantity).sum()
    }

    // =========================================================================
    // Product cache
    // =========================================================================

    /// Insert or overwrite the cache entry for `product.id`.
    ///
    /// The cache has no eviction; for the session lengths this storefront
    /// targets (dozens of products) unbounded growth is accepted.
    pub fn cache_product(&mut self, product: Product) {
        self.cached_products.insert(product.id, product);
        self.persist();
    }

    /// The cached product for `id`, if one was ever fetched.
    #[must_use]
    pub fn get_cached_product(&self, id: ProductId) -> Option<&Product> {
        self.cached_products.get(&id)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// The persisted subset of the store (cart + product cache).
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cart: self.cart.clone(),
            cached_products: self.cached_products.clone(),
        }
    }

    /// Best-effort rewrite of the snapshot file. Failure is logged, never
    /// surfaced.
    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(e) = storage.save(&self.snapshot()) {
            tracing::warn!(error = %e, "failed to persist state snapshot");
        }
    }
}

/// Pure filter predicate over a catalog slice.
///
/// A product passes if the search term is empty or its title contains it
/// (case-insensitive), and the category filter is empty or matches the
/// product category exactly.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    search_term: &str,
    selected_category: &str,
) -> Vec<&'a Product> {
    let needle = search_term.to_lowercase();
    products
        .iter()
        .filter(|product| {
            let matches_search =
                needle.is_empty() || product.title.to_lowercase().contains(&needle);
            let matches_category =
                selected_category.is_empty() || product.category == selected_category;
            matches_search && matches_category
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Rating;

    fn product(id: u64, title: &str, price: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: price.parse().unwrap(),
            description: String::new(),
            category: category.to_string(),
            image: String::new(),
            rating: Rating {
                rate: 4.0,
                count: 10,
            },
        }
    }

    #[test]
    fn test_add_distinct_products_creates_two_lines() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 2);
        store.add_to_cart(product(2, "Mug", "5.50", "kitchen"), 1);

        assert_eq!(store.cart().len(), 2);
        assert_eq!(store.cart()[0].id, ProductId::new(1));
        assert_eq!(store.cart()[0].quantity, 2);
        assert_eq!(store.cart()[1].id, ProductId::new(2));
        assert_eq!(store.cart()[1].quantity, 1);
    }

    #[test]
    fn test_add_same_product_accumulates() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 3);
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 4);

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].quantity, 7);
    }

    #[test]
    fn test_add_same_product_clamps_at_ten() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 8);
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 8);

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_add_clamps_new_line_into_range() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 0);
        store.add_to_cart(product(2, "Mug", "5.50", "kitchen"), 99);

        assert_eq!(store.cart()[0].quantity, MIN_LINE_QUANTITY);
        assert_eq!(store.cart()[1].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 2);
        store.remove_from_cart(ProductId::new(99));

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart()[0].quantity, 2);
    }

    #[test]
    fn test_remove_existing_line() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 2);
        store.remove_from_cart(ProductId::new(1));

        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_update_quantity_replaces_not_accumulates() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 2);
        store.update_cart_quantity(ProductId::new(1), 5);

        assert_eq!(store.cart()[0].quantity, 5);
    }

    #[test]
    fn test_update_quantity_missing_line_ignored() {
        let mut store = Store::new();
        store.update_cart_quantity(ProductId::new(1), 5);

        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_update_quantity_clamped_into_range() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 2);
        store.update_cart_quantity(ProductId::new(1), 0);
        assert_eq!(store.cart()[0].quantity, MIN_LINE_QUANTITY);

        store.update_cart_quantity(ProductId::new(1), 25);
        assert_eq!(store.cart()[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_cart_total_exact_decimal() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "10.00", "bags"), 2);
        store.add_to_cart(product(2, "Mug", "5.50", "kitchen"), 1);

        assert_eq!(store.cart_total(), "25.50".parse::<Decimal>().unwrap());
        assert_eq!(store.cart_items_count(), 3);
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let store = Store::new();
        assert_eq!(store.cart_total(), Decimal::ZERO);
        assert_eq!(store.cart_items_count(), 0);
    }

    #[test]
    fn test_clear_cart_resets_totals() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "10.00", "bags"), 2);
        store.clear_cart();

        assert!(store.cart().is_empty());
        assert_eq!(store.cart_total(), Decimal::ZERO);
        assert_eq!(store.cart_items_count(), 0);
    }

    #[test]
    fn test_cache_product_overwrites_by_id() {
        let mut store = Store::new();
        store.cache_product(product(1, "Backpack", "109.95", "bags"));
        store.cache_product(product(1, "Backpack v2", "99.95", "bags"));

        let cached = store.get_cached_product(ProductId::new(1)).unwrap();
        assert_eq!(cached.title, "Backpack v2");
        assert!(store.get_cached_product(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_filters_do_not_touch_cart() {
        let mut store = Store::new();
        store.add_to_cart(product(1, "Backpack", "109.95", "bags"), 2);
        store.set_search_term("mug");
        store.set_selected_category("kitchen");

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.search_term(), "mug");
        assert_eq!(store.selected_category(), "kitchen");
    }

    #[test]
    fn test_filter_empty_filters_show_everything() {
        let products = vec![
            product(1, "Backpack", "109.95", "bags"),
            product(2, "Mug", "5.50", "kitchen"),
        ];
        let visible = filter_products(&products, "", "");
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn test_filter_unmatched_search_shows_nothing() {
        let products = vec![
            product(1, "Backpack", "109.95", "bags"),
            product(2, "Mug", "5.50", "kitchen"),
        ];
        let visible = filter_products(&products, "zzz-no-such-product", "");
        assert!(visible.is_empty());
    }

    #[test]
    fn test_filter_search_is_case_insensitive_substring() {
        let products = vec![
            product(1, "Fjallraven Backpack", "109.95", "bags"),
            product(2, "Mug", "5.50", "kitchen"),
        ];
        let visible = filter_products(&products, "BACK", "");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, ProductId::new(1));
    }

    #[test]
    fn test_filter_category_is_exact_match_and_composes() {
        let products = vec![
            product(1, "Canvas Backpack", "109.95", "bags"),
            product(2, "Leather Backpack", "149.95", "premium bags"),
            product(3, "Mug", "5.50", "kitchen"),
        ];
        let by_category = filter_products(&products, "", "bags");
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].id, ProductId::new(1));

        let combined = filter_products(&products, "backpack", "premium bags");
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].id, ProductId::new(2));
    }
}
