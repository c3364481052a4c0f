//! Product listing and detail route handlers.
//!
//! The listing loads the catalog once per process (products and categories
//! fetched concurrently); afterwards it serves the store's snapshot and
//! applies the transient filters. The detail page consults the persisted
//! product cache before going back to the catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use driftwood_core::ProductId;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{CatalogError, Product};
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Product display data for listing cards.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    pub rating_rate: f64,
    pub rating_count: u64,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            category: product.category.clone(),
            image: product.image.clone(),
            rating_rate: product.rating.rate,
            rating_count: product.rating.count,
        }
    }
}

/// Product display data for the detail page.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub description: String,
    pub category: String,
    pub image: String,
    pub rating_rate: f64,
    pub rating_count: u64,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            rating_rate: product.rating.rate,
            rating_count: product.rating.count,
        }
    }
}

/// Listing filter query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub categories: Vec<String>,
    pub search_term: String,
    pub selected_category: String,
    pub error: Option<String>,
    pub cart_count: u32,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetailView,
    pub quantities: Vec<u32>,
    pub cart_count: u32,
}

/// Display the product listing with the current filters applied.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> ProductIndexTemplate {
    // Load the catalog only when the store holds no snapshot yet.
    let needs_load = {
        let mut store = state.store();
        let needs = store.products().is_empty();
        if needs {
            store.set_loading(true);
            store.set_error(None);
        }
        needs
    };

    if needs_load {
        // Products and categories are fetched concurrently; one failure
        // fails the whole load and leaves prior state intact.
        let (products, categories) = tokio::join!(
            state.catalog().get_products(),
            state.catalog().get_categories(),
        );

        let mut store = state.store();
        match (products, categories) {
            (Ok(products), Ok(categories)) => {
                store.set_products(products);
                store.set_categories(categories);
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %e, "catalog load failed");
                store.set_error(Some(format!("Failed to load products: {e}")));
            }
        }
        store.set_loading(false);
    }

    let mut store = state.store();
    store.set_search_term(query.search.unwrap_or_default());
    store.set_selected_category(query.category.unwrap_or_default());

    ProductIndexTemplate {
        products: store
            .visible_products()
            .into_iter()
            .map(ProductCardView::from)
            .collect(),
        categories: store.categories().to_vec(),
        search_term: store.search_term().to_string(),
        selected_category: store.selected_category().to_string(),
        error: store.error().map(ToString::to_string),
        cart_count: store.cart_items_count(),
    }
}

/// Display a product detail page, cache-first.
#[instrument(skip(state), fields(id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ProductShowTemplate, AppError> {
    let cached = state.store().get_cached_product(id).cloned();

    let product = match cached {
        Some(product) => {
            tracing::debug!("product cache hit");
            product
        }
        None => {
            let product = state.catalog().get_product(id).await.map_err(|e| match e {
                CatalogError::Status { status } if status == StatusCode::NOT_FOUND => {
                    AppError::NotFound(format!("Product {id} not found"))
                }
                other => AppError::Catalog(other),
            })?;
            state.store().cache_product(product.clone());
            product
        }
    };

    let cart_count = state.store().cart_items_count();

    Ok(ProductShowTemplate {
        product: ProductDetailView::from(&product),
        // The detail page's picker stops at 5 even though a cart line
        // accumulates up to 10.
        quantities: (1..=5).collect(),
        cart_count,
    })
}
