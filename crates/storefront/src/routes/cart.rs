//! Cart route handlers.
//!
//! Cart mutations are plain form posts that redirect back to the cart page.
//! All invariants (merge-by-id, quantity clamping) live in the store; the
//! handlers only resolve products and trigger mutations.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::Redirect,
};
use driftwood_core::ProductId;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::{CatalogError, Product};
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;
use crate::store::CartLine;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: Decimal,
    pub line_total: Decimal,
    pub quantity: u32,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            title: line.product.title.clone(),
            image: line.product.image.clone(),
            price: line.product.price,
            line_total: line.line_total(),
            quantity: line.quantity,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Decimal,
    pub item_count: u32,
}

impl CartView {
    /// Snapshot the store's cart into owned display data.
    #[must_use]
    pub fn from_store(store: &crate::store::Store) -> Self {
        Self {
            items: store.cart().iter().map(CartItemView::from).collect(),
            total: store.cart_total(),
            item_count: store.cart_items_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u32,
}

/// Display the cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartShowTemplate {
    let store = state.store();
    let cart = CartView::from_store(&store);
    let cart_count = cart.item_count;

    CartShowTemplate { cart, cart_count }
}

/// Resolve a product by ID: catalog snapshot first, then the detail cache,
/// then the remote catalog (caching the result).
async fn resolve_product(state: &AppState, id: ProductId) -> Result<Product, AppError> {
    let known = {
        let store = state.store();
        store
            .products()
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .or_else(|| store.get_cached_product(id).cloned())
    };

    if let Some(product) = known {
        return Ok(product);
    }

    let product = state.catalog().get_product(id).await.map_err(|e| match e {
        CatalogError::Status { status } if status == StatusCode::NOT_FOUND => {
            AppError::NotFound(format!("Product {id} not found"))
        }
        other => AppError::Catalog(other),
    })?;
    state.store().cache_product(product.clone());
    Ok(product)
}

/// Add an item to the cart (merge-by-id, capped at 10 per line).
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect, AppError> {
    let product = resolve_product(&state, form.product_id).await?;
    state.store().add_to_cart(product, form.quantity.unwrap_or(1));

    Ok(Redirect::to("/cart"))
}

/// Replace a cart line's quantity. A line that no longer exists is ignored.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<UpdateCartForm>,
) -> Redirect {
    state
        .store()
        .update_cart_quantity(form.product_id, form.quantity);

    Redirect::to("/cart")
}

/// Remove a cart line. Removing an absent line is a no-op.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Redirect {
    state.store().remove_from_cart(form.product_id);

    Redirect::to("/cart")
}
