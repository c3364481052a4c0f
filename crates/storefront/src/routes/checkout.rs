//! Checkout route handlers.
//!
//! The checkout is a mock: shipping details are validated, order processing
//! is a fixed delay, and nothing is persisted server-side. A successful
//! submission clears the cart and renders a confirmation.

use std::time::Duration;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use driftwood_core::Email;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::filters;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Simulated order-processing latency. No real I/O happens behind it.
const PROCESSING_DELAY: Duration = Duration::from_secs(2);

const MIN_NAME_CHARS: usize = 2;
const MIN_ADDRESS_CHARS: usize = 5;
const MIN_CITY_CHARS: usize = 2;
const MIN_POSTAL_CODE_CHARS: usize = 5;

/// Shipping details submitted by the checkout form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutFormInput {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

/// Per-field validation messages for re-rendering the form.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl FieldErrors {
    /// Whether any field failed validation.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.address.is_some()
            || self.city.is_some()
            || self.postal_code.is_some()
    }
}

impl CheckoutFormInput {
    /// Validate all fields, collecting a message per failing field.
    ///
    /// Lengths are counted on the trimmed input so whitespace padding cannot
    /// satisfy a minimum.
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.name.trim().chars().count() < MIN_NAME_CHARS {
            errors.name = Some("Name must be at least 2 characters".to_string());
        }
        if Email::parse(self.email.trim()).is_err() {
            errors.email = Some("Please enter a valid email address".to_string());
        }
        if self.address.trim().chars().count() < MIN_ADDRESS_CHARS {
            errors.address = Some("Address must be at least 5 characters".to_string());
        }
        if self.city.trim().chars().count() < MIN_CITY_CHARS {
            errors.city = Some("City must be at least 2 characters".to_string());
        }
        if self.postal_code.trim().chars().count() < MIN_POSTAL_CODE_CHARS {
            errors.postal_code = Some("Postal code must be at least 5 characters".to_string());
        }

        errors
    }
}

/// Checkout form page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub cart: CartView,
    pub form: CheckoutFormInput,
    pub errors: FieldErrors,
    pub cart_count: u32,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct CheckoutConfirmationTemplate {
    pub order_number: String,
    pub total: Decimal,
    pub placed_at: String,
    pub cart_count: u32,
}

/// Display the checkout form (or the empty-cart notice).
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CheckoutShowTemplate {
    let store = state.store();
    let cart = CartView::from_store(&store);
    let cart_count = cart.item_count;

    CheckoutShowTemplate {
        cart,
        form: CheckoutFormInput::default(),
        errors: FieldErrors::default(),
        cart_count,
    }
}

/// Place the order: validate, simulate processing, clear the cart, confirm.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<CheckoutFormInput>,
) -> Response {
    let cart = {
        let store = state.store();
        CartView::from_store(&store)
    };

    if cart.items.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let errors = form.validate();
    if errors.any() {
        let cart_count = cart.item_count;
        return CheckoutShowTemplate {
            cart,
            form,
            errors,
            cart_count,
        }
        .into_response();
    }

    // Simulated processing latency; the store lock is not held here, so a
    // concurrent cart mutation simply lands before the clear below.
    tokio::time::sleep(PROCESSING_DELAY).await;

    let order_number = Uuid::new_v4();
    let placed_at = Utc::now();
    tracing::info!(
        order = %order_number,
        total = %cart.total,
        items = cart.item_count,
        "order placed"
    );

    state.store().clear_cart();

    CheckoutConfirmationTemplate {
        order_number: order_number.to_string(),
        total: cart.total,
        placed_at: placed_at.format("%B %-d, %Y").to_string(),
        cart_count: 0,
    }
    .into_response()
}
