//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a monetary amount as a dollar price with two decimals.
///
/// Usage in templates: `{{ product.price|price }}`
#[askama::filter_fn]
pub fn price(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_price(&amount))
}

/// Uppercases the first character, leaving the rest unchanged.
///
/// Category labels arrive lowercase from the catalog (e.g. "electronics").
///
/// Usage in templates: `{{ category|capitalize_label }}`
#[askama::filter_fn]
pub fn capitalize_label(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(capitalize(&value.to_string()))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

fn format_price(amount: &impl Display) -> String {
    format!("${amount:.2}")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        format!("{}{}", first.to_uppercase(), chars.as_str())
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{capitalize, format_price};

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(&Decimal::new(550, 2)), "$5.50");
        assert_eq!(format_price(&Decimal::new(10995, 2)), "$109.95");
        assert_eq!(format_price(&Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("electronics"), "Electronics");
        assert_eq!(capitalize("men's clothing"), "Men's clothing");
        assert_eq!(capitalize(""), "");
    }
}
