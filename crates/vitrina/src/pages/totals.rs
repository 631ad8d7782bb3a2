//! Checkout totals arithmetic.
//!
//! The storefront rounds the subtotal, the tax, and the grand total to two
//! decimal places independently — not just the final figure. Expected
//! values computed any other way drift from the displayed ones by a cent
//! on some carts, so the three-stage rounding here must stay exactly as
//! the storefront does it.

/// The three figures shown on the checkout overview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    /// Sum of item prices, rounded to cents
    pub subtotal: f64,
    /// Subtotal times the tax rate, rounded to cents
    pub tax: f64,
    /// Subtotal plus tax, rounded to cents
    pub total: f64,
}

/// Round to two decimal places.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the expected overview figures for a cart of item prices.
#[must_use]
pub fn order_totals(prices: &[f64], tax_rate: f64) -> OrderTotals {
    let subtotal = round_cents(prices.iter().sum());
    let tax = round_cents(subtotal * tax_rate);
    let total = round_cents(subtotal + tax);
    OrderTotals {
        subtotal,
        tax,
        total,
    }
}
