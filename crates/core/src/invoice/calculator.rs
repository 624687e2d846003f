//! Invoice total calculation.

use rust_decimal::Decimal;

use super::types::{Invoice, InvoiceTotals, LineItem, LineItemInput};

/// Calculator for invoice line totals and derived invoice totals.
///
/// Pure functions over decimals: no I/O, no clock, no rounding. Display
/// rounding is a presentation concern. Quantities and prices are not
/// range-checked here; callers own input validation.
pub struct InvoiceCalculator;

impl InvoiceCalculator {
    /// Returns the total for a single line: `quantity * unit_price`.
    #[must_use]
    pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
        quantity * unit_price
    }

    /// Computes invoice totals for the given items and tax rate.
    ///
    /// Line totals are recomputed from quantity and unit price; the
    /// subtotal is their sum (zero for an empty item list), the tax
    /// amount is `subtotal * tax_rate / 100`, and the grand total is
    /// `subtotal + tax_amount`.
    #[must_use]
    pub fn compute(items: &[LineItemInput], tax_rate: Decimal) -> InvoiceTotals {
        let subtotal: Decimal = items
            .iter()
            .map(|item| Self::line_total(item.quantity, item.unit_price))
            .sum();
        let tax_amount = subtotal * tax_rate / Decimal::ONE_HUNDRED;
        let grand_total = subtotal + tax_amount;

        InvoiceTotals {
            subtotal,
            tax_amount,
            grand_total,
        }
    }

    /// Prices every line item, recomputing each total from quantity and
    /// unit price.
    #[must_use]
    pub fn price_items(items: Vec<LineItemInput>) -> Vec<LineItem> {
        items
            .into_iter()
            .map(|item| LineItem {
                total_price: Self::line_total(item.quantity, item.unit_price),
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect()
    }

    /// Builds a fully priced invoice from raw items and a tax rate.
    ///
    /// The returned totals and line totals come from the same pass, so
    /// they cannot drift apart.
    #[must_use]
    pub fn build(items: Vec<LineItemInput>, tax_rate: Decimal) -> Invoice {
        let totals = Self::compute(&items, tax_rate);
        Invoice {
            items: Self::price_items(items),
            tax_rate,
            totals,
        }
    }
}
