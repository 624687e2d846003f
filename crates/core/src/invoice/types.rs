//! Invoice data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line item as submitted by a caller.
///
/// Carries no total on purpose: the total is derived, and deriving it
/// here is the only way to obtain one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// What was done or supplied (e.g. "Brake pad replacement").
    pub description: String,
    /// Quantity of the item.
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    /// Price per unit.
    #[serde(default)]
    pub unit_price: Decimal,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

/// A line item with its recomputed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// What was done or supplied.
    pub description: String,
    /// Quantity of the item.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub total_price: Decimal,
}

/// Derived totals for an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of all line totals.
    pub subtotal: Decimal,
    /// `subtotal * tax_rate / 100`.
    pub tax_amount: Decimal,
    /// `subtotal + tax_amount`.
    pub grand_total: Decimal,
}

/// A fully priced invoice: line items plus the totals derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    /// Priced line items.
    pub items: Vec<LineItem>,
    /// Tax rate as a percentage (18 means 18%).
    pub tax_rate: Decimal,
    /// Derived totals.
    pub totals: InvoiceTotals,
}
