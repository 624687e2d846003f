//! Invoice pricing for repair jobs.
//!
//! This module owns every derived money value on a repair invoice. Line
//! totals, subtotal, tax amount, and grand total are always recomputed
//! together from the raw line items; values supplied by a client are
//! never trusted.

pub mod calculator;
pub mod types;


pub use calculator::InvoiceCalculator;
pub use types::{Invoice, InvoiceTotals, LineItem, LineItemInput};
