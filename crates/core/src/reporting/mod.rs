//! Revenue reporting.
//!
//! Pure logic for turning a period selection plus stored repair rows into
//! a revenue report, in three steps: resolve the period to a date window,
//! filter the rows against it, sum the matching grand totals.

pub mod period;
pub mod revenue;


pub use period::{DateWindow, ReportPeriod};
pub use revenue::{RepairRecord, RevenueReport, RevenueService};
