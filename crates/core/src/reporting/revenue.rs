//! Revenue report generation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::{DateWindow, ReportPeriod};

/// A repair row as persistence hands it to reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairRecord {
    /// Repair ID.
    pub repair_id: i64,
    /// Customer the repair belongs to.
    pub customer_id: i64,
    /// Customer display name, joined in by persistence.
    pub customer_name: String,
    /// Repair date as stored: `YYYY-MM-DD`.
    pub repair_date: String,
    /// Stored grand total; a missing value counts as zero.
    pub grand_total: Option<Decimal>,
    /// Stored status string.
    pub status: String,
}

impl RepairRecord {
    /// Parses the stored date as naive local midnight.
    ///
    /// Returns `None` for anything unparseable; such rows are excluded
    /// from reports rather than failing them.
    #[must_use]
    pub fn occurred_at(&self) -> Option<NaiveDateTime> {
        NaiveDate::parse_from_str(self.repair_date.trim(), "%Y-%m-%d")
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    }
}

/// A generated revenue report.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    /// The resolved window, when the period was resolvable.
    pub period: Option<DateWindow>,
    /// Matching repairs, in the order persistence supplied them.
    pub repairs: Vec<RepairRecord>,
    /// Sum of grand totals over the matching repairs.
    pub total: Decimal,
}

/// Service for generating revenue reports.
pub struct RevenueService;

impl RevenueService {
    /// Keeps the repairs dated inside the window, optionally restricted
    /// to a single customer. Both window bounds are inclusive.
    #[must_use]
    pub fn filter(
        repairs: Vec<RepairRecord>,
        window: &DateWindow,
        customer_id: Option<i64>,
    ) -> Vec<RepairRecord> {
        repairs
            .into_iter()
            .filter(|repair| customer_id.is_none_or(|id| repair.customer_id == id))
            .filter(|repair| repair.occurred_at().is_some_and(|at| window.contains(at)))
            .collect()
    }

    /// Sums grand totals over the given repairs.
    #[must_use]
    pub fn sum(repairs: &[RepairRecord]) -> Decimal {
        repairs
            .iter()
            .map(|repair| repair.grand_total.unwrap_or(Decimal::ZERO))
            .sum()
    }

    /// Generates a revenue report for the period as of `now`.
    ///
    /// An unresolvable period (a custom range missing a bound) degrades
    /// to an empty report with a zero total.
    #[must_use]
    pub fn generate(
        repairs: Vec<RepairRecord>,
        period: &ReportPeriod,
        now: NaiveDateTime,
        customer_id: Option<i64>,
    ) -> RevenueReport {
        match period.resolve(now) {
            Some(window) => {
                let matching = Self::filter(repairs, &window, customer_id);
                let total = Self::sum(&matching);
                RevenueReport {
                    period: Some(window),
                    repairs: matching,
                    total,
                }
            }
            None => RevenueReport {
                period: None,
                repairs: Vec::new(),
                total: Decimal::ZERO,
            },
        }
    }
}
