//! Report period resolution.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Inclusive date-time window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    /// First instant inside the window.
    pub start: NaiveDateTime,
    /// Last instant inside the window.
    pub end: NaiveDateTime,
}

impl DateWindow {
    /// Builds the window covering whole days from `first` through `last`.
    #[must_use]
    pub fn spanning(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: day_start(first),
            end: day_end(last),
        }
    }

    /// Returns true if the given instant falls within this window.
    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }
}

fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn day_end(date: NaiveDate) -> NaiveDateTime {
    day_start(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// A reporting period selection.
///
/// Resolution works in naive local time. The caller supplies "now", so
/// the same selection resolves identically wherever it is evaluated, and
/// resolution never touches a clock itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// The calendar day of `now`.
    Daily,
    /// The last full Monday-to-Sunday week before the current one.
    Weekly,
    /// The previous calendar month.
    LastMonth,
    /// January 1st of the current year through `now` (year to date).
    Yearly,
    /// A caller-supplied date range, inclusive on both ends.
    Custom {
        /// First day of the range.
        start: Option<NaiveDate>,
        /// Last day of the range; covered through end of day.
        end: Option<NaiveDate>,
    },
}

impl ReportPeriod {
    /// Resolves this period to a concrete window, relative to `now`.
    ///
    /// Returns `None` when a custom range is missing a bound; reports
    /// degrade to an empty result rather than erroring. All other
    /// periods always resolve.
    #[must_use]
    pub fn resolve(&self, now: NaiveDateTime) -> Option<DateWindow> {
        let today = now.date();
        match self {
            Self::Daily => Some(DateWindow::spanning(today, today)),
            Self::Weekly => {
                // Sunday counts as day seven of the week it ends.
                let days_into_week = i64::from(today.weekday().num_days_from_monday());
                let monday_this_week = today - Duration::days(days_into_week);
                let start = monday_this_week - Duration::days(7);
                Some(DateWindow::spanning(start, start + Duration::days(6)))
            }
            Self::LastMonth => {
                let first_of_current = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
                let last_of_previous = first_of_current.pred_opt()?;
                let first_of_previous =
                    NaiveDate::from_ymd_opt(last_of_previous.year(), last_of_previous.month(), 1)?;
                Some(DateWindow::spanning(first_of_previous, last_of_previous))
            }
            Self::Yearly => {
                let january_first = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;
                Some(DateWindow {
                    start: day_start(january_first),
                    end: day_end(today),
                })
            }
            Self::Custom { start, end } => {
                let first = (*start)?;
                let last = (*end)?;
                Some(DateWindow::spanning(first, last))
            }
        }
    }
}
