//! Revenue report routes.
//!
//! Handlers supply the wall clock as naive local time; period
//! resolution, filtering, and summation stay in the core and are
//! deterministic for a given "now".

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use tamira_core::reporting::{ReportPeriod, RevenueService};
use tamira_db::RepairRepository;

/// Query parameters for the revenue report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RevenueQuery {
    /// Period selector: daily, weekly, last_month, yearly, or custom.
    pub period: Option<String>,
    /// Restrict to a single customer.
    pub customer_id: Option<i64>,
    /// First day of a custom range, `YYYY-MM-DD`.
    pub start: Option<String>,
    /// Last day of a custom range, `YYYY-MM-DD`.
    pub end: Option<String>,
    /// Restrict to repairs with this status.
    pub status: Option<String>,
}

/// Creates the report router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/revenue", get(revenue))
        .route("/reports/today", get(today))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Maps the query to a core period. Absent defaults to daily; a custom
/// range carries whatever bounds parsed, and the resolver turns missing
/// bounds into an empty report rather than an error.
fn parse_period(query: &RevenueQuery) -> Option<ReportPeriod> {
    match query.period.as_deref().unwrap_or("daily") {
        "daily" => Some(ReportPeriod::Daily),
        "weekly" => Some(ReportPeriod::Weekly),
        "last_month" => Some(ReportPeriod::LastMonth),
        "yearly" => Some(ReportPeriod::Yearly),
        "custom" => Some(ReportPeriod::Custom {
            start: query.start.as_deref().and_then(parse_date),
            end: query.end.as_deref().and_then(parse_date),
        }),
        _ => None,
    }
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

/// GET /reports/revenue - Revenue over a period, optionally restricted
/// to one customer and/or one status.
async fn revenue(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RevenueQuery>,
) -> impl IntoResponse {
    let Some(period) = parse_period(&query) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_period",
                "message": "period must be one of daily, weekly, last_month, yearly, custom"
            })),
        )
            .into_response();
    };

    let repo = RepairRepository::new((*state.db).clone());
    let records = match repo
        .list_records_for_user(auth.user_id(), query.status.as_deref())
        .await
    {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to load repairs for revenue report");
            return internal_error("Failed to generate revenue report");
        }
    };

    let now = chrono::Local::now().naive_local();
    let report = RevenueService::generate(records, &period, now, query.customer_id);

    Json(json!({
        "period": report.period,
        "rows": report.repairs,
        "total": report.total,
    }))
    .into_response()
}

/// GET /reports/today - Today's revenue over completed repairs.
async fn today(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = RepairRepository::new((*state.db).clone());
    let records = match repo
        .list_records_for_user(auth.user_id(), Some("completed"))
        .await
    {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "Failed to load repairs for today's revenue");
            return internal_error("Failed to fetch today's revenue");
        }
    };

    let now = chrono::Local::now().naive_local();
    let report = RevenueService::generate(records, &ReportPeriod::Daily, now, None);

    Json(json!({
        "total": report.total,
        "count": report.repairs.len(),
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(period: Option<&str>) -> RevenueQuery {
        RevenueQuery {
            period: period.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_period_defaults_to_daily() {
        assert_eq!(parse_period(&query(None)), Some(ReportPeriod::Daily));
        assert_eq!(parse_period(&query(Some("daily"))), Some(ReportPeriod::Daily));
        assert_eq!(parse_period(&query(Some("weekly"))), Some(ReportPeriod::Weekly));
        assert_eq!(
            parse_period(&query(Some("last_month"))),
            Some(ReportPeriod::LastMonth)
        );
        assert_eq!(parse_period(&query(Some("yearly"))), Some(ReportPeriod::Yearly));
    }

    #[test]
    fn test_parse_period_rejects_unknown() {
        assert_eq!(parse_period(&query(Some("fortnightly"))), None);
        assert_eq!(parse_period(&query(Some("DAILY"))), None);
    }

    #[test]
    fn test_parse_period_custom_carries_parsed_bounds() {
        let q = RevenueQuery {
            period: Some("custom".to_string()),
            start: Some("2026-01-01".to_string()),
            end: Some("not-a-date".to_string()),
            ..Default::default()
        };

        let Some(ReportPeriod::Custom { start, end }) = parse_period(&q) else {
            panic!("custom period should parse");
        };
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(end, None);
    }
}
