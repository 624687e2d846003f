//! Repair routes: CRUD, search, and item handling.
//!
//! Money fields in payloads are advisory at best: every derived total is
//! recomputed by the repository through the invoice calculator, so a
//! client cannot persist totals of its own making.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::middleware::auth::AuthUser;
use tamira_core::invoice::LineItemInput;
use tamira_core::repair::RepairStatus;
use tamira_db::RepairRepository;
use tamira_db::repositories::{CreateRepairInput, RepairError, UpdateRepairInput};

/// Repair create payload. Required fields are checked by hand so their
/// absence maps to a 400 in the uniform error shape.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRepairRequest {
    /// Customer the repair belongs to.
    #[serde(default)]
    pub customer_id: Option<i64>,
    /// Car model.
    #[serde(default)]
    pub car_model: Option<String>,
    /// Car year.
    #[serde(default)]
    pub car_year: Option<i32>,
    /// License plate.
    #[serde(default)]
    pub license_plate: Option<String>,
    /// Calendar date of the repair, `YYYY-MM-DD`.
    #[serde(default)]
    pub repair_date: Option<String>,
    /// Description of the work.
    #[serde(default)]
    pub description: Option<String>,
    /// Tax rate as a percentage, 0 when not supplied.
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    /// Status string, `pending` when not supplied.
    #[serde(default)]
    pub status: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Line items.
    #[serde(default)]
    pub items: Vec<LineItemInput>,
}

/// Repair update payload: partial over a whitelist of fields.
///
/// For nullable columns the double option distinguishes an absent key
/// (leave the field alone) from an explicit `null` (clear it).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRepairRequest {
    /// New owning customer.
    pub customer_id: Option<i64>,
    /// Car model.
    #[serde(deserialize_with = "double_option")]
    pub car_model: Option<Option<String>>,
    /// Car year.
    #[serde(deserialize_with = "double_option")]
    pub car_year: Option<Option<i32>>,
    /// License plate.
    #[serde(deserialize_with = "double_option")]
    pub license_plate: Option<Option<String>>,
    /// Repair date, `YYYY-MM-DD`.
    pub repair_date: Option<String>,
    /// Description of the work.
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Status string.
    pub status: Option<String>,
    /// Free-form notes.
    #[serde(deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    /// New tax rate; triggers a totals recompute.
    pub tax_rate: Option<Decimal>,
    /// Replacement item set; triggers a totals recompute.
    pub items: Option<Vec<LineItemInput>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Creates the repair router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/repairs", get(list_repairs).post(create_repair))
        .route(
            "/repairs/{id}",
            get(get_repair).put(update_repair).delete(delete_repair),
        )
        .route("/repairs/search/{query}", get(search_repairs))
}

fn validation_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "validation_failed",
            "message": message
        })),
    )
        .into_response()
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

fn repair_error_response(e: &RepairError, context: &str) -> Response {
    match e {
        RepairError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Repair not found"
            })),
        )
            .into_response(),
        RepairError::CustomerNotFound(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_customer",
                "message": "Invalid customer"
            })),
        )
            .into_response(),
        RepairError::InvalidRepairDate(_) => {
            validation_error("repair_date must be a YYYY-MM-DD date")
        }
        RepairError::EmptyUpdate => validation_error("No fields provided for update"),
        RepairError::Database(db_err) => {
            error!(error = %db_err, "{context}");
            internal_error(context)
        }
    }
}

/// Rejects items the calculator would happily price but the API should
/// never accept: blank descriptions, non-positive quantities, negative
/// prices.
fn validate_items(items: &[LineItemInput]) -> Result<(), &'static str> {
    for item in items {
        if item.description.trim().is_empty() {
            return Err("Item description is required");
        }
        if item.quantity <= Decimal::ZERO {
            return Err("Item quantity must be positive");
        }
        if item.unit_price < Decimal::ZERO {
            return Err("Item unit price cannot be negative");
        }
    }
    Ok(())
}

fn validate_status(status: &str) -> Result<(), &'static str> {
    status
        .parse::<RepairStatus>()
        .map(|_| ())
        .map_err(|_| "status must be one of pending, in_progress, completed, cancelled")
}

/// GET /repairs - The user's repairs joined with customer name and phone.
async fn list_repairs(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = RepairRepository::new((*state.db).clone());

    match repo.list_for_user(auth.user_id()).await {
        Ok(repairs) => Json(repairs).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list repairs");
            internal_error("Failed to fetch repairs")
        }
    }
}

/// POST /repairs - Create a repair; totals computed server-side.
async fn create_repair(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateRepairRequest>,
) -> impl IntoResponse {
    let (Some(customer_id), Some(repair_date)) = (payload.customer_id, payload.repair_date) else {
        return validation_error("Customer and repair date are required");
    };
    if let Err(message) = validate_items(&payload.items) {
        return validation_error(message);
    }
    if payload.tax_rate.is_some_and(|rate| rate < Decimal::ZERO) {
        return validation_error("Tax rate cannot be negative");
    }
    if let Some(ref status) = payload.status {
        if let Err(message) = validate_status(status) {
            return validation_error(message);
        }
    }

    let input = CreateRepairInput {
        customer_id,
        car_model: payload.car_model,
        car_year: payload.car_year,
        license_plate: payload.license_plate,
        repair_date,
        description: payload.description,
        tax_rate: payload.tax_rate.unwrap_or(Decimal::ZERO),
        status: payload.status,
        notes: payload.notes,
        items: payload.items,
    };

    let repo = RepairRepository::new((*state.db).clone());

    match repo.create(input, auth.user_id()).await {
        Ok(repair) => {
            info!(
                repair_id = repair.repair.id,
                user_id = auth.user_id(),
                grand_total = %repair.repair.grand_total,
                "Repair created"
            );
            (StatusCode::CREATED, Json(repair)).into_response()
        }
        Err(e) => repair_error_response(&e, "Failed to create repair"),
    }
}

/// GET /repairs/{id} - A repair with its items.
async fn get_repair(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let repo = RepairRepository::new((*state.db).clone());

    match repo.find_with_items(id, auth.user_id()).await {
        Ok(Some(repair)) => Json(repair).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Repair not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch repair");
            internal_error("Failed to fetch repair")
        }
    }
}

/// PUT /repairs/{id} - Partial update; item or tax rate changes replace
/// the item set and recompute all derived totals together.
async fn update_repair(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRepairRequest>,
) -> impl IntoResponse {
    if let Some(ref items) = payload.items {
        if let Err(message) = validate_items(items) {
            return validation_error(message);
        }
    }
    if payload.tax_rate.is_some_and(|rate| rate < Decimal::ZERO) {
        return validation_error("Tax rate cannot be negative");
    }
    if let Some(ref status) = payload.status {
        if let Err(message) = validate_status(status) {
            return validation_error(message);
        }
    }

    let input = UpdateRepairInput {
        customer_id: payload.customer_id,
        car_model: payload.car_model,
        car_year: payload.car_year,
        license_plate: payload.license_plate,
        repair_date: payload.repair_date,
        description: payload.description,
        status: payload.status,
        notes: payload.notes,
        tax_rate: payload.tax_rate,
        items: payload.items,
    };

    let repo = RepairRepository::new((*state.db).clone());

    match repo.update(id, auth.user_id(), input).await {
        Ok(repair) => {
            info!(
                repair_id = repair.repair.id,
                grand_total = %repair.repair.grand_total,
                "Repair updated"
            );
            Json(repair).into_response()
        }
        Err(e) => repair_error_response(&e, "Failed to update repair"),
    }
}

/// DELETE /repairs/{id} - Delete a repair and its items.
async fn delete_repair(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let repo = RepairRepository::new((*state.db).clone());

    match repo.delete(id, auth.user_id()).await {
        Ok(true) => {
            info!(repair_id = id, "Repair deleted");
            Json(json!({ "message": "Repair deleted successfully" })).into_response()
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Repair not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to delete repair");
            internal_error("Failed to delete repair")
        }
    }
}

/// GET /repairs/search/{query} - LIKE match on customer name, car model,
/// license plate, description.
async fn search_repairs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(query): Path<String>,
) -> impl IntoResponse {
    let repo = RepairRepository::new((*state.db).clone());

    match repo.search(auth.user_id(), &query).await {
        Ok(repairs) => Json(repairs).into_response(),
        Err(e) => {
            error!(error = %e, "Repair search failed");
            internal_error("Failed to search repairs")
        }
    }
}
