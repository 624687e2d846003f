//! Customer routes: CRUD and search, scoped to the authenticated user.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use tamira_db::repositories::CustomerInput;
use tamira_db::CustomerRepository;

/// Customer create/update payload. Updates replace every field, so the
/// same shape serves both.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerPayload {
    /// Customer name.
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Company name.
    #[serde(default)]
    pub company: Option<String>,
    /// Status, `active` when not supplied.
    #[serde(default)]
    pub status: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CustomerPayload> for CustomerInput {
    fn from(payload: CustomerPayload) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            company: payload.company,
            status: payload.status,
            notes: payload.notes,
        }
    }
}

/// Creates the customer router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/customers/search/{query}", get(search_customers))
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Customer not found"
        })),
    )
        .into_response()
}

fn internal_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

/// GET /customers - The user's customers, newest first.
async fn list_customers(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.list_for_user(auth.user_id()).await {
        Ok(customers) => Json(customers).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list customers");
            internal_error("Failed to fetch customers")
        }
    }
}

/// POST /customers - Create a customer.
async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CustomerPayload>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_failed",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    let repo = CustomerRepository::new((*state.db).clone());

    match repo.create(payload.into(), auth.user_id()).await {
        Ok(customer) => {
            info!(customer_id = customer.id, user_id = auth.user_id(), "Customer created");
            (StatusCode::CREATED, Json(customer)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create customer");
            internal_error("Failed to create customer")
        }
    }
}

/// GET /customers/{id} - A single customer.
async fn get_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.find_for_user(id, auth.user_id()).await {
        Ok(Some(customer)) => Json(customer).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch customer");
            internal_error("Failed to fetch customer")
        }
    }
}

/// PUT /customers/{id} - Replace a customer's fields.
async fn update_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerPayload>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_failed",
                "message": e.to_string()
            })),
        )
            .into_response();
    }

    let repo = CustomerRepository::new((*state.db).clone());

    match repo.update(id, auth.user_id(), payload.into()).await {
        Ok(Some(customer)) => {
            info!(customer_id = customer.id, "Customer updated");
            Json(customer).into_response()
        }
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update customer");
            internal_error("Failed to update customer")
        }
    }
}

/// DELETE /customers/{id} - Delete a customer.
async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.delete(id, auth.user_id()).await {
        Ok(true) => {
            info!(customer_id = id, "Customer deleted");
            Json(json!({ "message": "Customer deleted successfully" })).into_response()
        }
        Ok(false) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete customer");
            internal_error("Failed to delete customer")
        }
    }
}

/// GET /customers/search/{query} - LIKE match on name, email, phone, company.
async fn search_customers(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(query): Path<String>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.search(auth.user_id(), &query).await {
        Ok(customers) => Json(customers).into_response(),
        Err(e) => {
            error!(error = %e, "Customer search failed");
            internal_error("Failed to search customers")
        }
    }
}
