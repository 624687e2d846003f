//! User routes: listing, profile updates, and the dashboard overview.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

use crate::AppState;
use crate::middleware::auth::AuthUser;
use tamira_db::entities::users;
use tamira_db::{StatsRepository, UserRepository};
use tamira_shared::auth::UpdateProfileRequest;

/// Creates the user router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/profile", put(update_profile))
        .route("/users/stats/overview", get(stats_overview))
}

fn user_row(user: &users::Model) -> serde_json::Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "name": user.name,
        "created_at": user.created_at,
    })
}

/// GET /users - List all users.
async fn list_users(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.list().await {
        Ok(users) => {
            let rows: Vec<serde_json::Value> = users.iter().map(user_row).collect();
            Json(rows).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list users");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to fetch users"
                })),
            )
                .into_response()
        }
    }
}

/// GET /users/{id} - A single user.
async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(id).await {
        Ok(Some(user)) => Json(user_row(&user)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "User not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to fetch user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to fetch user"
                })),
            )
                .into_response()
        }
    }
}

/// PUT /users/profile - Update the authenticated user's display name.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
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

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.update_name(auth.user_id(), &payload.name).await {
        Ok(Some(user)) => {
            info!(user_id = user.id, "Profile updated");
            Json(json!({
                "message": "Profile updated successfully",
                "user": user_row(&user),
            }))
            .into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "User not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update profile");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to update profile"
                })),
            )
                .into_response()
        }
    }
}

/// GET /users/stats/overview - Counters for the authenticated user.
async fn stats_overview(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let stats_repo = StatsRepository::new((*state.db).clone());

    match stats_repo.overview(auth.user_id()).await {
        Ok(overview) => Json(overview).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute stats overview");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to fetch stats"
                })),
            )
                .into_response()
        }
    }
}
