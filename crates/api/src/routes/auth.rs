//! Authentication routes for register, login, logout, and session status.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

use crate::AppState;
use crate::middleware::auth::{AuthUser, resolve_session};
use tamira_core::auth::{hash_password, verify_password};
use tamira_db::entities::users;
use tamira_db::{SessionRepository, UserRepository};
use tamira_shared::auth::{AuthStatus, LoginRequest, RegisterRequest, UserInfo};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/status", get(status))
}

/// Creates the session-protected auth router.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
    }
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.session.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(state.config.session.ttl_secs))
        .build()
}

fn user_agent(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
}

/// POST /auth/register - Create a user and open a session.
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(payload): Json<RegisterRequest>,
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

    // Check for duplicate username or email
    match user_repo
        .username_or_email_exists(&payload.username, &payload.email)
        .await
    {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "already_exists",
                    "message": "Username or email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking for existing user");
            return internal_error("An error occurred during registration");
        }
    }

    // Hash password
    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("An error occurred during registration");
        }
    };

    // Create user
    let user = match user_repo
        .create(
            &payload.username,
            &payload.email,
            &password_hash,
            payload.name.as_deref(),
        )
        .await
    {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return internal_error("An error occurred during registration");
        }
    };

    info!(user_id = user.id, username = %user.username, "New user registered");

    // Open a session so registration doubles as login
    let (token, _session) = match open_session(&state, user.id, user_agent(&headers)).await {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "Failed to create session");
            return internal_error("An error occurred during registration");
        }
    };

    let jar = jar.add(session_cookie(&state, token));
    (
        jar,
        (
            StatusCode::CREATED,
            Json(json!({
                "user": user_info(&user),
                "message": "Registration successful"
            })),
        ),
    )
        .into_response()
}

/// POST /auth/login - Verify credentials and open a session.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Unknown user and wrong password produce the same response
    let user = match user_repo.find_by_username(&payload.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for unknown user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login");
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = user.id, "Failed login attempt");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login");
        }
    }

    let (token, _session) = match open_session(&state, user.id, user_agent(&headers)).await {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "Failed to create session");
            return internal_error("An error occurred during login");
        }
    };

    info!(user_id = user.id, "User logged in");

    let jar = jar.add(session_cookie(&state, token));
    (
        jar,
        (
            StatusCode::OK,
            Json(json!({
                "user": user_info(&user),
                "message": "Login successful"
            })),
        ),
    )
        .into_response()
}

/// POST /auth/logout - Revoke the current session and clear the cookie.
async fn logout(State(state): State<AppState>, jar: CookieJar, auth: AuthUser) -> impl IntoResponse {
    let session_repo = SessionRepository::new((*state.db).clone());

    if let Err(e) = session_repo.revoke(auth.session_id()).await {
        error!(error = %e, "Failed to revoke session");
        return internal_error("An error occurred during logout");
    }

    info!(user_id = auth.user_id(), "User logged out");

    let mut removal = Cookie::from(state.config.session.cookie_name.clone());
    removal.set_path("/");
    let jar = jar.remove(removal);

    (
        jar,
        (
            StatusCode::OK,
            Json(json!({ "message": "Logout successful" })),
        ),
    )
        .into_response()
}

/// GET /auth/me - The authenticated user.
async fn me(auth: AuthUser) -> impl IntoResponse {
    Json(json!({ "user": user_info(auth.user()) }))
}

/// GET /auth/status - Session status; unauthenticated is a 200, not a 401.
async fn status(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let status = match resolve_session(&state, &jar).await {
        Some(current) => AuthStatus {
            authenticated: true,
            user: Some(user_info(&current.user)),
        },
        None => AuthStatus {
            authenticated: false,
            user: None,
        },
    };

    Json(status)
}

async fn open_session(
    state: &AppState,
    user_id: i64,
    user_agent: Option<&str>,
) -> Result<(String, tamira_db::entities::sessions::Model), sea_orm::DbErr> {
    let session_repo = SessionRepository::new((*state.db).clone());
    let expires_at = chrono::Utc::now() + chrono::Duration::seconds(state.config.session.ttl_secs);
    session_repo.create(user_id, expires_at, user_agent).await
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid username or password"
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
