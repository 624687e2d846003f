//! Session authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::error;

use crate::AppState;
use tamira_db::entities::users;
use tamira_db::{SessionRepository, UserRepository};

/// The authenticated principal resolved from a session cookie.
///
/// Carries the session row id so logout can revoke exactly the session
/// that authenticated the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user the session belongs to.
    pub user: users::Model,
    /// ID of the session row that authenticated this request.
    pub session_id: i64,
}

/// Resolves the session cookie to its user, if the cookie names a live
/// (unexpired, unrevoked) session.
///
/// Database failures are logged and treated as "no session"; callers
/// see them as an unauthenticated request.
pub async fn resolve_session(state: &AppState, jar: &CookieJar) -> Option<CurrentUser> {
    let token = jar
        .get(&state.config.session.cookie_name)?
        .value()
        .to_string();

    let session_repo = SessionRepository::new((*state.db).clone());
    let session = match session_repo.find_valid(&token).await {
        Ok(Some(session)) => session,
        Ok(None) => return None,
        Err(e) => {
            error!(error = %e, "Database error resolving session");
            return None;
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.find_by_id(session.user_id).await {
        Ok(Some(user)) => Some(CurrentUser {
            user,
            session_id: session.id,
        }),
        Ok(None) => None,
        Err(e) => {
            error!(error = %e, "Database error loading session user");
            None
        }
    }
}

/// Authentication middleware that validates the session cookie.
///
/// This middleware:
/// 1. Reads the session cookie from the request
/// 2. Resolves it against the sessions table
/// 3. Stores the authenticated user in request extensions for handlers
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_session(&state, &jar).await {
        Some(current) => {
            request.extensions_mut().insert(current);
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "authentication_required",
                "message": "A valid session is required"
            })),
        )
            .into_response(),
    }
}

/// Extractor for the authenticated user.
///
/// Use this in handlers behind the auth middleware:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user_id = auth.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl AuthUser {
    /// Returns the authenticated user's ID.
    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.0.user.id
    }

    /// Returns the ID of the session that authenticated this request.
    #[must_use]
    pub fn session_id(&self) -> i64 {
        self.0.session_id
    }

    /// Returns the authenticated user row.
    #[must_use]
    pub fn user(&self) -> &users::Model {
        &self.0.user
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "authentication_required",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}
