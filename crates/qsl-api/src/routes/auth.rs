//! Signup, login and session routes

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use qsl_auth::Principal;
use qsl_db::User;
use tracing::debug;

use super::AppJson;
use super::types::{LoginRequest, LoginResponse, SignupRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /auth/signup
///
/// Creates the account only; the caller still has to log in.
async fn signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> Result<Json<User>, ApiError> {
    let (callsign, email, password) = request.fields()?;
    let user = state.auth.signup(callsign, email, password).await?;

    Ok(Json(user))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (callsign, password) = request.credentials()?;
    let principal = state.auth.login(callsign, password).await?;
    let token = state.tokens.issue(&principal)?;

    debug!("Issued session for {}", principal.callsign);

    Ok((
        [(header::SET_COOKIE, state.cookie.set_cookie(&token))],
        Json(LoginResponse { token }),
    ))
}

/// POST /auth/logout
///
/// Clears the session cookie. Bearer tokens stay valid until they expire.
async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    [(header::SET_COOKIE, state.cookie.clear_cookie())]
}

/// GET /auth/me
async fn me(principal: Principal, State(state): State<AppState>) -> Result<Json<User>, ApiError> {
    let user = state.auth.current_user(&principal).await?;
    Ok(Json(user))
}

/// Routes reachable without a session
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Routes that need the session middleware
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}
