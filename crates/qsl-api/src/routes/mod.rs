//! API routes

mod auth;
mod health;
mod qsl;
pub mod types;

use axum::{Router, extract::FromRequest, middleware};
use qsl_auth::require_session;

use crate::error::ApiError;
use crate::state::AppState;

pub use qsl::OwnedQsl;

/// JSON body extractor that rejects with the API's `{ err }` shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth::protected_routes())
        .merge(qsl::routes())
        .route_layer(middleware::from_fn_with_state(
            state.session_keys(),
            require_session,
        ));

    Router::new()
        // Health check
        .merge(health::routes())
        // Signup, login, logout
        .merge(auth::routes())
        // Everything below requires a session
        .merge(protected)
        .with_state(state)
}
