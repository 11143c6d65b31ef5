//! QSL routes
//!
//! Every route here sits behind the session middleware. Routes with an
//! `{id}` take an [`OwnedQsl`], so handlers only ever see records owned by
//! the caller.

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
    routing::get,
};
use qsl_auth::{AuthError, Principal, authorize};
use qsl_db::Qsl;
use tracing::{debug, info};

use super::AppJson;
use super::types::QslRequest;
use crate::error::ApiError;
use crate::state::AppState;

// ==================== Ownership Extractor ====================

/// A QSL loaded from the `{id}` path segment and owned by the caller
pub struct OwnedQsl(pub Qsl);

impl<S> FromRequestParts<S> for OwnedQsl
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthError::InvalidIdentifier)?;

        let principal = Principal::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        let qsl = authorize(&app_state.db, &id, &principal).await?;
        Ok(OwnedQsl(qsl))
    }
}

// ==================== QSL Routes ====================

/// GET /qsl
async fn list_qsls(
    principal: Principal,
    State(state): State<AppState>,
) -> Result<Json<Vec<Qsl>>, ApiError> {
    let qsls = state.db.list_qsls_by_owner(&principal.id).await?;
    Ok(Json(qsls))
}

/// POST /qsl
async fn create_qsl(
    principal: Principal,
    State(state): State<AppState>,
    AppJson(request): AppJson<QslRequest>,
) -> Result<Json<Qsl>, ApiError> {
    let new_qsl = request.into_new(&principal.id)?;
    let qsl = state.db.insert_qsl(new_qsl).await?;

    info!("{} logged QSL {} with {}", principal.callsign, qsl.id, qsl.qsl_callsign);

    Ok(Json(qsl))
}

/// GET /qsl/{id}
async fn get_qsl(OwnedQsl(qsl): OwnedQsl) -> Json<Qsl> {
    Json(qsl)
}

/// PUT /qsl/{id}
async fn update_qsl(
    State(state): State<AppState>,
    OwnedQsl(qsl): OwnedQsl,
    AppJson(request): AppJson<QslRequest>,
) -> Result<Json<Qsl>, ApiError> {
    let update = request.into_update()?;

    debug!("Updating QSL {}", qsl.id);

    let updated = state
        .db
        .update_qsl(&qsl.id, update)
        .await?
        .ok_or(AuthError::NotFound)?;

    Ok(Json(updated))
}

/// DELETE /qsl/{id}
async fn delete_qsl(
    State(state): State<AppState>,
    OwnedQsl(qsl): OwnedQsl,
) -> Result<StatusCode, ApiError> {
    if !state.db.delete_qsl(&qsl.id).await? {
        return Err(AuthError::NotFound.into());
    }

    info!("Deleted QSL {}", qsl.id);

    Ok(StatusCode::OK)
}

/// Create QSL routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/qsl", get(list_qsls).post(create_qsl))
        .route("/qsl/{id}", get(get_qsl).put(update_qsl).delete(delete_qsl))
}
