//! Session middleware for Axum

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::cookie::SessionCookie;
use crate::error::AuthError;
use crate::jwt::{Claims, TokenIssuer};

/// Authenticated identity of the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub callsign: String,
    /// Expiration of the token this principal came from (epoch millis);
    /// `None` until a token has been issued
    pub token_expiration: Option<i64>,
}

impl Principal {
    /// Create from JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            callsign: claims.callsign.clone(),
            token_expiration: Some(claims.expiration),
        }
    }
}

/// Everything the session gate needs to check a credential
#[derive(Clone)]
pub struct SessionKeys {
    pub tokens: Arc<TokenIssuer>,
    pub cookie: Arc<SessionCookie>,
}

impl SessionKeys {
    pub fn new(tokens: Arc<TokenIssuer>, cookie: Arc<SessionCookie>) -> Self {
        Self { tokens, cookie }
    }

    /// Resolve the principal carried by a request's headers
    ///
    /// An `Authorization: Bearer` header wins over the session cookie. A
    /// cookie with a bad signature is treated like a bad token.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        if let Some(header) = headers.get(AUTHORIZATION) {
            let header = header.to_str().map_err(|_| AuthError::TokenInvalid)?;
            let token = extract_bearer_token(header)?;
            return self.tokens.verify(token);
        }

        if let Some(signed) = self.cookie.find(headers) {
            let token = self.cookie.unsign(signed).ok_or(AuthError::TokenInvalid)?;
            return self.tokens.verify(token);
        }

        Err(AuthError::Unauthenticated)
    }
}

/// Extract bearer token from authorization header
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::TokenInvalid)
}

/// Session middleware
///
/// Rejects requests without a valid session credential and adds the
/// `Principal` to request extensions otherwise. Performs no database access.
pub async fn require_session(
    State(keys): State<SessionKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let principal = keys.authenticate(request.headers()).inspect_err(|e| {
        debug!("Session rejected for {}: {}", request.uri().path(), e);
    })?;

    debug!("Authenticated principal: {}", principal.callsign);

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Reads the principal attached by [`require_session`]
///
/// Using this extractor on a route that is not behind the session middleware
/// is a wiring bug, so a missing principal panics instead of returning 401.
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Principal>() {
            Some(principal) => Ok(principal.clone()),
            None => {
                error!("Principal not populated for {}", parts.uri.path());
                panic!("Principal extractor used on a route without require_session");
            }
        }
    }
}
