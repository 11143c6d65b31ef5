//! Application state

use qsl_auth::{AuthService, SessionCookie, SessionKeys, TokenIssuer};
use qsl_db::Database;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthService,
    pub tokens: Arc<TokenIssuer>,
    pub cookie: Arc<SessionCookie>,
}

impl AppState {
    pub fn new(
        db: Database,
        auth: AuthService,
        tokens: Arc<TokenIssuer>,
        cookie: Arc<SessionCookie>,
    ) -> Self {
        Self {
            db,
            auth,
            tokens,
            cookie,
        }
    }

    /// Keys used by the session middleware
    pub fn session_keys(&self) -> SessionKeys {
        SessionKeys::new(self.tokens.clone(), self.cookie.clone())
    }
}
