//! JWT session token issuing and verification

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;
use crate::middleware::Principal;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Normalized callsign
    pub callsign: String,
    /// Expiration time (Unix epoch milliseconds)
    pub expiration: i64,
}

/// Signs and verifies session tokens
///
/// The token lifetime is fixed at construction; callers cannot choose it
/// per token.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    duration_ms: i64,
}

impl TokenIssuer {
    /// Create a new token issuer
    pub fn new(secret: &str, duration: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiration lives in the custom `expiration` claim and is checked below
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            duration_ms: i64::try_from(duration.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Token lifetime
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms.max(0) as u64)
    }

    /// Issue a token for a principal
    pub fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        self.issue_at(principal, Utc::now().timestamp_millis())
    }

    /// Issue a token as if the current time were `now_ms`
    pub fn issue_at(&self, principal: &Principal, now_ms: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: principal.id.clone(),
            callsign: principal.callsign.clone(),
            expiration: now_ms.saturating_add(self.duration_ms),
        };

        debug!("Issuing token for {}", principal.callsign);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Verify a token and return its principal
    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        self.verify_at(token, Utc::now().timestamp_millis())
    }

    /// Verify a token as if the current time were `now_ms`
    pub fn verify_at(&self, token: &str, now_ms: i64) -> Result<Principal, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Rejected token: {}", e);
                AuthError::TokenInvalid
            })?;

        if token_data.claims.expiration < now_ms {
            return Err(AuthError::TokenExpired);
        }

        Ok(Principal::from_claims(&token_data.claims))
    }
}
