//! Signup and login

use std::sync::Arc;

use qsl_db::{DbError, NewUser, User};
use tracing::{debug, info};

use crate::error::AuthError;
use crate::middleware::Principal;
use crate::password::PasswordHasher;
use crate::store::CredentialStore;

/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;

/// Account registration and credential checks
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Register a new user
    ///
    /// The password is hashed here, exactly once, right before the record
    /// is persisted.
    pub async fn signup(
        &self,
        callsign: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let callsign = normalize_callsign(callsign);
        let email = normalize_email(email);
        validate_signup(&callsign, &email, password)?;

        debug!("Signing up {} with email {}", callsign, email);

        if self
            .store
            .find_by_callsign_or_email(&callsign, &email)
            .await?
            .is_some()
        {
            debug!("Signup rejected, {} or {} already registered", callsign, email);
            return Err(AuthError::AlreadyRegistered);
        }

        let password_hash = self.hasher.hash_async(password.to_string()).await?;

        let user = self
            .store
            .create(NewUser {
                callsign,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DbError::Duplicate(_) => AuthError::AlreadyRegistered,
                other => AuthError::Database(other),
            })?;

        info!("{} signed up", user.callsign);
        Ok(user)
    }

    /// Check a callsign/password pair
    pub async fn login(&self, callsign: &str, password: &str) -> Result<Principal, AuthError> {
        if password.len() > MAX_PASSWORD_LENGTH {
            return Err(AuthError::InvalidInput("password".to_string()));
        }
        let callsign = normalize_callsign(callsign);

        debug!("Login attempt for {}", callsign);

        let user = self
            .store
            .find_by_callsign(&callsign)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let valid = self
            .hasher
            .verify_async(password.to_string(), user.password_hash.clone())
            .await?;
        if !valid {
            debug!("Wrong password for {}", callsign);
            return Err(AuthError::InvalidCredentials);
        }

        info!("{} logged in", user.callsign);
        Ok(Principal {
            id: user.id,
            callsign: user.callsign,
            token_expiration: None,
        })
    }

    /// Load the user record behind a principal
    pub async fn current_user(&self, principal: &Principal) -> Result<User, AuthError> {
        self.store
            .find_by_id(&principal.id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

pub fn normalize_callsign(callsign: &str) -> String {
    callsign.trim().to_uppercase()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Collect every invalid signup field into one `InvalidInput`
fn validate_signup(callsign: &str, email: &str, password: &str) -> Result<(), AuthError> {
    let mut invalid = Vec::new();

    if callsign.is_empty() {
        invalid.push("callsign");
    }
    if email.len() > MAX_EMAIL_LENGTH || !is_valid_email(email) {
        invalid.push("email");
    }
    if password.is_empty() || password.len() > MAX_PASSWORD_LENGTH {
        invalid.push("password");
    }

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(AuthError::InvalidInput(invalid.join(",")))
    }
}

/// Structural email check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
