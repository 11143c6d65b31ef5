//! Credential store abstraction

use async_trait::async_trait;
use qsl_db::{Database, DbError, NewUser, User};

/// Persistence for user identity records
///
/// Implementations must enforce callsign and email uniqueness atomically on
/// `create` and report a violation as `DbError::Duplicate`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user holding either the callsign or the email
    async fn find_by_callsign_or_email(
        &self,
        callsign: &str,
        email: &str,
    ) -> Result<Option<User>, DbError>;

    /// Find a user by normalized callsign
    async fn find_by_callsign(&self, callsign: &str) -> Result<Option<User>, DbError>;

    /// Find a user by id
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DbError>;

    /// Persist a new user
    async fn create(&self, user: NewUser) -> Result<User, DbError>;
}

#[async_trait]
impl CredentialStore for Database {
    async fn find_by_callsign_or_email(
        &self,
        callsign: &str,
        email: &str,
    ) -> Result<Option<User>, DbError> {
        self.find_user_by_callsign_or_email(callsign, email).await
    }

    async fn find_by_callsign(&self, callsign: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_callsign(callsign).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DbError> {
        self.get_user_by_id(id).await
    }

    async fn create(&self, user: NewUser) -> Result<User, DbError> {
        self.insert_user(user).await
    }
}
