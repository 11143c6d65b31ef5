//! QSL Log Authentication and Authorization
//!
//! This crate provides password hashing, JWT session tokens carried in a
//! signed cookie or bearer header, signup/login, and the ownership check
//! that scopes every contact record to the user who created it.

pub mod cookie;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod service;
pub mod store;

pub use cookie::SessionCookie;
pub use error::AuthError;
pub use jwt::{Claims, TokenIssuer};
pub use middleware::{Principal, SessionKeys, require_session};
pub use ownership::{Owned, ResourceLoader, authorize};
pub use password::PasswordHasher;
pub use service::AuthService;
pub use store::CredentialStore;
