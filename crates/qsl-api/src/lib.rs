//! QSL Log REST API
//!
//! This crate provides the Axum-based HTTP API for QSL Log: signup and
//! login, and owner-scoped CRUD for contact records.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
