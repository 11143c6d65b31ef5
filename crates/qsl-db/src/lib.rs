//! QSL Log Database Layer
//!
//! This crate provides the persistence layer for QSL Log: user identity
//! records and contact records, stored in SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
