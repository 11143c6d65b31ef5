//! User operations

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NewUser, User};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// A callsign or email that is already taken yields `DbError::Duplicate`,
    /// including when a concurrent insert wins the race.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO users (id, callsign, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.callsign)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, format!("User '{}' already exists", user.callsign)))?;

        Ok(User {
            id,
            callsign: user.callsign,
            email: user.email,
            password_hash: user.password_hash,
            qsl_refs: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by callsign (exact match, callers normalize)
    pub async fn get_user_by_callsign(&self, callsign: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, callsign, email, password_hash, created_at, updated_at
            FROM users
            WHERE callsign = ?
            "#,
        )
        .bind(callsign)
        .fetch_optional(&self.pool)
        .await?;

        self.with_qsl_refs(result).await
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, callsign, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_qsl_refs(result).await
    }

    /// Find a user holding either the callsign or the email
    pub async fn find_user_by_callsign_or_email(
        &self,
        callsign: &str,
        email: &str,
    ) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, callsign, email, password_hash, created_at, updated_at
            FROM users
            WHERE callsign = ? OR email = ?
            LIMIT 1
            "#,
        )
        .bind(callsign)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Ids of the QSLs owned by a user, in creation order
    pub async fn list_qsl_refs(&self, owner_id: &str) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id FROM qsls
            WHERE owner_id = ?
            ORDER BY created_at, rowid
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get("id").map_err(DbError::from))
            .collect()
    }

    async fn with_qsl_refs(
        &self,
        row: Option<sqlx::sqlite::SqliteRow>,
    ) -> Result<Option<User>, DbError> {
        let Some(row) = row else {
            return Ok(None);
        };
        let mut user = User::try_from(&row)?;
        user.qsl_refs = self.list_qsl_refs(&user.id).await?;
        Ok(Some(user))
    }
}
