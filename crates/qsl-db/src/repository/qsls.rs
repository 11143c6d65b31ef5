//! QSL (contact record) operations

use chrono::Utc;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NewQsl, Qsl, UpdateQsl};
use crate::repository::Database;

const QSL_COLUMNS: &str = "id, owner_id, own_callsign, qsl_callsign, frequency_khz, modulation, \
     from_time, to_time, own_locator, qsl_locator, rst, comments, created_at, updated_at";

impl Database {
    // ==================== QSL Operations ====================

    /// Insert a new QSL
    pub async fn insert_qsl(&self, qsl: NewQsl) -> Result<Qsl, DbError> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO qsls (id, owner_id, own_callsign, qsl_callsign, frequency_khz, modulation,
                              from_time, to_time, own_locator, qsl_locator, rst, comments,
                              created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&qsl.owner_id)
        .bind(&qsl.own_callsign)
        .bind(&qsl.qsl_callsign)
        .bind(qsl.frequency_khz)
        .bind(&qsl.modulation)
        .bind(qsl.from_time.to_rfc3339())
        .bind(qsl.to_time.map(|t| t.to_rfc3339()))
        .bind(&qsl.own_locator)
        .bind(&qsl.qsl_locator)
        .bind(qsl.rst)
        .bind(&qsl.comments)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Qsl {
            id,
            owner_id: qsl.owner_id,
            own_callsign: qsl.own_callsign,
            qsl_callsign: qsl.qsl_callsign,
            frequency_khz: qsl.frequency_khz,
            modulation: qsl.modulation,
            from_time: qsl.from_time,
            to_time: qsl.to_time,
            own_locator: qsl.own_locator,
            qsl_locator: qsl.qsl_locator,
            rst: qsl.rst,
            comments: qsl.comments,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a QSL by ID
    pub async fn get_qsl(&self, id: &str) -> Result<Option<Qsl>, DbError> {
        let sql = format!("SELECT {} FROM qsls WHERE id = ?", QSL_COLUMNS);
        let result = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Qsl::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List the QSLs of one owner, most recent contact first
    pub async fn list_qsls_by_owner(&self, owner_id: &str) -> Result<Vec<Qsl>, DbError> {
        let sql = format!(
            "SELECT {} FROM qsls WHERE owner_id = ? ORDER BY from_time DESC, rowid DESC",
            QSL_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Qsl::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update and return the stored result
    pub async fn update_qsl(&self, id: &str, update: UpdateQsl) -> Result<Option<Qsl>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE qsls
            SET own_callsign = COALESCE(?, own_callsign),
                qsl_callsign = COALESCE(?, qsl_callsign),
                frequency_khz = COALESCE(?, frequency_khz),
                modulation = COALESCE(?, modulation),
                from_time = COALESCE(?, from_time),
                to_time = COALESCE(?, to_time),
                own_locator = COALESCE(?, own_locator),
                qsl_locator = COALESCE(?, qsl_locator),
                rst = COALESCE(?, rst),
                comments = COALESCE(?, comments),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.own_callsign)
        .bind(update.qsl_callsign)
        .bind(update.frequency_khz)
        .bind(update.modulation)
        .bind(update.from_time.map(|t| t.to_rfc3339()))
        .bind(update.to_time.map(|t| t.to_rfc3339()))
        .bind(update.own_locator)
        .bind(update.qsl_locator)
        .bind(update.rst)
        .bind(update.comments)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_qsl(id).await
    }

    /// Delete a QSL
    pub async fn delete_qsl(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM qsls WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
