//! Database models

use crate::utils::{parse_datetime, parse_datetime_or_now};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// User model
///
/// `password_hash` is never serialized; API responses can embed a `User`
/// directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub callsign: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Ids of the QSLs created by this user, oldest first.
    /// Informational only; ownership is decided by `Qsl::owner_id`.
    #[serde(default)]
    pub qsl_refs: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
///
/// Callers normalize `callsign` and `email` and hash the password before
/// building this.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub callsign: String,
    pub email: String,
    pub password_hash: String,
}

/// QSL (contact record) model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Qsl {
    pub id: String,
    /// Id of the user who created this QSL; never changes
    pub owner_id: String,
    pub own_callsign: String,
    pub qsl_callsign: String,
    pub frequency_khz: f64,
    pub modulation: String,
    pub from_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_locator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qsl_locator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rst: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New QSL (for insertion)
#[derive(Debug, Clone)]
pub struct NewQsl {
    pub owner_id: String,
    pub own_callsign: String,
    pub qsl_callsign: String,
    pub frequency_khz: f64,
    pub modulation: String,
    pub from_time: DateTime<Utc>,
    pub to_time: Option<DateTime<Utc>>,
    pub own_locator: Option<String>,
    pub qsl_locator: Option<String>,
    pub rst: Option<i64>,
    pub comments: Option<String>,
}

/// Update QSL (for partial updates)
///
/// `None` leaves the stored value unchanged. Ownership is fixed at
/// creation, so there is no `owner_id` here.
#[derive(Debug, Clone, Default)]
pub struct UpdateQsl {
    pub own_callsign: Option<String>,
    pub qsl_callsign: Option<String>,
    pub frequency_khz: Option<f64>,
    pub modulation: Option<String>,
    pub from_time: Option<DateTime<Utc>>,
    pub to_time: Option<DateTime<Utc>>,
    pub own_locator: Option<String>,
    pub qsl_locator: Option<String>,
    pub rst: Option<i64>,
    pub comments: Option<String>,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            callsign: row.try_get("callsign")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            qsl_refs: Vec::new(),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Qsl {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let to_time: Option<String> = row.try_get("to_time")?;
        Ok(Qsl {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            own_callsign: row.try_get("own_callsign")?,
            qsl_callsign: row.try_get("qsl_callsign")?,
            frequency_khz: row.try_get("frequency_khz")?,
            modulation: row.try_get("modulation")?,
            from_time: parse_datetime("from_time", &row.try_get::<String, _>("from_time")?)?,
            to_time: to_time
                .as_deref()
                .map(|s| parse_datetime("to_time", s))
                .transpose()?,
            own_locator: row.try_get("own_locator")?,
            qsl_locator: row.try_get("qsl_locator")?,
            rst: row.try_get("rst")?,
            comments: row.try_get("comments")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
