//! Request/Response DTOs

use chrono::{DateTime, Utc};
use qsl_db::{NewQsl, UpdateQsl};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

// ==================== Auth Types ====================

/// Signup request
///
/// Fields are read as raw JSON so a value of the wrong type is reported
/// under its own name instead of failing the whole body.
#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub callsign: Value,
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub password: Value,
}

impl SignupRequest {
    /// Callsign, email and password; missing fields read as empty
    pub fn fields(&self) -> Result<(&str, &str, &str), ApiError> {
        let mut check = FieldCheck::default();
        let callsign = check.string("callsign", &self.callsign);
        let email = check.string("email", &self.email);
        let password = check.string("password", &self.password);
        check.finish((callsign, email, password))
    }
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub callsign: Value,
    #[serde(default)]
    pub password: Value,
}

impl LoginRequest {
    /// Callsign and password; missing fields read as empty
    pub fn credentials(&self) -> Result<(&str, &str), ApiError> {
        let mut check = FieldCheck::default();
        let callsign = check.string("callsign", &self.callsign);
        let password = check.string("password", &self.password);
        check.finish((callsign, password))
    }
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// ==================== QSL Types ====================

const MAX_CALLSIGN_LENGTH: usize = 20;
const MAX_MODULATION_LENGTH: usize = 10;
const MAX_LOCATOR_LENGTH: usize = 100;
const MAX_COMMENTS_LENGTH: usize = 1000;
const MIN_FREQUENCY_KHZ: f64 = 3.0;
const MAX_FREQUENCY_KHZ: f64 = 3_000_000_000.0;
const MAX_RST: i64 = 999;

/// QSL body for both create and update
///
/// On create the callsigns, frequency, modulation and start time are
/// required; on update every field is optional. `null` counts as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QslRequest {
    pub own_callsign: Option<Value>,
    pub qsl_callsign: Option<Value>,
    pub frequency_khz: Option<Value>,
    pub modulation: Option<Value>,
    pub from_time: Option<Value>,
    pub to_time: Option<Value>,
    pub own_locator: Option<Value>,
    pub qsl_locator: Option<Value>,
    pub rst: Option<Value>,
    pub comments: Option<Value>,
}

impl QslRequest {
    /// Validate as a new QSL owned by `owner_id`
    pub fn into_new(self, owner_id: &str) -> Result<NewQsl, ApiError> {
        let fields = self.validate(true)?;

        let (
            Some(own_callsign),
            Some(qsl_callsign),
            Some(frequency_khz),
            Some(modulation),
            Some(from_time),
        ) = (
            fields.own_callsign,
            fields.qsl_callsign,
            fields.frequency_khz,
            fields.modulation,
            fields.from_time,
        )
        else {
            return Err(ApiError::Internal(
                "required QSL field missing after validation".to_string(),
            ));
        };

        Ok(NewQsl {
            owner_id: owner_id.to_string(),
            own_callsign,
            qsl_callsign,
            frequency_khz,
            modulation,
            from_time,
            to_time: fields.to_time,
            own_locator: fields.own_locator,
            qsl_locator: fields.qsl_locator,
            rst: fields.rst,
            comments: fields.comments,
        })
    }

    /// Validate as a partial update
    pub fn into_update(self) -> Result<UpdateQsl, ApiError> {
        self.validate(false)
    }

    fn validate(self, required: bool) -> Result<UpdateQsl, ApiError> {
        let mut check = FieldCheck::default();

        let update = UpdateQsl {
            own_callsign: check.text(
                "ownCallsign",
                self.own_callsign,
                required,
                MAX_CALLSIGN_LENGTH,
                true,
            ),
            qsl_callsign: check.text(
                "qslCallsign",
                self.qsl_callsign,
                required,
                MAX_CALLSIGN_LENGTH,
                true,
            ),
            frequency_khz: check.frequency("frequencyKhz", self.frequency_khz, required),
            modulation: check.text(
                "modulation",
                self.modulation,
                required,
                MAX_MODULATION_LENGTH,
                true,
            ),
            from_time: check.timestamp("fromTime", self.from_time, required),
            to_time: check.timestamp("toTime", self.to_time, false),
            own_locator: check.text("ownLocator", self.own_locator, false, MAX_LOCATOR_LENGTH, false),
            qsl_locator: check.text("qslLocator", self.qsl_locator, false, MAX_LOCATOR_LENGTH, false),
            rst: check.rst("rst", self.rst),
            comments: check.text("comments", self.comments, false, MAX_COMMENTS_LENGTH, false),
        };

        check.finish(update)
    }
}

/// Collects the names of invalid fields, in field order, without repeats
#[derive(Default)]
struct FieldCheck {
    invalid: Vec<&'static str>,
}

impl FieldCheck {
    fn reject(&mut self, name: &'static str) {
        if !self.invalid.contains(&name) {
            self.invalid.push(name);
        }
    }

    fn present(&mut self, name: &'static str, value: Option<Value>, required: bool) -> Option<Value> {
        if value.is_none() && required {
            self.reject(name);
        }
        value
    }

    /// A string field where absent or `null` reads as empty
    fn string<'v>(&mut self, name: &'static str, value: &'v Value) -> &'v str {
        match value {
            Value::Null => "",
            Value::String(s) => s,
            _ => {
                self.reject(name);
                ""
            }
        }
    }

    fn text(
        &mut self,
        name: &'static str,
        value: Option<Value>,
        required: bool,
        max: usize,
        upper: bool,
    ) -> Option<String> {
        let Value::String(value) = self.present(name, value, required)? else {
            self.reject(name);
            return None;
        };
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > max {
            self.reject(name);
            return None;
        }
        Some(if upper {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        })
    }

    fn frequency(&mut self, name: &'static str, value: Option<Value>, required: bool) -> Option<f64> {
        let value = self.present(name, value, required)?;
        match value.as_f64() {
            Some(khz) if (MIN_FREQUENCY_KHZ..=MAX_FREQUENCY_KHZ).contains(&khz) => Some(khz),
            _ => {
                self.reject(name);
                None
            }
        }
    }

    fn timestamp(
        &mut self,
        name: &'static str,
        value: Option<Value>,
        required: bool,
    ) -> Option<DateTime<Utc>> {
        let value = self.present(name, value, required)?;
        let parsed = value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok());
        match parsed {
            Some(time) => Some(time.with_timezone(&Utc)),
            None => {
                self.reject(name);
                None
            }
        }
    }

    /// Integer only; `"599"` and `5.9` are both rejected
    fn rst(&mut self, name: &'static str, value: Option<Value>) -> Option<i64> {
        let value = value?;
        match value.as_i64() {
            Some(rst) if (0..=MAX_RST).contains(&rst) => Some(rst),
            _ => {
                self.reject(name);
                None
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ApiError> {
        if self.invalid.is_empty() {
            Ok(value)
        } else {
            Err(ApiError::BadRequest(self.invalid.join(",")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete() -> Value {
        json!({
            "ownCallsign": " iu4qsg ",
            "qslCallsign": "iu4qse",
            "frequencyKhz": 14074.0,
            "modulation": "ft8",
            "fromTime": "2021-03-01T18:30:00Z"
        })
    }

    fn qsl_request(body: Value) -> QslRequest {
        serde_json::from_value(body).unwrap()
    }

    fn with(mut body: Value, key: &str, value: Value) -> Value {
        body[key] = value;
        body
    }

    fn invalid_fields(result: Result<impl std::fmt::Debug, ApiError>) -> String {
        match result {
            Err(ApiError::BadRequest(fields)) => fields,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_into_new_normalizes() {
        let qsl = qsl_request(complete()).into_new("owner").unwrap();
        assert_eq!(qsl.owner_id, "owner");
        assert_eq!(qsl.own_callsign, "IU4QSG");
        assert_eq!(qsl.qsl_callsign, "IU4QSE");
        assert_eq!(qsl.modulation, "FT8");
        assert_eq!(qsl.from_time.to_rfc3339(), "2021-03-01T18:30:00+00:00");
        assert!(qsl.to_time.is_none());
        assert!(qsl.comments.is_none());
    }

    #[test]
    fn test_into_new_optional_fields() {
        let mut body = complete();
        body["toTime"] = json!("2021-03-01T20:30:00+01:00");
        body["ownLocator"] = json!(" JN54 ");
        body["rst"] = json!(599);
        body["comments"] = json!("tnx qso");
        body["qslLocator"] = Value::Null;

        let qsl = qsl_request(body).into_new("owner").unwrap();
        assert_eq!(qsl.to_time.unwrap().to_rfc3339(), "2021-03-01T19:30:00+00:00");
        assert_eq!(qsl.own_locator.as_deref(), Some("JN54"));
        assert!(qsl.qsl_locator.is_none());
        assert_eq!(qsl.rst, Some(599));
        assert_eq!(qsl.comments.as_deref(), Some("tnx qso"));
    }

    #[test]
    fn test_into_new_reports_missing_fields_in_order() {
        let fields = invalid_fields(QslRequest::default().into_new("owner"));
        assert_eq!(fields, "ownCallsign,qslCallsign,frequencyKhz,modulation,fromTime");
    }

    #[test]
    fn test_into_new_reports_invalid_fields() {
        let mut body = complete();
        body["ownCallsign"] = json!("   ");
        body["frequencyKhz"] = json!(1.0);
        body["toTime"] = json!("yesterday");
        body["rst"] = json!(1000);
        body["comments"] = json!("x".repeat(1001));

        let fields = invalid_fields(qsl_request(body).into_new("owner"));
        assert_eq!(fields, "ownCallsign,frequencyKhz,toTime,rst,comments");
    }

    #[test]
    fn test_wrong_types_are_reported_by_name() {
        let cases = [
            ("rst", json!("599")),
            ("rst", json!(5.9)),
            ("frequencyKhz", json!("14074")),
            ("ownCallsign", json!(42)),
            ("fromTime", json!(1614623400)),
            ("comments", json!(["tnx"])),
        ];

        for (key, value) in cases {
            let request = qsl_request(with(complete(), key, value));
            assert_eq!(invalid_fields(request.into_new("owner")), key);
        }
    }

    #[test]
    fn test_into_update_allows_partial() {
        let update = qsl_request(json!({ "modulation": "ssb" }))
            .into_update()
            .unwrap();

        assert_eq!(update.modulation.as_deref(), Some("SSB"));
        assert!(update.own_callsign.is_none());
        assert!(update.from_time.is_none());
    }

    #[test]
    fn test_into_update_validates_present_fields() {
        let request = qsl_request(json!({
            "qslCallsign": "X".repeat(21),
            "fromTime": "not a time",
            "rst": "59"
        }));

        let fields = invalid_fields(request.into_update());
        assert_eq!(fields, "qslCallsign,fromTime,rst");
    }

    #[test]
    fn test_frequency_bounds_inclusive() {
        for frequency in [MIN_FREQUENCY_KHZ, MAX_FREQUENCY_KHZ] {
            let request = qsl_request(with(complete(), "frequencyKhz", json!(frequency)));
            assert!(request.into_new("owner").is_ok());
        }
    }

    #[test]
    fn test_integer_frequency_accepted() {
        let request = qsl_request(with(complete(), "frequencyKhz", json!(7074)));
        assert_eq!(request.into_new("owner").unwrap().frequency_khz, 7074.0);
    }

    #[test]
    fn test_signup_fields() {
        let request: SignupRequest =
            serde_json::from_value(json!({ "callsign": "IU4QSG", "password": "x" })).unwrap();
        assert_eq!(request.fields().unwrap(), ("IU4QSG", "", "x"));

        let request: SignupRequest =
            serde_json::from_value(json!({ "callsign": 123, "email": true, "password": "x" }))
                .unwrap();
        assert_eq!(invalid_fields(request.fields()), "callsign,email");
    }

    #[test]
    fn test_login_credentials() {
        let request: LoginRequest =
            serde_json::from_value(json!({ "callsign": "IU4QSG", "password": 1234 })).unwrap();
        assert_eq!(invalid_fields(request.credentials()), "password");
    }
}
