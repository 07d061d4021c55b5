use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::PresignError;

pub const DEFAULT_EXPIRATION_SECS: u64 = 7 * 24 * 60 * 60;
/// S3 refuses to presign for longer than one week.
pub const MAX_EXPIRATION_SECS: u64 = 7 * 24 * 60 * 60;
pub const EXPIRATION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresignRequest {
    #[serde(default)]
    pub object_key: Option<String>,
}

impl PresignRequest {
    /// The per-request key, if one was supplied and is non-empty.
    pub fn object_key_override(&self) -> Option<&str> {
        self.object_key.as_deref().filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedObject {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseEnvelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseBody {
    pub presigned_url: Option<String>,
    pub expiration_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    pub fn success(presigned: &PresignedObject) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody {
                presigned_url: Some(presigned.url.clone()),
                expiration_time: Some(format_expiration_time(presigned.expires_at)),
                error: None,
            },
        }
    }

    pub fn failure(error: &PresignError) -> Self {
        Self {
            status_code: error.status_code(),
            body: ResponseBody {
                presigned_url: None,
                expiration_time: None,
                error: Some(error.to_string()),
            },
        }
    }

    pub fn from_outcome(outcome: &Result<PresignedObject, PresignError>) -> Self {
        match outcome {
            Ok(presigned) => Self::success(presigned),
            Err(error) => Self::failure(error),
        }
    }
}

/// Accepts either a direct invocation payload or an API Gateway proxy event
/// whose `body` carries the request.
pub fn parse_invocation_event(event: Value) -> Result<PresignRequest, PresignError> {
    let payload = normalize_invocation_event(event).map_err(PresignError::InvalidRequest)?;
    serde_json::from_value(payload).map_err(|error| PresignError::InvalidRequest(error.to_string()))
}

fn normalize_invocation_event(event: Value) -> Result<Value, String> {
    let object = match &event {
        Value::Null => return Ok(json!({})),
        Value::Object(object) => object,
        _ => return Err("payload must be a JSON object".to_string()),
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) if text.trim().is_empty() => Ok(json!({})),
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text)
                .map_err(|error| format!("malformed JSON body: {error}"))?;
            if parsed.is_object() {
                Ok(parsed)
            } else {
                Err("body must be a JSON object".to_string())
            }
        }
        _ => Err("body must be a JSON object".to_string()),
    }
}

/// `None` when the offset does not fit in the calendar.
pub fn expiration_instant(invoked_at: DateTime<Utc>, expires_in_secs: u64) -> Option<DateTime<Utc>> {
    let seconds = i64::try_from(expires_in_secs).ok()?;
    invoked_at.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

pub fn format_expiration_time(expires_at: DateTime<Utc>) -> String {
    expires_at.format(EXPIRATION_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn invoked_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0)
            .single()
            .expect("valid timestamp")
            + TimeDelta::milliseconds(750)
    }

    #[test]
    fn direct_invocation_reads_object_key() {
        let request = parse_invocation_event(json!({"object_key": "override.txt"}))
            .expect("payload should parse");
        assert_eq!(request.object_key_override(), Some("override.txt"));
    }

    #[test]
    fn empty_and_null_payloads_have_no_override() {
        for event in [json!({}), Value::Null, json!({"object_key": null})] {
            let request = parse_invocation_event(event).expect("payload should parse");
            assert_eq!(request.object_key_override(), None);
        }
    }

    #[test]
    fn empty_object_key_is_not_an_override() {
        let request =
            parse_invocation_event(json!({"object_key": ""})).expect("payload should parse");
        assert_eq!(request.object_key_override(), None);
    }

    #[test]
    fn api_gateway_string_body_is_unwrapped() {
        let request = parse_invocation_event(json!({
            "httpMethod": "POST",
            "body": "{\"object_key\":\"reports/q3.pdf\"}"
        }))
        .expect("payload should parse");
        assert_eq!(request.object_key_override(), Some("reports/q3.pdf"));
    }

    #[test]
    fn api_gateway_object_and_null_bodies_are_accepted() {
        let with_object = parse_invocation_event(json!({"body": {"object_key": "a.txt"}}))
            .expect("payload should parse");
        assert_eq!(with_object.object_key_override(), Some("a.txt"));

        let with_null = parse_invocation_event(json!({"body": null})).expect("payload should parse");
        assert_eq!(with_null.object_key_override(), None);
    }

    #[test]
    fn rejects_non_object_payloads() {
        for event in [json!([1, 2]), json!(42), json!({"body": "not json"}), json!({"body": "[1]"})] {
            let error = parse_invocation_event(event).expect_err("payload should be rejected");
            assert_eq!(error.status_code(), 400);
        }
    }

    #[test]
    fn rejects_non_string_object_key() {
        let error = parse_invocation_event(json!({"object_key": 7}))
            .expect_err("numeric object key should be rejected");
        assert!(matches!(error, PresignError::InvalidRequest(_)));
    }

    #[test]
    fn expiration_time_truncates_to_the_second() {
        let expires_at = expiration_instant(invoked_at(), 60).expect("representable instant");
        assert_eq!(format_expiration_time(expires_at), "2026-10-19 12:01:00 UTC");
    }

    #[test]
    fn zero_expiration_is_the_invocation_second() {
        let expires_at = expiration_instant(invoked_at(), 0).expect("representable instant");
        assert_eq!(format_expiration_time(expires_at), "2026-10-19 12:00:00 UTC");
    }

    #[test]
    fn default_expiration_is_seven_days() {
        let expires_at =
            expiration_instant(invoked_at(), DEFAULT_EXPIRATION_SECS).expect("representable");
        assert_eq!(format_expiration_time(expires_at), "2026-10-26 12:00:00 UTC");
    }

    #[test]
    fn unrepresentable_expiration_is_rejected() {
        assert!(expiration_instant(invoked_at(), u64::MAX).is_none());
        assert!(expiration_instant(invoked_at(), i64::MAX as u64).is_none());
    }

    #[test]
    fn success_envelope_omits_error_field() {
        let presigned = PresignedObject {
            url: "https://bucket.s3.amazonaws.com/k.txt?X-Amz-Expires=60".to_string(),
            expires_at: expiration_instant(invoked_at(), 60).expect("representable"),
        };
        let value = serde_json::to_value(ResponseEnvelope::success(&presigned))
            .expect("envelope should serialize");

        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["body"]["expiration_time"], "2026-10-19 12:01:00 UTC");
        assert!(value["body"]["presigned_url"].is_string());
        assert!(value["body"].get("error").is_none());
    }

    #[test]
    fn failure_envelope_nulls_url_fields() {
        let value = serde_json::to_value(ResponseEnvelope::failure(
            &PresignError::MissingTargetConfig,
        ))
        .expect("envelope should serialize");

        assert_eq!(value["statusCode"], 400);
        assert!(value["body"]["presigned_url"].is_null());
        assert!(value["body"]["expiration_time"].is_null());
        assert_eq!(
            value["body"]["error"],
            "Environment variables 'BUCKET_NAME' or 'OBJECT_KEY' are missing."
        );
    }
}
