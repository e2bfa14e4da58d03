//! Audit data models

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Replacement value stored for the authorization header
pub const MASKED_HEADER_VALUE: &str = "*****";

/// Number of entries returned by the log viewer
pub const LOG_VIEW_LIMIT: i64 = 50;

/// One persisted request/response observation
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditRecord {
    pub id: i64,
    pub method: String,
    pub endpoint: String,
    pub request_headers: Option<JsonValue>,
    pub request_body: Option<JsonValue>,
    pub response_body: Option<JsonValue>,
    pub status_code: i32,
    pub created_at: DateTime<Utc>,
}

/// A record captured by the middleware, waiting to be persisted
#[derive(Debug, Clone)]
pub struct NewAuditRecord {
    pub method: String,
    pub endpoint: String,
    pub request_headers: JsonValue,
    pub request_body: Option<JsonValue>,
    pub response_body: Option<JsonValue>,
    pub status_code: i32,
    pub created_at: DateTime<Utc>,
}

/// Copy headers into a JSON map, masking the authorization value
///
/// Every header is stored verbatim except `authorization`, whose value is
/// replaced with [`MASKED_HEADER_VALUE`] so bearer tokens never reach the
/// log store. For repeated headers the first value wins.
pub fn redacted_headers(headers: &HeaderMap) -> JsonValue {
    let mut map = Map::new();
    for (name, value) in headers {
        let stored = if *name == header::AUTHORIZATION {
            MASKED_HEADER_VALUE.to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };
        map.entry(name.as_str().to_string())
            .or_insert(JsonValue::String(stored));
    }
    JsonValue::Object(map)
}

/// Convert a captured body into its stored JSON form
///
/// Empty bodies become `None` (stored as null). Bodies that parse as JSON
/// are stored structurally; anything else is wrapped as an opaque string so
/// no request or response content can make logging fail.
pub fn body_to_json(bytes: &[u8]) -> Option<JsonValue> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(JsonValue::String(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn authorization_header_is_masked() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer secret-token"),
        );
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let redacted = redacted_headers(&headers);

        assert_eq!(redacted["authorization"], MASKED_HEADER_VALUE);
        assert_eq!(redacted["content-type"], "application/json");
        assert!(!redacted.to_string().contains("secret-token"));
    }

    #[test]
    fn empty_body_is_null() {
        assert_eq!(body_to_json(b""), None);
    }

    #[test]
    fn json_body_is_stored_structurally() {
        let value = body_to_json(br#"{"title":"x"}"#).unwrap();
        assert_eq!(value["title"], "x");
    }

    #[test]
    fn non_json_body_is_wrapped_as_string() {
        let value = body_to_json(b"plain text, not json").unwrap();
        assert_eq!(value, JsonValue::String("plain text, not json".to_string()));
    }

    #[test]
    fn invalid_utf8_body_is_still_recorded() {
        let value = body_to_json(&[0xff, 0xfe, b'a']).unwrap();
        assert!(matches!(value, JsonValue::String(_)));
    }
}
