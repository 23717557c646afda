//! Transport-independent request description and response decoding.
//!
//! Facades build an [`ApiRequest`]; [`Console`](crate::Console) and
//! [`AsyncConsole`](crate::AsyncConsole) send it.

use std::path::PathBuf;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::error::{ClientError, Result};

/// Header carrying the API key on every request
pub const AUTH_HEADER: &str = "MiraAuthorization";

/// A single call against the Mira console API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL
    pub path: String,
    /// Query string pairs
    pub query: Vec<(String, String)>,
    /// JSON body
    pub json: Option<Value>,
    /// Form fields, sent multipart when a file is attached
    pub form: Vec<(String, String)>,
    /// File upload
    pub file: Option<FileUpload>,
}

/// A local file sent as one multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Multipart field name
    pub field: String,
    /// File on disk
    pub path: PathBuf,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            json: None,
            form: Vec::new(),
            file: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a query pair only when `value` is set
    #[must_use]
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    #[must_use]
    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn file(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.file = Some(FileUpload {
            field: field.into(),
            path: path.into(),
        });
        self
    }
}

/// Turn a status and raw body into a JSON value.
///
/// Non-success statuses become [`ClientError::Api`]; an empty success body is
/// `null`.
pub(crate) fn decode_response(status: StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        warn!(status = status.as_u16(), "Request rejected by server");
        return Err(ClientError::Api {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Take the `data` member out of a response envelope
pub(crate) fn take_data(response: Value) -> Result<Value> {
    match response {
        Value::Object(mut map) => map
            .remove("data")
            .ok_or_else(|| ClientError::InvalidResponse("response has no `data` field".to_string())),
        other => Err(ClientError::InvalidResponse(format!(
            "expected a JSON object, got: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let request = ApiRequest::get("v1/flows/yaml/acme/story")
            .query("version", "1.0.0")
            .query_opt("user_id", None::<String>);

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query, vec![("version".to_string(), "1.0.0".to_string())]);
        assert!(request.json.is_none());
        assert!(request.file.is_none());
    }

    #[test]
    fn test_decode_success() {
        assert_eq!(decode_response(StatusCode::OK, r#"{"ok":true}"#).unwrap(), json!({"ok": true}));
        assert_eq!(decode_response(StatusCode::NO_CONTENT, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_rejected() {
        let err = decode_response(StatusCode::UNAUTHORIZED, "bad key").unwrap_err();
        match err {
            ClientError::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }

    #[test]
    fn test_take_data() {
        assert_eq!(take_data(json!({"data": [1, 2]})).unwrap(), json!([1, 2]));
        assert!(matches!(
            take_data(json!({"status": "ok"})),
            Err(ClientError::InvalidResponse(_))
        ));
        assert!(take_data(Value::Null).is_err());
    }
}
