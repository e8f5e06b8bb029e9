//! SDK error types and handling
//!
//! Every failure a request can hit (network, non-success status, undecodable
//! payload) is classified here by the transport. Resource clients never catch
//! or translate these; they propagate as-is.

use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// API returned an error response with a status not covered below
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        error_type: Option<String>,
        code: Option<String>,
        request_id: Option<String>,
    },

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded. Retry after {retry_after} seconds: {message}")]
    RateLimited {
        retry_after: u64,
        message: String,
        request_id: Option<String>,
    },

    /// Authentication failed (401)
    #[error("Authentication failed: {message}")]
    AuthenticationError {
        message: String,
        request_id: Option<String>,
    },

    /// Permission denied (403)
    #[error("Permission denied: {message}")]
    PermissionDenied {
        message: String,
        request_id: Option<String>,
    },

    /// Resource not found (404)
    #[error("Resource not found: {message}")]
    NotFound {
        message: String,
        request_id: Option<String>,
    },

    /// Conflict (409)
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        request_id: Option<String>,
    },

    /// Request was understood but rejected (422)
    #[error("Unprocessable entity: {message}")]
    UnprocessableEntity {
        message: String,
        request_id: Option<String>,
    },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError {
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Error envelope returned by the API: `{"error": {...}}`
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Body of the error envelope
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl SdkError {
    /// Classify a non-success response.
    ///
    /// `retry_after` is the parsed `Retry-After` header, if any.
    pub fn from_response(
        status: u16,
        body: &str,
        request_id: Option<String>,
        retry_after: Option<u64>,
    ) -> Self {
        let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();

        let message = parsed
            .as_ref()
            .and_then(|r| r.error.message.clone())
            .unwrap_or_else(|| body.to_string());

        match status {
            401 => SdkError::AuthenticationError {
                message,
                request_id,
            },
            403 => SdkError::PermissionDenied {
                message,
                request_id,
            },
            404 => SdkError::NotFound {
                message,
                request_id,
            },
            409 => SdkError::Conflict {
                message,
                request_id,
            },
            422 => SdkError::UnprocessableEntity {
                message,
                request_id,
            },
            429 => SdkError::RateLimited {
                retry_after: retry_after.unwrap_or(60),
                message,
                request_id,
            },
            500..=599 => SdkError::ServerError {
                status,
                message,
                request_id,
            },
            _ => {
                let (error_type, code) = match parsed {
                    Some(r) => (
                        r.error.error_type,
                        r.error.code.map(|c| match c {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        }),
                    ),
                    None => (None, None),
                };
                SdkError::ApiError {
                    status,
                    message,
                    error_type,
                    code,
                    request_id,
                }
            }
        }
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SdkError::NetworkError(_)
                | SdkError::Timeout(_)
                | SdkError::RateLimited { .. }
                | SdkError::ServerError { .. }
        )
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::ApiError { status, .. } => Some(*status),
            SdkError::ServerError { status, .. } => Some(*status),
            SdkError::RateLimited { .. } => Some(429),
            SdkError::AuthenticationError { .. } => Some(401),
            SdkError::PermissionDenied { .. } => Some(403),
            SdkError::NotFound { .. } => Some(404),
            SdkError::Conflict { .. } => Some(409),
            SdkError::UnprocessableEntity { .. } => Some(422),
            _ => None,
        }
    }

    /// Get the request ID if available.
    ///
    /// Set for every error built from an HTTP response that carried `x-request-id`.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            SdkError::ApiError { request_id, .. }
            | SdkError::RateLimited { request_id, .. }
            | SdkError::AuthenticationError { request_id, .. }
            | SdkError::PermissionDenied { request_id, .. }
            | SdkError::NotFound { request_id, .. }
            | SdkError::Conflict { request_id, .. }
            | SdkError::UnprocessableEntity { request_id, .. }
            | SdkError::ServerError { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_json_response() {
        let body = r#"{"error": {"message": "Eval not found", "type": "invalid_request_error"}}"#;
        let error = SdkError::from_response(404, body, Some("req-123".to_string()), None);

        assert_eq!(error.request_id(), Some("req-123"));
        match error {
            SdkError::NotFound { message, .. } => assert_eq!(message, "Eval not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_from_plain_body() {
        let error = SdkError::from_response(418, "teapot", Some("req-9".to_string()), None);

        match error {
            SdkError::ApiError {
                status,
                message,
                error_type,
                request_id,
                ..
            } => {
                assert_eq!(status, 418);
                assert_eq!(message, "teapot");
                assert!(error_type.is_none());
                assert_eq!(request_id.as_deref(), Some("req-9"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_keeps_type_and_code() {
        let body = r#"{"error": {"message": "bad", "type": "invalid_request_error", "param": "name", "code": "missing_field"}}"#;
        let error = SdkError::from_response(400, body, None, None);

        match error {
            SdkError::ApiError {
                error_type, code, ..
            } => {
                assert_eq!(error_type.as_deref(), Some("invalid_request_error"));
                assert_eq!(code.as_deref(), Some("missing_field"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_uses_retry_after() {
        let body = r#"{"error": {"message": "Too many requests", "type": "requests"}}"#;
        let error = SdkError::from_response(429, body, Some("req-7".to_string()), Some(7));
        match &error {
            SdkError::RateLimited {
                retry_after,
                message,
                ..
            } => {
                assert_eq!(*retry_after, 7);
                assert_eq!(message, "Too many requests");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(error.request_id(), Some("req-7"));

        let error = SdkError::from_response(429, "", None, None);
        assert!(matches!(
            error,
            SdkError::RateLimited {
                retry_after: 60,
                ..
            }
        ));
    }

    #[test]
    fn test_error_is_retryable() {
        let rate_limited = SdkError::from_response(429, "", None, None);
        assert!(rate_limited.is_retryable());

        let not_found = SdkError::NotFound {
            message: "eval_123".to_string(),
            request_id: None,
        };
        assert!(!not_found.is_retryable());
    }

    #[test]
    fn test_error_status_code() {
        let api_error = SdkError::ApiError {
            status: 400,
            message: "Bad request".to_string(),
            error_type: None,
            code: None,
            request_id: None,
        };
        assert_eq!(api_error.status_code(), Some(400));

        let auth_error = SdkError::from_response(401, "Invalid token", None, None);
        assert_eq!(auth_error.status_code(), Some(401));

        let server = SdkError::from_response(503, "unavailable", None, None);
        assert_eq!(server.status_code(), Some(503));
    }

    #[test]
    fn test_request_id_kept_for_every_status() {
        for status in [401, 403, 404, 409, 422, 429, 500, 503, 418] {
            let error = SdkError::from_response(status, "oops", Some("req-x".to_string()), None);
            assert_eq!(error.status_code(), Some(status), "status {status}");
            assert_eq!(error.request_id(), Some("req-x"), "status {status}");
        }

        let error = SdkError::from_response(404, "oops", None, None);
        assert_eq!(error.request_id(), None);
    }
}
