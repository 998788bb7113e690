//! Response serialization and error formatting.

use serde::Serialize;

use moviereviews_model::error::ReviewError;

use crate::body::{ReviewResponseBody, empty_body, json_body};

/// Content type of every JSON response.
pub const CONTENT_TYPE: &str = "application/json";

/// Header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Serialize an error into a JSON response body.
///
/// ```json
/// { "message": "Failed to update the review", "error": "throttled" }
/// ```
///
/// `error` is omitted when the error has no diagnostic detail.
#[must_use]
pub fn error_to_json(error: &ReviewError) -> Vec<u8> {
    let mut body = serde_json::json!({ "message": error.message });
    if let Some(detail) = &error.detail {
        body["error"] = serde_json::Value::String(detail.clone());
    }
    serde_json::to_vec(&body).expect("JSON serialization of error cannot fail")
}

/// Convert a `ReviewError` into a complete HTTP error response.
#[must_use]
pub fn error_to_response(
    error: &ReviewError,
    request_id: &str,
) -> http::Response<ReviewResponseBody> {
    http::Response::builder()
        .status(error.status_code)
        .header("content-type", CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id)
        .body(json_body(error_to_json(error)))
        .expect("valid error response")
}

/// Build a response from JSON bytes.
#[must_use]
pub fn json_response(
    status: http::StatusCode,
    json: Vec<u8>,
) -> http::Response<ReviewResponseBody> {
    http::Response::builder()
        .status(status)
        .header("content-type", CONTENT_TYPE)
        .body(json_body(json))
        .expect("valid JSON response")
}

/// Serialize `value` and build a response with the given status.
pub fn serialize_response<T: Serialize>(
    status: http::StatusCode,
    value: &T,
) -> Result<http::Response<ReviewResponseBody>, ReviewError> {
    let json = serde_json::to_vec(value).map_err(|e| {
        ReviewError::internal_error(format!("Failed to serialize response: {e}")).with_source(e)
    })?;
    Ok(json_response(status, json))
}

/// Build a bodiless response.
#[must_use]
pub fn empty_response(status: http::StatusCode) -> http::Response<ReviewResponseBody> {
    http::Response::builder()
        .status(status)
        .body(empty_body())
        .expect("valid empty response")
}
