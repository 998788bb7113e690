//! Movie reviews error types.
//!
//! Every failure surfaces to clients as a JSON body of the form
//! `{"message": "...", "error": "..."}` where `error` carries the underlying
//! diagnostic (store or provider message) when there is one.

use std::fmt;

/// Error categories of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ReviewErrorCode {
    /// Malformed, missing or invalid input.
    #[default]
    BadRequest,
    /// No session cookie on a write request.
    Unauthorized,
    /// Session cookie present but rejected.
    Forbidden,
    /// The targeted review or route does not exist.
    NotFound,
    /// The route exists but not for this method.
    MethodNotAllowed,
    /// The request body exceeds the accepted size.
    PayloadTooLarge,
    /// The store or the translation provider failed.
    UpstreamFailure,
    /// Anything else.
    InternalError,
}

impl ReviewErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::UpstreamFailure => "UpstreamFailure",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::BadRequest => http::StatusCode::BAD_REQUEST,
            Self::Unauthorized => http::StatusCode::UNAUTHORIZED,
            Self::Forbidden => http::StatusCode::FORBIDDEN,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => http::StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamFailure | Self::InternalError => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ReviewErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API error response.
#[derive(Debug)]
pub struct ReviewError {
    /// The error code.
    pub code: ReviewErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// Diagnostic detail included in the response body, if any.
    pub detail: Option<String>,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReviewError({}): {}", self.code, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ReviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl ReviewError {
    /// Create a new `ReviewError` from an error code.
    #[must_use]
    pub fn new(code: ReviewErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.as_str().to_owned(),
            code,
            detail: None,
            source: None,
        }
    }

    /// Create a new `ReviewError` with a custom message.
    #[must_use]
    pub fn with_message(code: ReviewErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            detail: None,
            source: None,
        }
    }

    /// Attach diagnostic detail shown to the client.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Invalid or missing input.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(ReviewErrorCode::BadRequest, message)
    }

    /// The targeted record does not exist.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ReviewErrorCode::NotFound, message)
    }

    /// A collaborator call failed; `detail` is echoed for diagnostics.
    #[must_use]
    pub fn upstream(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::with_message(ReviewErrorCode::UpstreamFailure, message).with_detail(detail)
    }

    /// Internal server error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(ReviewErrorCode::InternalError, message)
    }

    /// No route for the path.
    #[must_use]
    pub fn unknown_route(method: &http::Method, path: &str) -> Self {
        Self::with_message(
            ReviewErrorCode::NotFound,
            format!("No route for {method} {path}"),
        )
    }

    /// Route exists, method does not.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method, path: &str) -> Self {
        Self::with_message(
            ReviewErrorCode::MethodNotAllowed,
            format!("Method {method} is not allowed on {path}"),
        )
    }
}

/// Create a `ReviewError` from an error code.
///
/// # Examples
///
/// ```
/// use moviereviews_model::review_error;
/// use moviereviews_model::error::ReviewErrorCode;
///
/// let err = review_error!(NotFound);
/// assert_eq!(err.code, ReviewErrorCode::NotFound);
///
/// let err = review_error!(BadRequest, "Missing request body");
/// assert_eq!(err.message, "Missing request body");
/// ```
#[macro_export]
macro_rules! review_error {
    ($code:ident) => {
        $crate::error::ReviewError::new($crate::error::ReviewErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::ReviewError::with_message($crate::error::ReviewErrorCode::$code, $msg)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_codes_to_status() {
        assert_eq!(
            ReviewError::bad_request("x").status_code,
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ReviewError::not_found("x").status_code,
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            ReviewError::upstream("x", "y").status_code,
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            review_error!(Forbidden).status_code,
            http::StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_should_include_detail_in_display() {
        let err = ReviewError::upstream("Failed to update the review", "throttled");
        assert_eq!(
            err.to_string(),
            "ReviewError(UpstreamFailure): Failed to update the review (throttled)"
        );
    }
}
