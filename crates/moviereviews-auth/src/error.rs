//! Error types for session authorization.

/// Errors that can occur while authorizing a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The request carries no session cookie.
    #[error("Missing session cookie: {0}")]
    MissingCookie(String),

    /// The token does not have the `user.expiry.signature` shape.
    #[error("Malformed session token")]
    MalformedToken,

    /// The computed signature does not match the provided signature.
    #[error("Session signature does not match")]
    SignatureDoesNotMatch,

    /// The session expiry is in the past.
    #[error("Session has expired")]
    SessionExpired,
}

impl AuthError {
    /// Whether the failure means "no credentials" rather than "bad credentials".
    #[must_use]
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, Self::MissingCookie(_))
    }
}
