//! Request authorization.

use tracing::debug;

use crate::cookie::find_cookie;
use crate::error::AuthError;
use crate::session::SessionSigner;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The authenticated username.
    pub username: String,
    /// Unix seconds after which the session is no longer valid.
    pub expires_at: i64,
}

/// Decides whether a request carries valid credentials.
///
/// Implementations must be cheap to call and safe to share across the
/// connection tasks of the server.
pub trait Authorizer: Send + Sync {
    /// Authorize a request from its headers.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] describing why the request was rejected.
    fn authorize(&self, headers: &http::HeaderMap) -> Result<Principal, AuthError>;
}

/// An [`Authorizer`] that verifies the signed `token` session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookieAuthorizer {
    signer: SessionSigner,
    cookie_name: String,
}

impl SessionCookieAuthorizer {
    /// Create an authorizer reading the default `token` cookie.
    #[must_use]
    pub fn new(signer: SessionSigner) -> Self {
        Self {
            signer,
            cookie_name: SESSION_COOKIE.to_owned(),
        }
    }

    /// Read the session from a differently named cookie.
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Authorize against an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCookie`] when the cookie is absent, or the
    /// verification error of [`SessionSigner::verify`].
    pub fn authorize_at(
        &self,
        headers: &http::HeaderMap,
        now: i64,
    ) -> Result<Principal, AuthError> {
        let token = find_cookie(headers, &self.cookie_name)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::MissingCookie(self.cookie_name.clone()))?;

        let session = self.signer.verify(token, now)?;
        debug!(username = %session.username, "session authorized");
        Ok(Principal {
            username: session.username,
            expires_at: session.expires_at,
        })
    }
}

impl Authorizer for SessionCookieAuthorizer {
    fn authorize(&self, headers: &http::HeaderMap) -> Result<Principal, AuthError> {
        self.authorize_at(headers, chrono::Utc::now().timestamp())
    }
}
