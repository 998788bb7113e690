//! Session cookie authorization for the movie reviews API.
//!
//! Write operations (add, update, delete) require an authenticated session.
//! The session travels in a `token` cookie holding an HMAC-SHA256 signed
//! token:
//!
//! ```text
//! token=<base64url(username)>.<expires-at unix seconds>.<hex signature>
//! ```
//!
//! # Usage
//!
//! ```rust
//! use moviereviews_auth::{Authorizer, SessionCookieAuthorizer, SessionSigner};
//!
//! let signer = SessionSigner::new("local-dev-secret");
//! let token = signer.issue("alice", 4_102_444_800);
//!
//! let mut headers = http::HeaderMap::new();
//! headers.insert(
//!     http::header::COOKIE,
//!     http::HeaderValue::from_str(&format!("token={token}")).unwrap(),
//! );
//!
//! let authorizer = SessionCookieAuthorizer::new(signer);
//! let principal = authorizer.authorize(&headers).unwrap();
//! assert_eq!(principal.username, "alice");
//! ```
//!
//! # Modules
//!
//! - [`authorizer`] - The [`Authorizer`] trait and the cookie-backed implementation
//! - [`cookie`] - `Cookie` header parsing
//! - [`error`] - Authorization error types
//! - [`session`] - Session token signing and verification

pub mod authorizer;
pub mod cookie;
pub mod error;
pub mod session;

pub use authorizer::{Authorizer, Principal, SessionCookieAuthorizer};
pub use error::AuthError;
pub use session::SessionSigner;
