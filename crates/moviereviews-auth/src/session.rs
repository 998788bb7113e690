//! Session token signing and verification.
//!
//! A token binds a username to an expiry instant:
//!
//! 1. The username is base64url encoded (no padding) so it never contains `.`.
//! 2. The string to sign is `<encoded user>.<expires-at>`.
//! 3. The signature is the lowercase hex HMAC-SHA256 of that string.
//!
//! Verification recomputes the signature and compares it in constant time
//! before looking at the expiry.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// A verified session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The authenticated username.
    pub username: String,
    /// Unix seconds after which the session is no longer valid.
    pub expires_at: i64,
}

/// Issues and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner")
            .field("secret", &"...")
            .finish()
    }
}

impl SessionSigner {
    /// Create a signer from a shared secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Mint a token for `username` valid until `expires_at` (unix seconds).
    #[must_use]
    pub fn issue(&self, username: &str, expires_at: i64) -> String {
        let payload = format!("{}.{expires_at}", URL_SAFE_NO_PAD.encode(username));
        let signature = hex::encode(self.sign(payload.as_bytes()));
        format!("{payload}.{signature}")
    }

    /// Verify a token at instant `now` (unix seconds).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedToken`] if the token cannot be parsed,
    /// [`AuthError::SignatureDoesNotMatch`] if it was not signed with this
    /// secret, or [`AuthError::SessionExpired`] if `now` is past the expiry.
    pub fn verify(&self, token: &str, now: i64) -> Result<Session, AuthError> {
        let (payload, signature) = token.rsplit_once('.').ok_or(AuthError::MalformedToken)?;
        let (encoded_user, expires_at) =
            payload.split_once('.').ok_or(AuthError::MalformedToken)?;

        let provided = hex::decode(signature).map_err(|_| AuthError::MalformedToken)?;
        let expected = self.sign(payload.as_bytes());
        if !bool::from(provided.ct_eq(&expected)) {
            debug!("session signature mismatch");
            return Err(AuthError::SignatureDoesNotMatch);
        }

        let expires_at: i64 = expires_at.parse().map_err(|_| AuthError::MalformedToken)?;
        let username = URL_SAFE_NO_PAD
            .decode(encoded_user)
            .ok()
            .and_then(|raw| String::from_utf8(raw).ok())
            .ok_or(AuthError::MalformedToken)?;

        if now > expires_at {
            debug!(%username, expires_at, now, "session expired");
            return Err(AuthError::SessionExpired);
        }

        Ok(Session {
            username,
            expires_at,
        })
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can accept keys of any length");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}
