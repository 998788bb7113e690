//! Conversions from collaborator errors into API errors.

use moviereviews_model::error::ReviewError;

use crate::store::StoreError;
use crate::translate::TranslateError;

/// Message of a failed translation.
pub const TRANSLATION_FAILED: &str = "unable to translate the message";

/// Convert a store error into an `UpstreamFailure` carrying the store message.
///
/// Takes `e` by value because this is used as a closure argument to `.map_err()`.
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn store_error_to_review(message: &str, e: StoreError) -> ReviewError {
    ReviewError::upstream(message, e.to_string())
}

/// Convert a translation failure into a `BadRequest`.
///
/// Takes `e` by value because this is used as a closure argument to `.map_err()`.
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn translate_error_to_review(e: TranslateError) -> ReviewError {
    ReviewError::bad_request(TRANSLATION_FAILED).with_detail(e.to_string())
}
