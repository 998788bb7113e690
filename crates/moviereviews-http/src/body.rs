//! Response body type.

use bytes::Bytes;
use http_body_util::Full;

/// Response body of the movie reviews API.
///
/// Every response is either a buffered JSON document or empty.
pub type ReviewResponseBody = Full<Bytes>;

/// Body carrying a serialized JSON document.
#[must_use]
pub fn json_body(json: Vec<u8>) -> ReviewResponseBody {
    Full::new(Bytes::from(json))
}

/// Body with no content.
#[must_use]
pub fn empty_body() -> ReviewResponseBody {
    Full::new(Bytes::new())
}
