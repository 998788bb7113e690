//! Integration tests for the movie reviews server.
//!
//! These tests require a running server at `localhost:3000` started with the
//! same `SESSION_SECRET` the tests use. They are marked `#[ignore]` so they
//! don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! SESSION_SECRET=local-dev-secret cargo run -p moviereviews-server &
//! SESSION_SECRET=local-dev-secret cargo test -p moviereviews-integration -- --ignored
//! ```

use std::sync::Once;

use moviereviews_auth::SessionSigner;
use serde_json::{Value, json};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the server under test.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("MOVIEREVIEWS_ENDPOINT_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Create an HTTP client for the server under test.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Absolute URL for `path`.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", endpoint_url())
}

/// A `Cookie` header value carrying a fresh session for `username`.
#[must_use]
pub fn session_cookie(username: &str) -> String {
    let secret =
        std::env::var("SESSION_SECRET").unwrap_or_else(|_| "local-dev-secret".to_owned());
    let expires_at = chrono::Utc::now().timestamp() + 300;
    let token = SessionSigner::new(secret).issue(username, expires_at);
    format!("token={token}")
}

/// A movie id no other test run is likely to use.
#[must_use]
pub fn test_movie_id() -> u64 {
    let id = uuid::Uuid::new_v4().as_u128();
    u64::try_from(id % 1_000_000_000).unwrap_or(0) + 1_000_000
}

/// Generate a unique reviewer name for a test.
#[must_use]
pub fn test_reviewer(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("{prefix}-{id}")
}

/// A valid add-review body.
#[must_use]
pub fn review_body(movie_id: u64, reviewer: &str, rating: u8, review_date: &str) -> Value {
    json!({
        "movieId": movie_id,
        "reviewer": reviewer,
        "rating": rating,
        "reviewText": "Sharp dialogue and a memorable final act.",
        "reviewDate": review_date,
    })
}

/// Add a review with a valid session, panicking on failure.
pub async fn add_review(client: &reqwest::Client, body: &Value) {
    let resp = client
        .post(url("/movies/reviews"))
        .header("cookie", session_cookie("integration"))
        .json(body)
        .send()
        .await
        .expect("add review request");
    assert_eq!(resp.status(), 201, "add review failed: {body}");
}

/// Delete a review, ignoring failures.
pub async fn cleanup_review(client: &reqwest::Client, movie_id: u64, reviewer: &str) {
    let _ = client
        .delete(url(&format!("/movies/{movie_id}/reviews/{reviewer}")))
        .header("cookie", session_cookie("integration"))
        .send()
        .await;
}

mod test_auth;
mod test_http;
mod test_reviews;
