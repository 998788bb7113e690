//! Handler bridging the HTTP layer to the movie reviews provider.

use std::sync::Arc;

use moviereviews_http::body::ReviewResponseBody;
use moviereviews_http::dispatch::{HandlerFuture, ReviewHandler, ReviewRequest};
use moviereviews_http::response::serialize_response;
use moviereviews_model::error::ReviewError;
use moviereviews_model::input::{
    AddReviewInput, DeleteReviewInput, GetMovieReviewsInput, GetReviewInput,
    GetReviewerReviewsInput, GetReviewsByYearInput, TranslateReviewInput, UpdateReviewBody,
    UpdateReviewInput,
};
use moviereviews_model::operations::ReviewOperation;

use crate::provider::MovieReviews;

/// Handler that bridges the HTTP layer to the [`MovieReviews`] provider.
#[derive(Debug)]
pub struct MovieReviewsHandler {
    provider: Arc<MovieReviews>,
}

impl MovieReviewsHandler {
    /// Create a new handler wrapping a provider.
    #[must_use]
    pub fn new(provider: Arc<MovieReviews>) -> Self {
        Self { provider }
    }
}

impl ReviewHandler for MovieReviewsHandler {
    fn handle_operation(&self, op: ReviewOperation, request: ReviewRequest) -> HandlerFuture {
        let provider = Arc::clone(&self.provider);
        Box::pin(async move { dispatch(provider.as_ref(), op, request).await })
    }
}

/// Turn the request into the operation's input, call the provider and
/// serialize its output.
async fn dispatch(
    provider: &MovieReviews,
    op: ReviewOperation,
    request: ReviewRequest,
) -> Result<http::Response<ReviewResponseBody>, ReviewError> {
    if let Some(principal) = &request.principal {
        tracing::debug!(operation = %op, user = %principal.username, "authorized write");
    }
    let status = op.success_status();

    match op {
        ReviewOperation::AddReview => {
            let input: AddReviewInput = deserialize_required(&request.body)?;
            let output = provider.handle_add_review(input).await?;
            serialize_response(status, &output)
        }
        ReviewOperation::UpdateReview => {
            let input = UpdateReviewInput {
                movie_id: path_param(request.params.movie_id, "movieId")?,
                reviewer: path_param(request.params.reviewer, "reviewer")?,
                body: deserialize_optional::<UpdateReviewBody>(&request.body)?,
            };
            let output = provider.handle_update_review(input).await?;
            serialize_response(status, &output)
        }
        ReviewOperation::DeleteReview => {
            let input = DeleteReviewInput {
                movie_id: path_param(request.params.movie_id, "movieId")?,
                reviewer: path_param(request.params.reviewer, "reviewer")?,
            };
            let output = provider.handle_delete_review(input).await?;
            serialize_response(status, &output)
        }
        ReviewOperation::GetMovieReviews => {
            let input = GetMovieReviewsInput {
                movie_id: path_param(request.params.movie_id, "movieId")?,
                year: request.query.get("year").cloned(),
                min_rating: request.query.get("minRating").cloned(),
            };
            let output = provider.handle_get_movie_reviews(input).await?;
            serialize_response(status, &output)
        }
        ReviewOperation::GetReview => {
            let input = GetReviewInput {
                movie_id: path_param(request.params.movie_id, "movieId")?,
                reviewer: path_param(request.params.reviewer, "reviewer")?,
            };
            let output = provider.handle_get_review(input).await?;
            serialize_response(status, &output)
        }
        ReviewOperation::GetReviewerReviews => {
            let input = GetReviewerReviewsInput {
                reviewer: path_param(request.params.reviewer, "reviewer")?,
            };
            let output = provider.handle_get_reviewer_reviews(input).await?;
            serialize_response(status, &output)
        }
        ReviewOperation::GetReviewsByYear => {
            let input = GetReviewsByYearInput {
                movie_id: path_param(request.params.movie_id, "movieId")?,
                year: path_param(request.params.year, "year")?,
            };
            let output = provider.handle_get_reviews_by_year(input).await?;
            serialize_response(status, &output)
        }
        ReviewOperation::TranslateReview => {
            let input = TranslateReviewInput {
                movie_id: path_param(request.params.movie_id, "movieId")?,
                reviewer: path_param(request.params.reviewer, "reviewer")?,
                language: request.query.get("language").cloned(),
            };
            let output = provider.handle_translate_review(input).await?;
            serialize_response(status, &output)
        }
    }
}

fn path_param(value: Option<String>, name: &str) -> Result<String, ReviewError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ReviewError::bad_request(format!("Missing {name} in path parameters")))
}

/// Deserialize a JSON body that must be present.
fn deserialize_required<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ReviewError> {
    deserialize_optional(body)?.ok_or_else(|| ReviewError::bad_request("Missing request body"))
}

/// Deserialize a JSON body; an empty body is `None`.
fn deserialize_optional<T: serde::de::DeserializeOwned>(
    body: &[u8],
) -> Result<Option<T>, ReviewError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some).map_err(|e| {
        ReviewError::bad_request(format!("Failed to parse request body: {e}")).with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use hyper::service::Service;
    use moviereviews_auth::{SessionCookieAuthorizer, SessionSigner};
    use moviereviews_http::service::{ReviewHttpConfig, ReviewHttpService};

    use super::*;
    use crate::storage::InMemoryReviewStore;
    use crate::translate::DisabledTranslator;

    fn service(config: ReviewHttpConfig) -> ReviewHttpService<MovieReviewsHandler> {
        let provider = MovieReviews::new(
            Arc::new(InMemoryReviewStore::new()),
            Arc::new(DisabledTranslator),
        );
        ReviewHttpService::new(
            Arc::new(MovieReviewsHandler::new(Arc::new(provider))),
            config,
        )
    }

    fn open_service() -> ReviewHttpService<MovieReviewsHandler> {
        service(ReviewHttpConfig {
            skip_authorization: true,
            ..ReviewHttpConfig::default()
        })
    }

    async fn send(
        svc: &ReviewHttpService<MovieReviewsHandler>,
        method: http::Method,
        uri: &str,
        body: &str,
    ) -> (http::StatusCode, serde_json::Value) {
        let req = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_owned())))
            .unwrap();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const REVIEW: &str = r#"{
        "movieId": 1234,
        "reviewer": "joe",
        "rating": 8,
        "reviewText": "An absolute classic of the genre.",
        "reviewDate": "2023-10-20"
    }"#;

    #[tokio::test]
    async fn test_should_add_and_read_back_review() {
        let svc = open_service();
        let (status, json) = send(&svc, http::Method::POST, "/movies/reviews", REVIEW).await;
        assert_eq!(status, http::StatusCode::CREATED);
        assert_eq!(json["message"], "Review added");
        assert_eq!(json["reviewId"], "1234:joe");

        let (status, json) = send(&svc, http::Method::GET, "/movies/1234/reviews/joe", "").await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(json["data"][0]["reviewText"], "An absolute classic of the genre.");
        assert_eq!(json["data"][0]["movieId"], 1234);

        let (status, json) = send(&svc, http::Method::GET, "/movies/reviews/joe", "").await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_should_reject_missing_and_malformed_bodies() {
        let svc = open_service();
        let (status, json) = send(&svc, http::Method::POST, "/movies/reviews", "").await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Missing request body");

        let (status, _) = send(&svc, http::Method::POST, "/movies/reviews", "\"a string\"").await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);

        let (status, _) = send(&svc, http::Method::POST, "/movies/reviews", "{not json").await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_should_apply_query_parameters() {
        let svc = open_service();
        let reviews = [
            ("a", 5, "2020-01-01"),
            ("b", 9, "2020-05-01"),
            ("c", 10, "2021-01-01"),
        ];
        for (reviewer, rating, date) in reviews {
            let body = serde_json::json!({
                "movieId": 5,
                "reviewer": reviewer,
                "rating": rating,
                "reviewText": "Plenty of words in this review text.",
                "reviewDate": date,
            })
            .to_string();
            let (status, _) = send(&svc, http::Method::POST, "/movies/reviews", &body).await;
            assert_eq!(status, http::StatusCode::CREATED);
        }

        let (_, json) = send(&svc, http::Method::GET, "/movies/5/reviews?minRating=8", "").await;
        assert_eq!(json["data"].as_array().unwrap().len(), 2);

        let (_, json) = send(
            &svc,
            http::Method::GET,
            "/movies/5/reviews?minRating=8&year=2020",
            "",
        )
        .await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["reviewer"], "b");

        let (_, json) = send(&svc, http::Method::GET, "/movies/5/reviews/year/2021", "").await;
        assert_eq!(json["data"][0]["reviewer"], "c");

        let (status, json) = send(&svc, http::Method::GET, "/movies/5/reviews?minRating=x", "").await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "minRating must be a valid number");
    }

    #[tokio::test]
    async fn test_should_update_and_delete_through_http() {
        let svc = open_service();
        send(&svc, http::Method::POST, "/movies/reviews", REVIEW).await;

        let (status, json) = send(
            &svc,
            http::Method::PUT,
            "/movies/1234/reviews/joe",
            r#"{"reviewText": "Second viewing revealed even more."}"#,
        )
        .await;
        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(json["data"]["reviewText"], "Second viewing revealed even more.");

        let (status, json) = send(&svc, http::Method::PUT, "/movies/1234/reviews/joe", "").await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Missing required fields");

        let (status, _) = send(&svc, http::Method::DELETE, "/movies/1234/reviews/joe", "").await;
        assert_eq!(status, http::StatusCode::OK);

        let (status, json) = send(&svc, http::Method::DELETE, "/movies/1234/reviews/joe", "").await;
        assert_eq!(status, http::StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Review not found");
    }

    #[tokio::test]
    async fn test_should_report_translation_failure() {
        let svc = open_service();
        send(&svc, http::Method::POST, "/movies/reviews", REVIEW).await;

        let (status, json) = send(
            &svc,
            http::Method::GET,
            "/movies/1234/reviews/joe/translation?language=fr",
            "",
        )
        .await;
        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "unable to translate the message");
        assert_eq!(json["error"], "translation is disabled");
    }

    #[tokio::test]
    async fn test_should_guard_writes_with_session_cookie() {
        let signer = SessionSigner::new("handler-test");
        let svc = service(ReviewHttpConfig {
            authorizer: Some(Arc::new(SessionCookieAuthorizer::new(signer.clone()))),
            ..ReviewHttpConfig::default()
        });

        let (status, _) = send(&svc, http::Method::POST, "/movies/reviews", REVIEW).await;
        assert_eq!(status, http::StatusCode::UNAUTHORIZED);

        let token = signer.issue("joe", i64::MAX);
        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri("/movies/reviews")
            .header(http::header::COOKIE, format!("token={token}"))
            .body(Full::new(Bytes::from_static(REVIEW.as_bytes())))
            .unwrap();
        let resp = svc.call(req).await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::CREATED);

        let (status, _) = send(&svc, http::Method::GET, "/movies/1234/reviews", "").await;
        assert_eq!(status, http::StatusCode::OK);
    }
}
