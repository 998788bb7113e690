//! Input types, one per API operation.
//!
//! Path and query parameters arrive as raw strings and are validated by the
//! business logic layer before any store call. Request bodies keep their wire
//! types (`movieId` may be any integer, `rating` any number) so that range
//! checks produce a `BadRequest` instead of a deserialization failure.

use serde::{Deserialize, Serialize};

/// Body of `POST /movies/reviews`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewInput {
    /// The reviewed movie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<i64>,
    /// Name of the reviewer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    /// Rating; must be an integer in `1..=10`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Review text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
    /// Review date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_date: Option<String>,
}

/// `GET /movies/{movieId}/reviews?year=&minRating=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetMovieReviewsInput {
    /// Raw `movieId` path parameter.
    pub movie_id: String,
    /// Optional `year` query parameter.
    pub year: Option<String>,
    /// Optional `minRating` query parameter.
    pub min_rating: Option<String>,
}

/// `GET /movies/{movieId}/reviews/{reviewer}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetReviewInput {
    /// Raw `movieId` path parameter.
    pub movie_id: String,
    /// `reviewer` path parameter.
    pub reviewer: String,
}

/// `GET /movies/reviews/{reviewer}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetReviewerReviewsInput {
    /// `reviewer` path parameter.
    pub reviewer: String,
}

/// `GET /movies/{movieId}/reviews/year/{year}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetReviewsByYearInput {
    /// Raw `movieId` path parameter.
    pub movie_id: String,
    /// Raw `year` path parameter.
    pub year: String,
}

/// Body of `PUT /movies/{movieId}/reviews/{reviewer}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewBody {
    /// Replacement review text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
}

/// `PUT /movies/{movieId}/reviews/{reviewer}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReviewInput {
    /// Raw `movieId` path parameter.
    pub movie_id: String,
    /// `reviewer` path parameter.
    pub reviewer: String,
    /// Parsed request body, `None` when the request had no body.
    pub body: Option<UpdateReviewBody>,
}

/// `DELETE /movies/{movieId}/reviews/{reviewer}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReviewInput {
    /// Raw `movieId` path parameter.
    pub movie_id: String,
    /// `reviewer` path parameter.
    pub reviewer: String,
}

/// `GET /movies/{movieId}/reviews/{reviewer}/translation?language=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateReviewInput {
    /// Raw `movieId` path parameter.
    pub movie_id: String,
    /// `reviewer` path parameter.
    pub reviewer: String,
    /// Target language code from the `language` query parameter.
    pub language: Option<String>,
}
