//! Movie reviews operation enum.

use std::fmt;

/// All operations exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewOperation {
    // Writes
    /// Create (or overwrite) a review.
    AddReview,
    /// Replace the text of an existing review.
    UpdateReview,
    /// Remove an existing review.
    DeleteReview,

    // Reads
    /// All reviews of a movie, optionally filtered by year and minimum rating.
    GetMovieReviews,
    /// The review of a movie by one reviewer.
    GetReview,
    /// All reviews written by one reviewer across movies.
    GetReviewerReviews,
    /// Reviews of a movie written in a given year.
    GetReviewsByYear,
    /// A review's text translated into another language.
    TranslateReview,
}

impl ReviewOperation {
    /// Returns the operation name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddReview => "AddReview",
            Self::UpdateReview => "UpdateReview",
            Self::DeleteReview => "DeleteReview",
            Self::GetMovieReviews => "GetMovieReviews",
            Self::GetReview => "GetReview",
            Self::GetReviewerReviews => "GetReviewerReviews",
            Self::GetReviewsByYear => "GetReviewsByYear",
            Self::TranslateReview => "TranslateReview",
        }
    }

    /// Whether the operation mutates state and therefore needs an
    /// authenticated session.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::AddReview | Self::UpdateReview | Self::DeleteReview
        )
    }

    /// Status code of a successful response.
    #[must_use]
    pub fn success_status(&self) -> http::StatusCode {
        match self {
            Self::AddReview => http::StatusCode::CREATED,
            _ => http::StatusCode::OK,
        }
    }
}

impl fmt::Display for ReviewOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
