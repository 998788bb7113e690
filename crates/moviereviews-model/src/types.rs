//! The canonical review record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single review of one movie by one reviewer.
///
/// `(movie_id, reviewer)` is the primary key: at most one review exists per
/// reviewer per movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// The reviewed movie. Always positive.
    pub movie_id: u64,
    /// Name of the reviewer. Non-empty, no whitespace.
    pub reviewer: String,
    /// Rating in `1..=10`.
    pub rating: u8,
    /// Free text, more than 20 characters.
    pub review_text: String,
    /// Date the review was written, `YYYY-MM-DD`.
    pub review_date: String,
}

impl Review {
    /// Returns the primary key of this review.
    #[must_use]
    pub fn key(&self) -> ReviewKey {
        ReviewKey::new(self.movie_id, self.reviewer.clone())
    }
}

/// Primary key of a [`Review`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReviewKey {
    /// Partition component.
    pub movie_id: u64,
    /// Sort component.
    pub reviewer: String,
}

impl ReviewKey {
    /// Create a new key.
    #[must_use]
    pub fn new(movie_id: u64, reviewer: impl Into<String>) -> Self {
        Self {
            movie_id,
            reviewer: reviewer.into(),
        }
    }

    /// The identifier echoed back to clients after a review is added.
    #[must_use]
    pub fn review_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReviewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.movie_id, self.reviewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_review_with_camel_case_names() {
        let review = Review {
            movie_id: 1234,
            reviewer: "joe".to_owned(),
            rating: 8,
            review_text: "A genuinely wonderful film to watch.".to_owned(),
            review_date: "2023-10-20".to_owned(),
        };
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["movieId"], 1234);
        assert_eq!(json["reviewer"], "joe");
        assert_eq!(json["reviewText"], "A genuinely wonderful film to watch.");
        assert_eq!(json["reviewDate"], "2023-10-20");
    }

    #[test]
    fn test_should_format_review_id_from_key() {
        let key = ReviewKey::new(42, "alice");
        assert_eq!(key.review_id(), "42:alice");
    }
}
