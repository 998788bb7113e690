//! Output types for the API operations.

use serde::{Deserialize, Serialize};

use crate::types::Review;

/// Response to a successful add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewOutput {
    /// Human readable status.
    pub message: String,
    /// Identifier of the stored review (`movieId:reviewer`).
    pub review_id: String,
}

/// A list of reviews. Used by every read path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewListOutput {
    /// Matching reviews, possibly empty.
    pub data: Vec<Review>,
}

/// Response to a successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReviewOutput {
    /// Human readable status.
    pub message: String,
    /// The review after the update.
    pub data: Review,
}

/// A bare status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOutput {
    /// Human readable status.
    pub message: String,
}

impl MessageOutput {
    /// Create a new message output.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response to a successful translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateReviewOutput {
    /// The review text in the requested language.
    pub translate_text: String,
}
