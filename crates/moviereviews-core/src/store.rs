//! The review store interface.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use moviereviews_model::types::{Review, ReviewKey};

use crate::query::ReviewLookup;

/// Errors raised by a review store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the request.
    #[error("{0}")]
    Backend(String),
    /// A stored item could not be read back as a review.
    #[error("corrupt review item: {0}")]
    CorruptItem(String),
}

/// Persistence for reviews.
///
/// Each call is atomic for the single item it touches; there are no
/// multi-item transactions. Concurrent writers to the same key race and the
/// last one wins.
#[async_trait]
pub trait ReviewStore: Send + Sync + fmt::Debug {
    /// Point lookup by primary key.
    async fn get_review(&self, key: &ReviewKey) -> Result<Option<Review>, StoreError>;

    /// Insert or overwrite a review. Returns the review it replaced, if any.
    async fn put_review(&self, review: Review) -> Result<Option<Review>, StoreError>;

    /// Replace the text of an existing review.
    ///
    /// Returns the updated review, or `None` without writing anything when no
    /// review exists under `key`.
    async fn update_review_text(
        &self,
        key: &ReviewKey,
        review_text: &str,
    ) -> Result<Option<Review>, StoreError>;

    /// Remove a review. Returns the removed review, or `None` if there was none.
    async fn delete_review(&self, key: &ReviewKey) -> Result<Option<Review>, StoreError>;

    /// Read the reviews matched by a lookup.
    async fn query_reviews(&self, lookup: &ReviewLookup) -> Result<Vec<Review>, StoreError>;
}
