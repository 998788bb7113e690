//! In-memory review store.
//!
//! Reviews live in per-movie partitions with concurrent partition-level
//! access via [`DashMap`]. Each partition is a [`BTreeMap`] keyed by reviewer,
//! so partition reads come back in reviewer order. A second map plays the
//! part of the reviewer index.
//!
//! ```text
//! partitions:  DashMap<movieId, BTreeMap<reviewer, Review>>
//! by_reviewer: DashMap<reviewer, BTreeSet<movieId>>
//! ```
//!
//! Writers insert into a partition before indexing the reviewer. When both
//! maps are locked at once, `by_reviewer` is always taken first.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use moviereviews_model::types::{Review, ReviewKey};

use crate::query::ReviewLookup;
use crate::store::{ReviewStore, StoreError};

/// A [`ReviewStore`] held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    partitions: DashMap<u64, BTreeMap<String, Review>>,
    by_reviewer: DashMap<String, BTreeSet<u64>>,
}

impl InMemoryReviewStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reviews.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.iter().map(|p| p.value().len()).sum()
    }

    /// Whether the store holds no reviews.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &ReviewKey) -> Option<Review> {
        self.partitions
            .get(&key.movie_id)
            .and_then(|partition| partition.get(&key.reviewer).cloned())
    }

    fn movie_reviews(&self, movie_id: u64) -> Vec<Review> {
        self.partitions
            .get(&movie_id)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default()
    }

    fn reviewer_reviews(&self, reviewer: &str) -> Vec<Review> {
        let movie_ids: Vec<u64> = self
            .by_reviewer
            .get(reviewer)
            .map(|movies| movies.iter().copied().collect())
            .unwrap_or_default();
        movie_ids
            .into_iter()
            .filter_map(|movie_id| self.get(&ReviewKey::new(movie_id, reviewer)))
            .collect()
    }

    /// Drop `key` from the reviewer index unless the review was stored again
    /// after it was removed from its partition.
    fn unindex(&self, key: &ReviewKey) {
        if let Some(mut movies) = self.by_reviewer.get_mut(&key.reviewer) {
            let restored = self
                .partitions
                .get(&key.movie_id)
                .is_some_and(|partition| partition.contains_key(&key.reviewer));
            if !restored {
                movies.remove(&key.movie_id);
            }
        }
        self.by_reviewer
            .remove_if(&key.reviewer, |_, movies| movies.is_empty());
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn get_review(&self, key: &ReviewKey) -> Result<Option<Review>, StoreError> {
        Ok(self.get(key))
    }

    async fn put_review(&self, review: Review) -> Result<Option<Review>, StoreError> {
        let key = review.key();
        let replaced = {
            let mut partition = self.partitions.entry(key.movie_id).or_default();
            partition.insert(key.reviewer.clone(), review)
        };
        self.by_reviewer
            .entry(key.reviewer.clone())
            .or_default()
            .insert(key.movie_id);

        debug!(%key, replaced = replaced.is_some(), "stored review");
        Ok(replaced)
    }

    async fn update_review_text(
        &self,
        key: &ReviewKey,
        review_text: &str,
    ) -> Result<Option<Review>, StoreError> {
        let Some(mut partition) = self.partitions.get_mut(&key.movie_id) else {
            return Ok(None);
        };
        let updated = partition.get_mut(&key.reviewer).map(|review| {
            review_text.clone_into(&mut review.review_text);
            review.clone()
        });
        debug!(%key, found = updated.is_some(), "updated review text");
        Ok(updated)
    }

    async fn delete_review(&self, key: &ReviewKey) -> Result<Option<Review>, StoreError> {
        let removed = {
            let Some(mut partition) = self.partitions.get_mut(&key.movie_id) else {
                return Ok(None);
            };
            partition.remove(&key.reviewer)
        };
        if removed.is_some() {
            self.partitions
                .remove_if(&key.movie_id, |_, partition| partition.is_empty());
            self.unindex(key);
        }
        debug!(%key, found = removed.is_some(), "deleted review");
        Ok(removed)
    }

    async fn query_reviews(&self, lookup: &ReviewLookup) -> Result<Vec<Review>, StoreError> {
        let reviews = match lookup {
            ReviewLookup::ByKey(key) => self.get(key).into_iter().collect(),
            ReviewLookup::ByMovieAndYear { movie_id, year } => {
                let mut reviews: Vec<Review> = self
                    .movie_reviews(*movie_id)
                    .into_iter()
                    .filter(|review| review.review_date.starts_with(year.as_str()))
                    .collect();
                reviews.sort_by(|a, b| {
                    a.review_date
                        .cmp(&b.review_date)
                        .then_with(|| a.reviewer.cmp(&b.reviewer))
                });
                reviews
            }
            ReviewLookup::ByReviewer(reviewer) => self.reviewer_reviews(reviewer),
            ReviewLookup::ByMovie(movie_id) => self.movie_reviews(*movie_id),
        };
        debug!(lookup = lookup.kind(), count = reviews.len(), "queried reviews");
        Ok(reviews)
    }
}
