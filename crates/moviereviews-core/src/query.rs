//! Query planning.
//!
//! A [`ReviewFilter`] says which reviews a caller wants. [`build_query_plan`]
//! picks the cheapest access path the store offers for it, first match wins:
//!
//! | movie | reviewer | year | access path                          |
//! |-------|----------|------|--------------------------------------|
//! | yes   | yes      | any  | point lookup on the primary key      |
//! | yes   | no       | yes  | date index, `reviewDate` prefix      |
//! | no    | yes      | any  | reviewer index                       |
//! | yes   | no       | no   | movie partition                      |
//!
//! The minimum rating is never pushed to the store; [`QueryPlan::apply`]
//! filters the retrieved items in memory. A year that the chosen access path
//! cannot express is applied the same way.

use moviereviews_model::error::ReviewError;
use moviereviews_model::types::{Review, ReviewKey};

/// What the caller asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    /// Restrict to one movie.
    pub movie_id: Option<u64>,
    /// Restrict to one reviewer.
    pub reviewer: Option<String>,
    /// Restrict to reviews whose `reviewDate` starts with this year.
    pub year: Option<String>,
    /// Keep reviews rated at least this much.
    pub min_rating: Option<f64>,
}

/// How the store is asked for reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewLookup {
    /// At most one review, by primary key.
    ByKey(ReviewKey),
    /// One movie's reviews whose `reviewDate` starts with `year`.
    ByMovieAndYear {
        /// Partition to read.
        movie_id: u64,
        /// `reviewDate` prefix.
        year: String,
    },
    /// All reviews by one reviewer.
    ByReviewer(String),
    /// All reviews of one movie.
    ByMovie(u64),
}

impl ReviewLookup {
    /// Short name used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ByKey(_) => "key",
            Self::ByMovieAndYear { .. } => "movie-year-index",
            Self::ByReviewer(_) => "reviewer-index",
            Self::ByMovie(_) => "movie-partition",
        }
    }
}

/// A store lookup plus the filters applied after it.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// The store access path.
    pub lookup: ReviewLookup,
    /// Minimum rating, applied after retrieval.
    pub min_rating: Option<f64>,
    /// `reviewDate` prefix the lookup does not already enforce.
    pub date_prefix: Option<String>,
}

impl QueryPlan {
    /// Whether the plan reads a single item by key.
    #[must_use]
    pub fn is_point_lookup(&self) -> bool {
        matches!(self.lookup, ReviewLookup::ByKey(_))
    }

    /// Drop retrieved reviews that fail the post-filters. Order is kept.
    #[must_use]
    pub fn apply(&self, reviews: Vec<Review>) -> Vec<Review> {
        reviews
            .into_iter()
            .filter(|review| {
                self.min_rating
                    .is_none_or(|min| f64::from(review.rating) >= min)
            })
            .filter(|review| {
                self.date_prefix
                    .as_deref()
                    .is_none_or(|prefix| review.review_date.starts_with(prefix))
            })
            .collect()
    }
}

/// Choose the access path for a filter.
///
/// # Errors
///
/// Returns `BadRequest` when the filter names neither a movie nor a reviewer,
/// which would require a full table scan.
pub fn build_query_plan(filter: &ReviewFilter) -> Result<QueryPlan, ReviewError> {
    let (lookup, date_prefix) = match (filter.movie_id, filter.reviewer.as_ref(), &filter.year) {
        (Some(movie_id), Some(reviewer), year) => (
            ReviewLookup::ByKey(ReviewKey::new(movie_id, reviewer.clone())),
            year.clone(),
        ),
        (Some(movie_id), None, Some(year)) => (
            ReviewLookup::ByMovieAndYear {
                movie_id,
                year: year.clone(),
            },
            None,
        ),
        (None, Some(reviewer), year) => (ReviewLookup::ByReviewer(reviewer.clone()), year.clone()),
        (Some(movie_id), None, None) => (ReviewLookup::ByMovie(movie_id), None),
        (None, None, _) => {
            return Err(ReviewError::bad_request(
                "A movieId or a reviewer is required",
            ));
        }
    };

    Ok(QueryPlan {
        lookup,
        min_rating: filter.min_rating,
        date_prefix,
    })
}
