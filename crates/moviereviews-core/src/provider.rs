//! Movie reviews provider implementing every API operation.
//!
//! Each `handle_*` method validates its input before touching the store,
//! performs at most one state-changing store call and maps every failure to a
//! [`ReviewError`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use moviereviews_model::error::ReviewError;
use moviereviews_model::input::{
    AddReviewInput, DeleteReviewInput, GetMovieReviewsInput, GetReviewInput,
    GetReviewerReviewsInput, GetReviewsByYearInput, TranslateReviewInput, UpdateReviewInput,
};
use moviereviews_model::output::{
    AddReviewOutput, MessageOutput, ReviewListOutput, TranslateReviewOutput, UpdateReviewOutput,
};
use moviereviews_model::types::ReviewKey;

use crate::aws::AwsSettings;
use crate::config::{ReviewsConfig, StorageBackend};
use crate::dynamodb::{DynamoDbReviewStore, ReviewTable};
use crate::error::{store_error_to_review, translate_error_to_review};
use crate::query::{ReviewFilter, build_query_plan};
use crate::storage::InMemoryReviewStore;
use crate::store::ReviewStore;
use crate::translate::{AwsTranslator, DisabledTranslator, Translator};
use crate::validation::{
    parse_language, parse_min_rating, parse_movie_id, parse_reviewer, parse_year,
    review_from_input, validate_review_text,
};

/// The movie reviews business logic.
#[derive(Debug)]
pub struct MovieReviews {
    store: Arc<dyn ReviewStore>,
    translator: Arc<dyn Translator>,
    source_language: String,
}

impl MovieReviews {
    /// Create a provider over the given collaborators.
    ///
    /// Review texts are assumed to be English.
    #[must_use]
    pub fn new(store: Arc<dyn ReviewStore>, translator: Arc<dyn Translator>) -> Self {
        Self {
            store,
            translator,
            source_language: "en".to_owned(),
        }
    }

    /// Set the language review texts are written in.
    #[must_use]
    pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = language.into();
        self
    }

    /// Build the store and translator selected by `config`.
    #[must_use]
    pub fn from_config(config: &ReviewsConfig) -> Self {
        let mut aws = AwsSettings::new(config.region.clone());
        if let Some(endpoint_url) = &config.endpoint_url {
            aws = aws.with_endpoint_url(endpoint_url.clone());
        }

        let store: Arc<dyn ReviewStore> = match config.storage {
            StorageBackend::Memory => Arc::new(InMemoryReviewStore::new()),
            StorageBackend::DynamoDb => Arc::new(DynamoDbReviewStore::new(
                ReviewTable {
                    table_name: config.table_name.clone(),
                    date_index_name: config.date_index_name.clone(),
                    reviewer_index_name: config.reviewer_index_name.clone(),
                },
                aws.clone(),
            )),
        };
        let translator: Arc<dyn Translator> = if config.translate_enabled {
            Arc::new(AwsTranslator::new(aws))
        } else {
            Arc::new(DisabledTranslator)
        };

        Self::new(store, translator).with_source_language(config.source_language.clone())
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Store a review, overwriting any review with the same key.
    pub async fn handle_add_review(
        &self,
        input: AddReviewInput,
    ) -> Result<AddReviewOutput, ReviewError> {
        let review = review_from_input(input)?;
        let key = review.key();

        let replaced = self
            .store
            .put_review(review)
            .await
            .map_err(|e| store_error_to_review("Failed to add the review", e))?;
        if replaced.is_some() {
            warn!(%key, "add overwrote an existing review");
        }
        info!(%key, "review added");

        Ok(AddReviewOutput {
            message: "Review added".to_owned(),
            review_id: key.review_id(),
        })
    }

    /// Replace the text of an existing review.
    pub async fn handle_update_review(
        &self,
        input: UpdateReviewInput,
    ) -> Result<UpdateReviewOutput, ReviewError> {
        let review_text = input
            .body
            .and_then(|body| body.review_text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ReviewError::bad_request("Missing required fields"))?;
        let key = ReviewKey::new(
            parse_movie_id(&input.movie_id)?,
            parse_reviewer(&input.reviewer)?,
        );
        if !validate_review_text(&review_text) {
            return Err(ReviewError::bad_request(
                "reviewText must be longer than 20 characters",
            ));
        }

        let existing = self
            .store
            .get_review(&key)
            .await
            .map_err(|e| store_error_to_review("Failed to update the review", e))?;
        if existing.is_none() {
            return Err(ReviewError::not_found("Review not found"));
        }

        // The review may vanish between the check and the write.
        let updated = self
            .store
            .update_review_text(&key, &review_text)
            .await
            .map_err(|e| store_error_to_review("Failed to update the review", e))?
            .ok_or_else(|| ReviewError::not_found("Review not found"))?;
        info!(%key, "review updated");

        Ok(UpdateReviewOutput {
            message: "Review updated successfully".to_owned(),
            data: updated,
        })
    }

    /// Remove an existing review.
    pub async fn handle_delete_review(
        &self,
        input: DeleteReviewInput,
    ) -> Result<MessageOutput, ReviewError> {
        let key = ReviewKey::new(
            parse_movie_id(&input.movie_id)?,
            parse_reviewer(&input.reviewer)?,
        );

        let existing = self
            .store
            .get_review(&key)
            .await
            .map_err(|e| store_error_to_review("Failed to delete the review", e))?;
        if existing.is_none() {
            return Err(ReviewError::not_found("Review not found"));
        }

        self.store
            .delete_review(&key)
            .await
            .map_err(|e| store_error_to_review("Failed to delete the review", e))?
            .ok_or_else(|| ReviewError::not_found("Review not found"))?;
        info!(%key, "review deleted");

        Ok(MessageOutput::new("Review deleted successfully"))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// All reviews of a movie, optionally narrowed by year and minimum rating.
    ///
    /// An empty result is `NotFound`.
    pub async fn handle_get_movie_reviews(
        &self,
        input: GetMovieReviewsInput,
    ) -> Result<ReviewListOutput, ReviewError> {
        let filter = ReviewFilter {
            movie_id: Some(parse_movie_id(&input.movie_id)?),
            reviewer: None,
            year: input.year.as_deref().map(parse_year).transpose()?,
            min_rating: input.min_rating.as_deref().map(parse_min_rating).transpose()?,
        };
        let output = self.find(&filter).await?;
        if output.data.is_empty() {
            return Err(ReviewError::not_found("No reviews found for this movie"));
        }
        Ok(output)
    }

    /// The review of a movie by one reviewer, as a list of zero or one.
    pub async fn handle_get_review(
        &self,
        input: GetReviewInput,
    ) -> Result<ReviewListOutput, ReviewError> {
        let filter = ReviewFilter {
            movie_id: Some(parse_movie_id(&input.movie_id)?),
            reviewer: Some(parse_reviewer(&input.reviewer)?),
            ..ReviewFilter::default()
        };
        self.find(&filter).await
    }

    /// Every review written by one reviewer.
    pub async fn handle_get_reviewer_reviews(
        &self,
        input: GetReviewerReviewsInput,
    ) -> Result<ReviewListOutput, ReviewError> {
        let filter = ReviewFilter {
            reviewer: Some(parse_reviewer(&input.reviewer)?),
            ..ReviewFilter::default()
        };
        self.find(&filter).await
    }

    /// Reviews of a movie written in a given year.
    pub async fn handle_get_reviews_by_year(
        &self,
        input: GetReviewsByYearInput,
    ) -> Result<ReviewListOutput, ReviewError> {
        let filter = ReviewFilter {
            movie_id: Some(parse_movie_id(&input.movie_id)?),
            year: Some(parse_year(&input.year)?),
            ..ReviewFilter::default()
        };
        self.find(&filter).await
    }

    /// A review's text translated into another language.
    pub async fn handle_translate_review(
        &self,
        input: TranslateReviewInput,
    ) -> Result<TranslateReviewOutput, ReviewError> {
        let key = ReviewKey::new(
            parse_movie_id(&input.movie_id)?,
            parse_reviewer(&input.reviewer)?,
        );
        let language = parse_language(input.language.as_deref())?;

        let review = self
            .store
            .get_review(&key)
            .await
            .map_err(|e| store_error_to_review("Failed to fetch the review", e))?
            .ok_or_else(|| ReviewError::bad_request("Review not found"))?;

        let translated = self
            .translator
            .translate(&review.review_text, &self.source_language, &language)
            .await
            .map_err(|e| {
                warn!(%key, %language, error = %e, "translation failed");
                translate_error_to_review(e)
            })?;
        debug!(%key, %language, "review translated");

        Ok(TranslateReviewOutput {
            translate_text: translated,
        })
    }

    async fn find(&self, filter: &ReviewFilter) -> Result<ReviewListOutput, ReviewError> {
        let plan = build_query_plan(filter)?;
        let retrieved = self
            .store
            .query_reviews(&plan.lookup)
            .await
            .map_err(|e| store_error_to_review("Failed to fetch reviews", e))?;
        let retrieved_count = retrieved.len();
        let data = plan.apply(retrieved);
        debug!(
            lookup = plan.lookup.kind(),
            retrieved = retrieved_count,
            returned = data.len(),
            "reviews found"
        );
        Ok(ReviewListOutput { data })
    }
}
