//! DynamoDB review store.
//!
//! Table layout:
//!
//! | attribute    | type | role                                          |
//! |--------------|------|-----------------------------------------------|
//! | `movieId`    | N    | partition key; date index partition key       |
//! | `reviewer`   | S    | sort key; reviewer index partition key        |
//! | `reviewDate` | S    | date index sort key                           |
//! | `rating`     | N    |                                               |
//! | `reviewText` | S    |                                               |

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use tokio::sync::OnceCell;
use tracing::debug;

use moviereviews_model::types::{Review, ReviewKey};

use crate::aws::AwsSettings;
use crate::query::ReviewLookup;
use crate::store::{ReviewStore, StoreError};

type Item = HashMap<String, AttributeValue>;

const MOVIE_ID: &str = "movieId";
const REVIEWER: &str = "reviewer";
const RATING: &str = "rating";
const REVIEW_TEXT: &str = "reviewText";
const REVIEW_DATE: &str = "reviewDate";

/// Table and index names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTable {
    /// Table name.
    pub table_name: String,
    /// Index keyed by `movieId`, sorted by `reviewDate`.
    pub date_index_name: String,
    /// Index keyed by `reviewer`.
    pub reviewer_index_name: String,
}

/// A [`ReviewStore`] backed by a DynamoDB table.
///
/// The SDK client is built on first use and reused by every later request.
#[derive(Debug)]
pub struct DynamoDbReviewStore {
    table: ReviewTable,
    settings: AwsSettings,
    client: OnceCell<aws_sdk_dynamodb::Client>,
}

impl DynamoDbReviewStore {
    /// Create a store that builds its client lazily.
    #[must_use]
    pub fn new(table: ReviewTable, settings: AwsSettings) -> Self {
        Self {
            table,
            settings,
            client: OnceCell::new(),
        }
    }

    /// Create a store around an existing client.
    #[must_use]
    pub fn with_client(table: ReviewTable, client: aws_sdk_dynamodb::Client) -> Self {
        let region = client
            .config()
            .region()
            .map_or_else(String::new, ToString::to_string);
        Self {
            table,
            settings: AwsSettings::new(region),
            client: OnceCell::new_with(Some(client)),
        }
    }

    async fn client(&self) -> &aws_sdk_dynamodb::Client {
        self.client
            .get_or_init(|| async { aws_sdk_dynamodb::Client::new(&self.settings.load().await) })
            .await
    }

    /// Run a query and follow `LastEvaluatedKey` until the result is complete.
    async fn query_all(
        &self,
        index_name: Option<&str>,
        key_condition: &str,
        values: Item,
    ) -> Result<Vec<Review>, StoreError> {
        let client = self.client().await;
        let mut reviews = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0_u32;

        loop {
            let output = client
                .query()
                .table_name(&self.table.table_name)
                .set_index_name(index_name.map(str::to_owned))
                .key_condition_expression(key_condition)
                .set_expression_attribute_values(Some(values.clone()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))?;
            pages += 1;

            for item in output.items() {
                reviews.push(item_to_review(item)?);
            }

            start_key = next_start_key(output.last_evaluated_key());
            if start_key.is_none() {
                break;
            }
        }

        debug!(index = ?index_name, pages, count = reviews.len(), "queried reviews table");
        Ok(reviews)
    }
}

#[async_trait]
impl ReviewStore for DynamoDbReviewStore {
    async fn get_review(&self, key: &ReviewKey) -> Result<Option<Review>, StoreError> {
        let output = self
            .client()
            .await
            .get_item()
            .table_name(&self.table.table_name)
            .set_key(Some(key_to_item(key)))
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))?;
        output.item().map(item_to_review).transpose()
    }

    async fn put_review(&self, review: Review) -> Result<Option<Review>, StoreError> {
        let output = self
            .client()
            .await
            .put_item()
            .table_name(&self.table.table_name)
            .set_item(Some(review_to_item(&review)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| StoreError::Backend(DisplayErrorContext(&e).to_string()))?;
        debug!(key = %review.key(), "put review item");
        output
            .attributes()
            .filter(|old| !old.is_empty())
            .map(item_to_review)
            .transpose()
    }

    async fn update_review_text(
        &self,
        key: &ReviewKey,
        review_text: &str,
    ) -> Result<Option<Review>, StoreError> {
        let result = self
            .client()
            .await
            .update_item()
            .table_name(&self.table.table_name)
            .set_key(Some(key_to_item(key)))
            .update_expression("SET #text = :text")
            .condition_expression("attribute_exists(#movie)")
            .expression_attribute_names("#text", REVIEW_TEXT)
            .expression_attribute_names("#movie", MOVIE_ID)
            .expression_attribute_values(":text", AttributeValue::S(review_text.to_owned()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => output.attributes().map(item_to_review).transpose(),
            Err(e) => {
                if e.as_service_error().is_some_and(is_missing_on_update) {
                    debug!(%key, "update skipped, review does not exist");
                    Ok(None)
                } else {
                    Err(StoreError::Backend(DisplayErrorContext(&e).to_string()))
                }
            }
        }
    }

    async fn delete_review(&self, key: &ReviewKey) -> Result<Option<Review>, StoreError> {
        let result = self
            .client()
            .await
            .delete_item()
            .table_name(&self.table.table_name)
            .set_key(Some(key_to_item(key)))
            .condition_expression("attribute_exists(#movie)")
            .expression_attribute_names("#movie", MOVIE_ID)
            .return_values(ReturnValue::AllOld)
            .send()
            .await;

        match result {
            Ok(output) => output.attributes().map(item_to_review).transpose(),
            Err(e) => {
                if e.as_service_error().is_some_and(is_missing_on_delete) {
                    debug!(%key, "delete skipped, review does not exist");
                    Ok(None)
                } else {
                    Err(StoreError::Backend(DisplayErrorContext(&e).to_string()))
                }
            }
        }
    }

    async fn query_reviews(&self, lookup: &ReviewLookup) -> Result<Vec<Review>, StoreError> {
        match store_request(&self.table, lookup) {
            StoreRequest::GetItem(key) => Ok(self.get_review(key).await?.into_iter().collect()),
            StoreRequest::Query(request) => {
                self.query_all(request.index_name, request.key_condition, request.values)
                    .await
            }
        }
    }
}

/// The DynamoDB call serving a lookup.
#[derive(Debug, Clone, PartialEq)]
enum StoreRequest<'a> {
    /// Point read of one item.
    GetItem(&'a ReviewKey),
    /// Query on the base table or an index.
    Query(QueryRequest<'a>),
}

/// The parts of a `Query` call that depend on the lookup.
#[derive(Debug, Clone, PartialEq)]
struct QueryRequest<'a> {
    index_name: Option<&'a str>,
    key_condition: &'static str,
    values: Item,
}

/// Translate a lookup into a point read or a table or index query.
fn store_request<'a>(table: &'a ReviewTable, lookup: &'a ReviewLookup) -> StoreRequest<'a> {
    let request = match lookup {
        ReviewLookup::ByKey(key) => return StoreRequest::GetItem(key),
        ReviewLookup::ByMovieAndYear { movie_id, year } => QueryRequest {
            index_name: Some(table.date_index_name.as_str()),
            key_condition: "movieId = :movieId AND begins_with(reviewDate, :year)",
            values: HashMap::from([
                (":movieId".to_owned(), number(*movie_id)),
                (":year".to_owned(), AttributeValue::S(year.clone())),
            ]),
        },
        ReviewLookup::ByReviewer(reviewer) => QueryRequest {
            index_name: Some(table.reviewer_index_name.as_str()),
            key_condition: "reviewer = :reviewer",
            values: HashMap::from([(
                ":reviewer".to_owned(),
                AttributeValue::S(reviewer.clone()),
            )]),
        },
        ReviewLookup::ByMovie(movie_id) => QueryRequest {
            index_name: None,
            key_condition: "movieId = :movieId",
            values: HashMap::from([(":movieId".to_owned(), number(*movie_id))]),
        },
    };
    StoreRequest::Query(request)
}

/// Start key of the next page, or `None` once the query is exhausted.
fn next_start_key(last_evaluated_key: Option<&Item>) -> Option<Item> {
    last_evaluated_key.filter(|key| !key.is_empty()).cloned()
}

fn is_missing_on_update(err: &UpdateItemError) -> bool {
    matches!(err, UpdateItemError::ConditionalCheckFailedException(_))
}

fn is_missing_on_delete(err: &DeleteItemError) -> bool {
    matches!(err, DeleteItemError::ConditionalCheckFailedException(_))
}

fn number(n: impl ToString) -> AttributeValue {
    AttributeValue::N(n.to_string())
}

fn key_to_item(key: &ReviewKey) -> Item {
    HashMap::from([
        (MOVIE_ID.to_owned(), number(key.movie_id)),
        (REVIEWER.to_owned(), AttributeValue::S(key.reviewer.clone())),
    ])
}

fn review_to_item(review: &Review) -> Item {
    HashMap::from([
        (MOVIE_ID.to_owned(), number(review.movie_id)),
        (REVIEWER.to_owned(), AttributeValue::S(review.reviewer.clone())),
        (RATING.to_owned(), number(review.rating)),
        (
            REVIEW_TEXT.to_owned(),
            AttributeValue::S(review.review_text.clone()),
        ),
        (
            REVIEW_DATE.to_owned(),
            AttributeValue::S(review.review_date.clone()),
        ),
    ])
}

fn item_to_review(item: &Item) -> Result<Review, StoreError> {
    Ok(Review {
        movie_id: number_attr(item, MOVIE_ID)?,
        reviewer: string_attr(item, REVIEWER)?,
        rating: number_attr(item, RATING)?,
        review_text: string_attr(item, REVIEW_TEXT)?,
        review_date: string_attr(item, REVIEW_DATE)?,
    })
}

fn string_attr(item: &Item, name: &str) -> Result<String, StoreError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::CorruptItem(format!("missing string attribute '{name}'")))
}

fn number_attr<T: std::str::FromStr>(item: &Item, name: &str) -> Result<T, StoreError> {
    item.get(name)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| StoreError::CorruptItem(format!("missing or invalid number '{name}'")))
}
