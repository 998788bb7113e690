//! Request router.
//!
//! Routes are matched on path segments after empty segments are dropped, so
//! trailing slashes are ignored. Each segment is percent-decoded before it is
//! compared or captured.
//!
//! ```text
//! POST   /movies/reviews                                   AddReview
//! GET    /movies/reviews/{reviewer}                        GetReviewerReviews
//! GET    /movies/{movieId}/reviews                         GetMovieReviews
//! GET    /movies/{movieId}/reviews/{reviewer}              GetReview
//! PUT    /movies/{movieId}/reviews/{reviewer}              UpdateReview
//! DELETE /movies/{movieId}/reviews/{reviewer}              DeleteReview
//! GET    /movies/{movieId}/reviews/{reviewer}/translation  TranslateReview
//! GET    /movies/{movieId}/reviews/year/{year}             GetReviewsByYear
//! ```
//!
//! The literal `reviews` in the second segment wins over a movie id, and the
//! `translation` suffix wins over the `year` form.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use moviereviews_model::error::ReviewError;
use moviereviews_model::operations::ReviewOperation;

/// Parameters captured from the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    /// Raw `{movieId}` segment.
    pub movie_id: Option<String>,
    /// `{reviewer}` segment.
    pub reviewer: Option<String>,
    /// Raw `{year}` segment.
    pub year: Option<String>,
}

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The operation to dispatch.
    pub operation: ReviewOperation,
    /// Captured path parameters.
    pub params: PathParams,
}

/// Methods accepted by one path shape.
type MethodTable = &'static [(http::Method, ReviewOperation)];

const COLLECTION: MethodTable = &[(http::Method::POST, ReviewOperation::AddReview)];
const REVIEWER: MethodTable = &[(http::Method::GET, ReviewOperation::GetReviewerReviews)];
const MOVIE: MethodTable = &[(http::Method::GET, ReviewOperation::GetMovieReviews)];
const MOVIE_REVIEWER: MethodTable = &[
    (http::Method::GET, ReviewOperation::GetReview),
    (http::Method::PUT, ReviewOperation::UpdateReview),
    (http::Method::DELETE, ReviewOperation::DeleteReview),
];
const TRANSLATION: MethodTable = &[(http::Method::GET, ReviewOperation::TranslateReview)];
const MOVIE_YEAR: MethodTable = &[(http::Method::GET, ReviewOperation::GetReviewsByYear)];

/// Resolve an operation from the request method and path.
///
/// # Errors
///
/// Returns a `NotFound` error when no route matches the path, or a
/// `MethodNotAllowed` error when the path matches but the method does not.
pub fn resolve_route(method: &http::Method, path: &str) -> Result<RouteMatch, ReviewError> {
    let segments: Vec<Cow<'_, str>> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
        .collect();
    let segments: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();

    let (table, params) =
        match_path(&segments).ok_or_else(|| ReviewError::unknown_route(method, path))?;

    table
        .iter()
        .find(|(allowed, _)| allowed == method)
        .map(|(_, operation)| RouteMatch {
            operation: *operation,
            params,
        })
        .ok_or_else(|| ReviewError::method_not_allowed(method, path))
}

fn match_path(segments: &[&str]) -> Option<(MethodTable, PathParams)> {
    let matched = match segments {
        ["movies", "reviews"] => (COLLECTION, PathParams::default()),
        ["movies", "reviews", reviewer] => (
            REVIEWER,
            PathParams {
                reviewer: Some((*reviewer).to_owned()),
                ..PathParams::default()
            },
        ),
        ["movies", movie_id, "reviews"] => (
            MOVIE,
            PathParams {
                movie_id: Some((*movie_id).to_owned()),
                ..PathParams::default()
            },
        ),
        ["movies", movie_id, "reviews", reviewer] => (
            MOVIE_REVIEWER,
            PathParams {
                movie_id: Some((*movie_id).to_owned()),
                reviewer: Some((*reviewer).to_owned()),
                year: None,
            },
        ),
        ["movies", movie_id, "reviews", reviewer, "translation"] => (
            TRANSLATION,
            PathParams {
                movie_id: Some((*movie_id).to_owned()),
                reviewer: Some((*reviewer).to_owned()),
                year: None,
            },
        ),
        ["movies", movie_id, "reviews", "year", year] => (
            MOVIE_YEAR,
            PathParams {
                movie_id: Some((*movie_id).to_owned()),
                reviewer: None,
                year: Some((*year).to_owned()),
            },
        ),
        _ => return None,
    };
    Some(matched)
}
