//! Field predicates and parameter parsing.
//!
//! The `validate_*` functions are pure and total: they answer whether a value
//! is acceptable and never fail. The `parse_*` functions turn raw path and
//! query strings into typed values, mapping rejects to `BadRequest`.

use once_cell::sync::Lazy;
use regex::Regex;

use moviereviews_model::error::ReviewError;
use moviereviews_model::input::AddReviewInput;
use moviereviews_model::types::Review;

/// `YYYY-MM-DD`, checked lexically only.
pub static REVIEW_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Failed to compile review date regex")
});

/// Four digit year.
pub static YEAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("Failed to compile year regex"));

/// Language code such as `fr`, `pt-PT` or `zh-TW`.
pub static LANGUAGE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,8}(-[A-Za-z]{2,4})?$").expect("Failed to compile language code regex")
});

/// Smallest accepted rating.
pub const MIN_RATING: f64 = 1.0;
/// Largest accepted rating.
pub const MAX_RATING: f64 = 10.0;
/// Review texts must be strictly longer than this many characters.
pub const MIN_REVIEW_TEXT_CHARS: usize = 20;

/// Movie ids are positive.
#[must_use]
pub fn validate_movie_id(movie_id: i64) -> bool {
    movie_id > 0
}

/// Reviewer names are non-empty and contain no whitespace.
#[must_use]
pub fn validate_reviewer(reviewer: &str) -> bool {
    !reviewer.is_empty() && !reviewer.chars().any(char::is_whitespace)
}

/// Ratings are integers in `1..=10`.
#[must_use]
pub fn validate_rating(rating: f64) -> bool {
    rating.fract() == 0.0 && (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// Review texts are longer than 20 characters.
#[must_use]
pub fn validate_review_text(review_text: &str) -> bool {
    review_text.chars().count() > MIN_REVIEW_TEXT_CHARS
}

/// Lexical `YYYY-MM-DD`. Calendar validity is not checked, so `2099-99-99`
/// passes.
#[must_use]
pub fn validate_review_date(review_date: &str) -> bool {
    REVIEW_DATE_REGEX.is_match(review_date)
}

/// Lexical four digit year.
#[must_use]
pub fn validate_year(year: &str) -> bool {
    YEAR_REGEX.is_match(year)
}

/// Target language of a translation.
#[must_use]
pub fn validate_language_code(language: &str) -> bool {
    LANGUAGE_CODE_REGEX.is_match(language)
}

/// Every field present and valid.
#[must_use]
pub fn validate_review(input: &AddReviewInput) -> bool {
    first_invalid_field(input).is_none()
}

/// Returns a description of the first missing or invalid field.
fn first_invalid_field(input: &AddReviewInput) -> Option<&'static str> {
    if !input.movie_id.is_some_and(validate_movie_id) {
        return Some("movieId must be a positive number");
    }
    if !input.reviewer.as_deref().is_some_and(validate_reviewer) {
        return Some("reviewer must be a non-empty name without spaces");
    }
    if !input.rating.is_some_and(validate_rating) {
        return Some("rating must be a whole number between 1 and 10");
    }
    if !input.review_text.as_deref().is_some_and(validate_review_text) {
        return Some("reviewText must be longer than 20 characters");
    }
    if !input.review_date.as_deref().is_some_and(validate_review_date) {
        return Some("reviewDate must have the form YYYY-MM-DD");
    }
    None
}

/// Turn an add-review body into a [`Review`].
///
/// # Errors
///
/// Returns `BadRequest` naming the first missing or invalid field.
pub fn review_from_input(input: AddReviewInput) -> Result<Review, ReviewError> {
    if let Some(reason) = first_invalid_field(&input) {
        return Err(ReviewError::bad_request(format!("Invalid review: {reason}")));
    }
    let AddReviewInput {
        movie_id: Some(movie_id),
        reviewer: Some(reviewer),
        rating: Some(rating),
        review_text: Some(review_text),
        review_date: Some(review_date),
    } = input
    else {
        return Err(ReviewError::bad_request("Missing required fields"));
    };

    // Integral and within 1..=10 after validation.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rating = rating as u8;

    Ok(Review {
        movie_id: u64::try_from(movie_id)
            .map_err(|_| ReviewError::bad_request("movieId must be a valid number"))?,
        reviewer,
        rating,
        review_text,
        review_date,
    })
}

/// Parse a `movieId` path parameter.
///
/// # Errors
///
/// Returns `BadRequest` unless the value is a positive integer written as plain decimal digits.
pub fn parse_movie_id(raw: &str) -> Result<u64, ReviewError> {
    Some(raw)
        .filter(|raw| !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| validate_movie_id(*id))
        .and_then(|id| u64::try_from(id).ok())
        .ok_or_else(|| ReviewError::bad_request("movieId must be a valid number"))
}

/// Parse a `reviewer` path parameter.
///
/// # Errors
///
/// Returns `BadRequest` if the name is empty or contains whitespace.
pub fn parse_reviewer(raw: &str) -> Result<String, ReviewError> {
    if validate_reviewer(raw) {
        Ok(raw.to_owned())
    } else {
        Err(ReviewError::bad_request(
            "reviewer must be a non-empty name without spaces",
        ))
    }
}

/// Parse a `year` path or query parameter.
///
/// # Errors
///
/// Returns `BadRequest` unless the value is four digits.
pub fn parse_year(raw: &str) -> Result<String, ReviewError> {
    if validate_year(raw) {
        Ok(raw.to_owned())
    } else {
        Err(ReviewError::bad_request("year must be a four digit year"))
    }
}

/// Parse a `minRating` query parameter.
///
/// # Errors
///
/// Returns `BadRequest` unless the value is a finite number.
pub fn parse_min_rating(raw: &str) -> Result<f64, ReviewError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|rating| rating.is_finite())
        .ok_or_else(|| ReviewError::bad_request("minRating must be a valid number"))
}

/// Parse the `language` query parameter of a translation request.
///
/// # Errors
///
/// Returns `BadRequest` if the parameter is absent, empty or not a language
/// code.
pub fn parse_language(raw: Option<&str>) -> Result<String, ReviewError> {
    let language = raw
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ReviewError::bad_request("Missing language code in query parameters"))?;
    if validate_language_code(language) {
        Ok(language.to_owned())
    } else {
        Err(ReviewError::bad_request(format!(
            "'{language}' is not a valid language code"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> AddReviewInput {
        AddReviewInput {
            movie_id: Some(1234),
            reviewer: Some("joe".to_owned()),
            rating: Some(8.0),
            review_text: Some("An absolute classic of the genre.".to_owned()),
            review_date: Some("2023-10-20".to_owned()),
        }
    }

    #[test]
    fn test_should_accept_only_integral_ratings_in_range() {
        for rating in 1..=10 {
            assert!(validate_rating(f64::from(rating)), "rating {rating}");
        }
        for rating in [0.0, 11.0, -1.0, 7.5, 0.999, 10.01, f64::NAN, f64::INFINITY] {
            assert!(!validate_rating(rating), "rating {rating}");
        }
    }

    #[test]
    fn test_should_require_more_than_twenty_characters() {
        assert!(!validate_review_text(""));
        assert!(!validate_review_text(&"a".repeat(20)));
        assert!(validate_review_text(&"a".repeat(21)));
        // 21 characters, more than 21 bytes.
        assert!(validate_review_text(&"é".repeat(21)));
        assert!(!validate_review_text(&"é".repeat(20)));
    }

    #[test]
    fn test_should_check_dates_lexically() {
        assert!(validate_review_date("2023-10-20"));
        assert!(validate_review_date("2099-99-99"));
        assert!(!validate_review_date("2023-1-20"));
        assert!(!validate_review_date("2023-10-20T00:00:00"));
        assert!(!validate_review_date(" 2023-10-20"));
        assert!(!validate_review_date("２０２３-10-20"));
    }

    #[test]
    fn test_should_check_years_lexically() {
        assert!(validate_year("2020"));
        assert!(validate_year("0000"));
        assert!(!validate_year("20"));
        assert!(!validate_year("20201"));
        assert!(!validate_year("abcd"));
    }

    #[test]
    fn test_should_validate_movie_id_and_reviewer() {
        assert!(validate_movie_id(1));
        assert!(!validate_movie_id(0));
        assert!(!validate_movie_id(-3));
        assert!(validate_reviewer("joe"));
        assert!(!validate_reviewer(""));
        assert!(!validate_reviewer("joe bloggs"));
        assert!(!validate_reviewer("joe\tbloggs"));
    }

    #[test]
    fn test_should_validate_language_codes() {
        for code in ["fr", "de", "zh-TW", "pt-PT", "fil"] {
            assert!(validate_language_code(code), "code {code}");
        }
        for code in ["", "f", "fr_FR", "12", "fr-"] {
            assert!(!validate_language_code(code), "code {code}");
        }
    }

    #[test]
    fn test_should_validate_complete_review() {
        assert!(validate_review(&valid_input()));

        let mut missing = valid_input();
        missing.review_date = None;
        assert!(!validate_review(&missing));

        let mut short = valid_input();
        short.review_text = Some("too short".to_owned());
        assert!(!validate_review(&short));
    }

    #[test]
    fn test_should_build_review_from_valid_input() {
        let review = review_from_input(valid_input()).unwrap();
        assert_eq!(review.movie_id, 1234);
        assert_eq!(review.rating, 8);
        assert_eq!(review.reviewer, "joe");
    }

    #[test]
    fn test_should_name_first_invalid_field() {
        let mut input = valid_input();
        input.rating = Some(11.0);
        let err = review_from_input(input).unwrap_err();
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert!(err.message.contains("rating"));
    }

    #[test]
    fn test_should_parse_path_parameters() {
        assert_eq!(parse_movie_id("42").unwrap(), 42);
        assert!(parse_movie_id("0").is_err());
        assert!(parse_movie_id("abc").is_err());
        assert_eq!(
            parse_movie_id("abc").unwrap_err().message,
            "movieId must be a valid number"
        );
        assert_eq!(parse_year("2021").unwrap(), "2021");
        assert!(parse_year("21").is_err());
        assert_eq!(parse_min_rating("7.5").unwrap(), 7.5);
        assert!(parse_min_rating("high").is_err());
        assert!(parse_min_rating("NaN").is_err());
    }

    #[test]
    fn test_should_accept_only_plain_digits_as_movie_id() {
        assert_eq!(parse_movie_id("0042").unwrap(), 42);
        for raw in ["", " 5", "5 ", "+5", "-5", "5.0", "1e3", "99999999999999999999"] {
            assert!(parse_movie_id(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_should_require_language() {
        assert_eq!(
            parse_language(None).unwrap_err().message,
            "Missing language code in query parameters"
        );
        assert!(parse_language(Some("")).is_err());
        assert!(parse_language(Some("not a code")).is_err());
        assert_eq!(parse_language(Some("fr")).unwrap(), "fr");
    }
}
