//! Review lifecycle integration tests.

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        add_review, cleanup_review, client, review_body, session_cookie, test_movie_id,
        test_reviewer, url,
    };

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_add_and_get_review() {
        let client = client();
        let movie_id = test_movie_id();
        let reviewer = test_reviewer("add");

        let resp = client
            .post(url("/movies/reviews"))
            .header("cookie", session_cookie("integration"))
            .json(&review_body(movie_id, &reviewer, 8, "2023-10-20"))
            .send()
            .await
            .expect("add review");
        assert_eq!(resp.status(), 201);
        let body: Value = resp.json().await.expect("add review body");
        assert_eq!(body["message"], "Review added");
        assert_eq!(body["reviewId"], format!("{movie_id}:{reviewer}"));

        let resp = client
            .get(url(&format!("/movies/{movie_id}/reviews/{reviewer}")))
            .send()
            .await
            .expect("get review");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("get review body");
        let data = body["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["rating"], 8);
        assert_eq!(data[0]["reviewDate"], "2023-10-20");

        cleanup_review(&client, movie_id, &reviewer).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_filter_movie_reviews_by_min_rating() {
        let client = client();
        let movie_id = test_movie_id();
        let reviewers: Vec<String> = (0..4).map(|_| test_reviewer("min")).collect();
        for (reviewer, rating) in reviewers.iter().zip([5, 9, 10, 7]) {
            add_review(&client, &review_body(movie_id, reviewer, rating, "2022-05-01")).await;
        }

        let resp = client
            .get(url(&format!("/movies/{movie_id}/reviews?minRating=8")))
            .send()
            .await
            .expect("get movie reviews");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("movie reviews body");
        let mut ratings: Vec<i64> = body["data"]
            .as_array()
            .expect("data array")
            .iter()
            .filter_map(|r| r["rating"].as_i64())
            .collect();
        ratings.sort_unstable();
        assert_eq!(ratings, vec![9, 10]);

        for reviewer in &reviewers {
            cleanup_review(&client, movie_id, reviewer).await;
        }
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_get_reviews_by_year_and_reviewer() {
        let client = client();
        let movie_id = test_movie_id();
        let reviewer = test_reviewer("year");
        let other = test_reviewer("year");
        add_review(&client, &review_body(movie_id, &reviewer, 6, "2020-03-04")).await;
        add_review(&client, &review_body(movie_id, &other, 7, "2021-03-04")).await;

        let resp = client
            .get(url(&format!("/movies/{movie_id}/reviews/year/2020")))
            .send()
            .await
            .expect("get by year");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("by year body");
        let data = body["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["reviewer"], reviewer.as_str());

        let resp = client
            .get(url(&format!("/movies/reviews/{other}")))
            .send()
            .await
            .expect("get by reviewer");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("by reviewer body");
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

        cleanup_review(&client, movie_id, &reviewer).await;
        cleanup_review(&client, movie_id, &other).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_update_then_delete_review() {
        let client = client();
        let movie_id = test_movie_id();
        let reviewer = test_reviewer("upd");
        add_review(&client, &review_body(movie_id, &reviewer, 4, "2024-01-15")).await;

        let path = format!("/movies/{movie_id}/reviews/{reviewer}");
        let resp = client
            .put(url(&path))
            .header("cookie", session_cookie("integration"))
            .json(&json!({ "reviewText": "Better on a second viewing, honestly." }))
            .send()
            .await
            .expect("update review");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("update body");
        assert_eq!(body["message"], "Review updated successfully");
        assert_eq!(
            body["data"]["reviewText"],
            "Better on a second viewing, honestly."
        );

        let resp = client
            .delete(url(&path))
            .header("cookie", session_cookie("integration"))
            .send()
            .await
            .expect("delete review");
        assert_eq!(resp.status(), 200);

        let resp = client
            .delete(url(&path))
            .header("cookie", session_cookie("integration"))
            .send()
            .await
            .expect("delete review again");
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_review() {
        let client = client();
        let mut body = review_body(test_movie_id(), &test_reviewer("bad"), 11, "2024-01-15");

        let resp = client
            .post(url("/movies/reviews"))
            .header("cookie", session_cookie("integration"))
            .json(&body)
            .send()
            .await
            .expect("add invalid review");
        assert_eq!(resp.status(), 400);

        body["rating"] = json!(7);
        body["reviewText"] = json!("too short");
        let resp = client
            .post(url("/movies/reviews"))
            .header("cookie", session_cookie("integration"))
            .json(&body)
            .send()
            .await
            .expect("add short review");
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unreviewed_movie() {
        let client = client();
        let resp = client
            .get(url(&format!("/movies/{}/reviews", test_movie_id())))
            .send()
            .await
            .expect("get movie reviews");
        assert_eq!(resp.status(), 404);
        let body: Value = resp.json().await.expect("not found body");
        assert_eq!(body["message"], "No reviews found for this movie");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_require_language_for_translation() {
        let client = client();
        let resp = client
            .get(url(&format!(
                "/movies/{}/reviews/someone/translation",
                test_movie_id()
            )))
            .send()
            .await
            .expect("translate review");
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.expect("translate body");
        assert_eq!(body["message"], "Missing language code in query parameters");
    }
}
