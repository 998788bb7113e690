//! Session cookie integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, review_body, test_movie_id, test_reviewer, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_write_without_cookie() {
        let client = client();
        let resp = client
            .post(url("/movies/reviews"))
            .json(&review_body(test_movie_id(), &test_reviewer("anon"), 7, "2024-02-02"))
            .send()
            .await
            .expect("add review without cookie");
        assert_eq!(resp.status(), 401);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_write_with_forged_cookie() {
        let client = client();
        let resp = client
            .delete(url(&format!("/movies/{}/reviews/someone", test_movie_id())))
            .header("cookie", "token=YWxpY2U.4102444800.deadbeef")
            .send()
            .await
            .expect("delete with forged cookie");
        assert_eq!(resp.status(), 403);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_allow_reads_without_cookie() {
        let client = client();
        let resp = client
            .get(url(&format!("/movies/reviews/{}", test_reviewer("reader"))))
            .send()
            .await
            .expect("get reviewer reviews");
        assert_eq!(resp.status(), 200);
    }
}
