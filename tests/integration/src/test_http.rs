//! Protocol-level integration tests.

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{client, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_health() {
        let resp = client().get(url("/health")).send().await.expect("health");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("health body");
        assert_eq!(body["services"]["reviews"], "running");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_cors_preflight() {
        let resp = client()
            .request(reqwest::Method::OPTIONS, url("/movies/reviews"))
            .send()
            .await
            .expect("preflight");
        assert_eq!(resp.status(), 204);
        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert!(
            headers["access-control-allow-methods"]
                .to_str()
                .expect("ascii header")
                .contains("DELETE")
        );
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_and_method_not_allowed() {
        let client = client();
        let resp = client.get(url("/films")).send().await.expect("unknown path");
        assert_eq!(resp.status(), 404);

        let resp = client
            .patch(url("/movies/1/reviews/joe"))
            .send()
            .await
            .expect("wrong method");
        assert_eq!(resp.status(), 405);
        assert!(resp.headers().contains_key("x-request-id"));
    }
}
