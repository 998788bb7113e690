//! Movie reviews HTTP service implementing the hyper `Service` trait.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, warn};

use moviereviews_auth::{Authorizer, Principal};
use moviereviews_model::error::{ReviewError, ReviewErrorCode};
use moviereviews_model::operations::ReviewOperation;
use moviereviews_model::review_error;

use crate::body::ReviewResponseBody;
use crate::dispatch::{ReviewHandler, ReviewRequest, dispatch_operation};
use crate::response::{
    CONTENT_TYPE, REQUEST_ID_HEADER, empty_response, error_to_response, json_response,
};
use crate::router::resolve_route;

/// Default cap on request body size.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

const ALLOW_METHODS: &str = "OPTIONS,GET,POST,PUT,PATCH,DELETE";
const ALLOW_HEADERS: &str = "Content-Type,X-Amz-Date";

/// Configuration for the movie reviews HTTP service.
#[derive(Clone)]
pub struct ReviewHttpConfig {
    /// Whether to let write operations through without a session.
    pub skip_authorization: bool,
    /// Authorizer for write operations.
    pub authorizer: Option<Arc<dyn Authorizer>>,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl std::fmt::Debug for ReviewHttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewHttpConfig")
            .field("skip_authorization", &self.skip_authorization)
            .field("authorizer", &self.authorizer.as_ref().map(|_| "..."))
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl Default for ReviewHttpConfig {
    fn default() -> Self {
        Self {
            skip_authorization: false,
            authorizer: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Hyper `Service` implementation for the movie reviews API.
///
/// Wraps a [`ReviewHandler`] implementation and routes incoming HTTP
/// requests to the matching review operation.
#[derive(Debug)]
pub struct ReviewHttpService<H: ReviewHandler> {
    handler: Arc<H>,
    config: Arc<ReviewHttpConfig>,
}

impl<H: ReviewHandler> ReviewHttpService<H> {
    /// Create a new `ReviewHttpService`.
    pub fn new(handler: Arc<H>, config: ReviewHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }
}

impl<H: ReviewHandler> Clone for ReviewHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H, B> hyper::service::Service<http::Request<B>> for ReviewHttpService<H>
where
    H: ReviewHandler,
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = http::Response<ReviewResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, handler.as_ref(), &config, &request_id).await;
            let response = add_common_headers(response, &request_id);
            Ok(response)
        })
    }
}

/// Process a single HTTP request through the full pipeline.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    config: &ReviewHttpConfig,
    request_id: &str,
) -> http::Response<ReviewResponseBody>
where
    H: ReviewHandler,
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, incoming) = req.into_parts();
    let path = parts.uri.path();
    debug!(method = %parts.method, path, request_id, "received request");

    // 1. CORS preflight.
    if parts.method == http::Method::OPTIONS {
        return preflight_response();
    }

    // 2. Health probe.
    if is_health_check(&parts.method, path) {
        return health_check_response();
    }

    // 3. Route.
    let route = match resolve_route(&parts.method, path) {
        Ok(route) => route,
        Err(err) => return error_to_response(&err, request_id),
    };

    // 4. Collect body.
    let body = match collect_body(incoming, config.max_body_bytes).await {
        Ok(body) => body,
        Err(err) => return error_to_response(&err, request_id),
    };

    // 5. Authorize write operations.
    let principal = match authorize(route.operation, &parts.headers, config) {
        Ok(principal) => principal,
        Err(err) => return error_to_response(&err, request_id),
    };

    // 6. Dispatch to handler.
    let request = ReviewRequest {
        params: route.params,
        query: parse_query(parts.uri.query()),
        body,
        principal,
    };
    match dispatch_operation(handler, route.operation, request).await {
        Ok(response) => response,
        Err(err) => {
            if err.status_code.is_server_error() {
                warn!(operation = %route.operation, error = %err, "operation failed");
            }
            error_to_response(&err, request_id)
        }
    }
}

/// Check the session of a write operation.
///
/// Returns `Ok(None)` for read operations and when authorization is skipped.
fn authorize(
    op: ReviewOperation,
    headers: &http::HeaderMap,
    config: &ReviewHttpConfig,
) -> Result<Option<Principal>, ReviewError> {
    if !op.requires_auth() || config.skip_authorization {
        return Ok(None);
    }

    let Some(authorizer) = config.authorizer.as_ref() else {
        return Err(review_error!(
            Forbidden,
            "No authorizer configured for write operations"
        ));
    };

    authorizer.authorize(headers).map(Some).map_err(|auth_err| {
        debug!(operation = %op, error = %auth_err, "authorization failed");
        let code = if auth_err.is_missing_credentials() {
            ReviewErrorCode::Unauthorized
        } else {
            ReviewErrorCode::Forbidden
        };
        ReviewError::with_message(code, auth_err.to_string()).with_source(auth_err)
    })
}

/// Collect the incoming body into a single `Bytes` buffer, up to `limit` bytes.
async fn collect_body<B>(incoming: B, limit: usize) -> Result<Bytes, ReviewError>
where
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(incoming, limit)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                ReviewError::with_message(
                    ReviewErrorCode::PayloadTooLarge,
                    format!("Request body exceeds {limit} bytes"),
                )
            } else {
                ReviewError::internal_error(format!("Failed to read request body: {e}"))
            }
        })
}

/// Decode a query string. The first occurrence of a key wins.
fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

fn health_check_response() -> http::Response<ReviewResponseBody> {
    json_response(
        http::StatusCode::OK,
        br#"{"services":{"reviews":"running"}}"#.to_vec(),
    )
}

fn preflight_response() -> http::Response<ReviewResponseBody> {
    let mut response = empty_response(http::StatusCode::NO_CONTENT);
    let headers = response.headers_mut();
    headers.insert(
        "access-control-allow-methods",
        http::HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        "access-control-allow-headers",
        http::HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        "access-control-allow-credentials",
        http::HeaderValue::from_static("true"),
    );
    response
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<ReviewResponseBody>,
    request_id: &str,
) -> http::Response<ReviewResponseBody> {
    let has_body = response.status() != http::StatusCode::NO_CONTENT;
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry(REQUEST_ID_HEADER).or_insert(hv);
    }

    if has_body {
        headers
            .entry("content-type")
            .or_insert(http::HeaderValue::from_static(CONTENT_TYPE));
    }

    headers.insert("server", http::HeaderValue::from_static("MovieReviews"));

    // CORS headers.
    headers.insert(
        "access-control-allow-origin",
        http::HeaderValue::from_static("*"),
    );

    response
}
