//! Handler trait and operation dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use moviereviews_auth::Principal;
use moviereviews_model::error::ReviewError;
use moviereviews_model::operations::ReviewOperation;

use crate::body::ReviewResponseBody;
use crate::router::PathParams;

/// Everything the business logic needs from an HTTP request.
#[derive(Debug, Clone, Default)]
pub struct ReviewRequest {
    /// Percent-decoded path parameters.
    pub params: PathParams,
    /// Decoded query string. The first occurrence of a key wins.
    pub query: HashMap<String, String>,
    /// Raw request body.
    pub body: Bytes,
    /// The authenticated caller, present on authorized write operations.
    pub principal: Option<Principal>,
}

impl ReviewRequest {
    /// Returns a query parameter by name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// Future returned by [`ReviewHandler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<ReviewResponseBody>, ReviewError>> + Send>>;

/// Trait that the movie reviews business logic must implement.
///
/// The handler receives the routed operation and the decoded request, and
/// returns a complete HTTP response. This trait is the boundary between the
/// HTTP transport layer and the business logic layer.
pub trait ReviewHandler: Send + Sync + 'static {
    /// Handle an operation and produce an HTTP response.
    fn handle_operation(&self, op: ReviewOperation, request: ReviewRequest) -> HandlerFuture;
}

/// Dispatch an operation to the handler.
pub async fn dispatch_operation<H: ReviewHandler>(
    handler: &H,
    op: ReviewOperation,
    request: ReviewRequest,
) -> Result<http::Response<ReviewResponseBody>, ReviewError> {
    tracing::debug!(operation = %op, "dispatching review operation");
    handler.handle_operation(op, request).await
}
