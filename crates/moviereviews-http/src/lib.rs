//! HTTP service layer for the movie reviews API.
//!
//! This crate turns HTTP requests into [`ReviewOperation`] calls:
//!
//! - **Router**: Maps `(method, path)` to an operation and its path parameters
//! - **Handler trait**: Defines the boundary between HTTP and business logic
//! - **Service**: Hyper `Service` implementation with CORS, health probe,
//!   body limits and session authorization for write operations
//! - **Response helpers**: JSON success/error response formatting
//!
//! [`ReviewOperation`]: moviereviews_model::ReviewOperation
#![allow(missing_docs)]

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use body::ReviewResponseBody;
pub use dispatch::{ReviewHandler, ReviewRequest};
pub use router::{PathParams, RouteMatch, resolve_route};
pub use service::{ReviewHttpConfig, ReviewHttpService};
