//! Model types for the movie reviews API.
//!
//! This crate holds the canonical [`Review`] record, one tagged input struct
//! per API operation, the JSON output shapes, the [`ReviewOperation`] enum
//! and the [`ReviewError`] type shared by the HTTP and business logic layers.
//!
//! All wire names are `camelCase` (`movieId`, `reviewText`, ...).
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use error::{ReviewError, ReviewErrorCode};
pub use operations::ReviewOperation;
pub use types::{Review, ReviewKey};
