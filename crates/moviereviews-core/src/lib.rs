//! Movie reviews business logic.
//!
//! - [`validation`] - Field predicates and raw parameter parsing
//! - [`query`] - Chooses the store access path for a review filter
//! - [`store`] - The [`store::ReviewStore`] interface
//! - [`storage`] - In-memory review store
//! - [`dynamodb`] - DynamoDB review store
//! - [`translate`] - Machine translation providers
//! - [`provider`] - One method per API operation
//! - [`handler`] - Bridges the HTTP layer to the provider
#![allow(missing_docs, clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod aws;
pub mod config;
pub mod dynamodb;
pub mod error;
pub mod handler;
pub mod provider;
pub mod query;
pub mod storage;
pub mod store;
pub mod translate;
pub mod validation;
