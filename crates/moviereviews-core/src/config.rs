//! Movie reviews configuration.

use std::env;

/// Which review store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local store; contents are lost on restart.
    #[default]
    Memory,
    /// A DynamoDB table.
    DynamoDb,
}

impl StorageBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Some(Self::Memory),
            "dynamodb" | "ddb" => Some(Self::DynamoDb),
            _ => None,
        }
    }
}

/// Movie reviews service configuration.
#[derive(Debug, Clone)]
pub struct ReviewsConfig {
    /// Review store backend.
    pub storage: StorageBackend,
    /// Name of the reviews table.
    pub table_name: String,
    /// Index keyed by `movieId` and sorted by `reviewDate`.
    pub date_index_name: String,
    /// Index keyed by `reviewer`.
    pub reviewer_index_name: String,
    /// AWS region of the table and the translation service.
    pub region: String,
    /// Endpoint override for AWS clients (local emulators).
    pub endpoint_url: Option<String>,
    /// Whether the translation endpoint calls the translation service.
    pub translate_enabled: bool,
    /// Language review texts are written in.
    pub source_language: String,
}

impl ReviewsConfig {
    /// Create configuration from environment variables.
    ///
    /// An unrecognized `REVIEWS_STORAGE` value falls back to the in-memory store.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            storage: env::var("REVIEWS_STORAGE")
                .ok()
                .and_then(|v| StorageBackend::parse(&v))
                .unwrap_or(defaults.storage),
            table_name: env::var("REVIEWS_TABLE_NAME").unwrap_or(defaults.table_name),
            date_index_name: env::var("REVIEWS_DATE_INDEX").unwrap_or(defaults.date_index_name),
            reviewer_index_name: env::var("REVIEWS_REVIEWER_INDEX")
                .unwrap_or(defaults.reviewer_index_name),
            region: env::var("REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .unwrap_or(defaults.region),
            endpoint_url: env::var("AWS_ENDPOINT_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            translate_enabled: env_bool("TRANSLATE_ENABLED", defaults.translate_enabled),
            source_language: env::var("TRANSLATE_SOURCE_LANGUAGE")
                .unwrap_or(defaults.source_language),
        }
    }
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Memory,
            table_name: "Reviews".to_owned(),
            date_index_name: "ReviewDateIndex".to_owned(),
            reviewer_index_name: "ReviewerIndex".to_owned(),
            region: "eu-west-1".to_owned(),
            endpoint_url: None,
            translate_enabled: false,
            source_language: "en".to_owned(),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |v| {
        matches!(v.as_str(), "1" | "true" | "yes" | "TRUE" | "YES")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_storage_backend() {
        assert_eq!(StorageBackend::parse("DynamoDB"), Some(StorageBackend::DynamoDb));
        assert_eq!(StorageBackend::parse("memory"), Some(StorageBackend::Memory));
        assert_eq!(StorageBackend::parse("postgres"), None);
    }

    #[test]
    fn test_should_default_to_reviews_table() {
        let config = ReviewsConfig::default();
        assert_eq!(config.table_name, "Reviews");
        assert_eq!(config.date_index_name, "ReviewDateIndex");
        assert_eq!(config.source_language, "en");
        assert!(!config.translate_enabled);
    }
}
