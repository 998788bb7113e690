//! Shared AWS SDK configuration.

use aws_sdk_dynamodb::config::{BehaviorVersion, Region};
use tracing::debug;

/// Where the AWS clients connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    /// AWS region.
    pub region: String,
    /// Endpoint override, for local emulators.
    pub endpoint_url: Option<String>,
}

impl AwsSettings {
    /// Settings for a region with the default endpoints.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_url: None,
        }
    }

    /// Override the service endpoint.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Resolve credentials and build the shared SDK configuration.
    pub async fn load(&self) -> aws_config::SdkConfig {
        debug!(region = %self.region, endpoint = ?self.endpoint_url, "loading AWS configuration");
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(self.region.clone()));
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        loader.load().await
    }
}
