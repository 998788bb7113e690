//! Machine translation providers.

use std::fmt;

use async_trait::async_trait;
use aws_sdk_translate::error::DisplayErrorContext;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::aws::AwsSettings;

/// Errors raised by a translator.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Translation is switched off for this deployment.
    #[error("translation is disabled")]
    Disabled,
    /// The translation service failed the request.
    #[error("{0}")]
    Provider(String),
}

/// Translates text between languages.
#[async_trait]
pub trait Translator: Send + Sync + fmt::Debug {
    /// Translate `text` from `source` into `target`.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError>;
}

/// Amazon Translate backed [`Translator`].
///
/// The SDK client is built on first use and reused afterwards.
#[derive(Debug)]
pub struct AwsTranslator {
    settings: AwsSettings,
    client: OnceCell<aws_sdk_translate::Client>,
}

impl AwsTranslator {
    /// Create a translator that builds its client lazily.
    #[must_use]
    pub fn new(settings: AwsSettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    /// Create a translator around an existing client.
    #[must_use]
    pub fn with_client(client: aws_sdk_translate::Client) -> Self {
        Self {
            settings: AwsSettings::new(
                client
                    .config()
                    .region()
                    .map_or_else(String::new, ToString::to_string),
            ),
            client: OnceCell::new_with(Some(client)),
        }
    }

    async fn client(&self) -> &aws_sdk_translate::Client {
        self.client
            .get_or_init(|| async {
                aws_sdk_translate::Client::new(&self.settings.load().await)
            })
            .await
    }
}

#[async_trait]
impl Translator for AwsTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        debug!(source, target, chars = text.chars().count(), "translating text");
        let output = self
            .client()
            .await
            .translate_text()
            .text(text)
            .source_language_code(source)
            .target_language_code(target)
            .send()
            .await
            .map_err(|e| TranslateError::Provider(DisplayErrorContext(&e).to_string()))?;
        Ok(output.translated_text().to_owned())
    }
}

/// A [`Translator`] that refuses every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    async fn translate(
        &self,
        _text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, TranslateError> {
        Err(TranslateError::Disabled)
    }
}
