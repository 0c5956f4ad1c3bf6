use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Source language assumed for every document.
pub const SOURCE_LANGUAGE: &str = "en";

/// Failure of a single batch request to a translation backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to connect to translation endpoint {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid translation endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Translation request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Invalid translation response: {0}")]
    InvalidResponse(String),

    #[error("Expected {expected} translations but received {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("{0}")]
    Unavailable(String),
}

/// A service that translates batches of strings.
///
/// Implementations return exactly one translation per input, in input order.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_batch(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, BackendError>;

    /// Human-readable backend name for status output.
    fn name(&self) -> &str;
}
