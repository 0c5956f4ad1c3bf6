use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::backend::{BackendError, Translator};

/// Google Cloud Translation v2 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// How requests to the translation API are authorized.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API key, sent as the `key` query parameter.
    ApiKey(String),
    /// OAuth access token (e.g. from `gcloud auth print-access-token`),
    /// sent as a bearer token.
    AccessToken(String),
}

impl Credentials {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "API key",
            Self::AccessToken(_) => "access token",
        }
    }
}

// Keeps secrets out of debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
        }
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a [String],
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslatedText {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for the Google Cloud Translation v2 REST API.
pub struct GoogleTranslateClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl GoogleTranslateClient {
    pub fn new(endpoint: String, credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            credentials,
        }
    }

    /// Endpoint URL with the API key appended as a percent-encoded `key` pair.
    fn request_url(&self) -> Result<Url, BackendError> {
        let mut url = Url::parse(self.endpoint.trim_end_matches('/')).map_err(|e| {
            BackendError::InvalidEndpoint {
                url: self.endpoint.clone(),
                reason: e.to_string(),
            }
        })?;
        if let Credentials::ApiKey(key) = &self.credentials {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}

/// Extracts the API's own error message from an error body, if it has one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| body.trim().to_string(), |e| e.error.message)
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate_batch(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, BackendError> {
        let body = TranslateRequest {
            q: texts,
            source: source_language,
            target: target_language,
            // "text" keeps the API from HTML-escaping quotes and ampersands
            format: "text",
        };

        let mut http_request = self.client.post(self.request_url()?).json(&body);

        if let Credentials::AccessToken(token) = &self.credentials {
            http_request = http_request.header("Authorization", format!("Bearer {token}"));
        }

        let response = http_request
            .send()
            .await
            // The request URL may carry the API key
            .map_err(|source| BackendError::Transport {
                url: self.endpoint.clone(),
                source: source.without_url(),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status,
                message: error_message(&text),
            });
        }

        let parsed: TranslateResponse = serde_json::from_str(&text)
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .data
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect())
    }

    fn name(&self) -> &str {
        "Google Translate"
    }
}
