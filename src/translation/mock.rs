//! Deterministic in-process translator.
//!
//! Used to exercise the dispatch pipeline without network access or API keys.
//!
//! ```ignore
//! let mock = MockTranslator::new(MockMode::Suffix);
//! let out = mock.translate_batch(&["hello".to_string()], "en", "fr").await?;
//! assert_eq!(out, vec!["hello_fr"]);
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use super::backend::{BackendError, Translator};

#[derive(Debug, Clone)]
pub enum MockMode {
    /// Appends the target language: `"hello"` becomes `"hello_fr"`.
    Suffix,
    /// Looks up `(text, target_language)`; unknown texts are returned unchanged.
    Mappings(HashMap<(String, String), String>),
    /// Fails every request for the listed target languages, suffixes the rest.
    FailFor(HashSet<String>),
    /// Drops the last translation of every batch.
    Truncate,
}

/// One recorded `translate_batch` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub texts: Vec<String>,
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTranslator {
    pub const fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Builds a `Mappings` translator from `(text, target, translation)` triples.
    pub fn with_mappings<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let mappings = entries
            .into_iter()
            .map(|(text, target, translated)| {
                ((text.to_string(), target.to_string()), translated.to_string())
            })
            .collect();
        Self::new(MockMode::Mappings(mappings))
    }

    /// Builds a translator that fails for the given languages.
    pub fn failing_for<'a>(languages: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(MockMode::FailFor(
            languages.into_iter().map(str::to_string).collect(),
        ))
    }

    /// Returns every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn record(&self, texts: &[String], source_language: &str, target_language: &str) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                texts: texts.to_vec(),
                source_language: source_language.to_string(),
                target_language: target_language.to_string(),
            });
    }
}

fn suffixed(texts: &[String], target_language: &str) -> Vec<String> {
    texts
        .iter()
        .map(|text| format!("{text}_{target_language}"))
        .collect()
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, BackendError> {
        self.record(texts, source_language, target_language);

        match &self.mode {
            MockMode::Suffix => Ok(suffixed(texts, target_language)),
            MockMode::Mappings(mappings) => Ok(texts
                .iter()
                .map(|text| {
                    mappings
                        .get(&(text.clone(), target_language.to_string()))
                        .unwrap_or(text)
                        .clone()
                })
                .collect()),
            MockMode::FailFor(languages) if languages.contains(target_language) => Err(
                BackendError::Unavailable(format!("mock failure for '{target_language}'")),
            ),
            MockMode::FailFor(_) => Ok(suffixed(texts, target_language)),
            MockMode::Truncate => {
                let mut out = suffixed(texts, target_language);
                out.pop();
                Ok(out)
            }
        }
    }

    fn name(&self) -> &str {
        "Mock Translator"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn test_suffix_mode() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let out = mock
            .translate_batch(&texts(&["a", "b"]), "en", "fr")
            .await
            .unwrap();

        assert_eq!(out, vec!["a_fr", "b_fr"]);
    }

    #[tokio::test]
    async fn test_mappings_mode_falls_back_to_input() {
        let mock = MockTranslator::with_mappings([("Hello", "fr", "Bonjour")]);
        let out = mock
            .translate_batch(&texts(&["Hello", "Unknown"]), "en", "fr")
            .await
            .unwrap();

        assert_eq!(out, vec!["Bonjour", "Unknown"]);
    }

    #[tokio::test]
    async fn test_fail_for_mode() {
        let mock = MockTranslator::failing_for(["de"]);

        assert!(mock.translate_batch(&texts(&["x"]), "en", "de").await.is_err());
        assert_eq!(
            mock.translate_batch(&texts(&["x"]), "en", "fr").await.unwrap(),
            vec!["x_fr"]
        );
    }

    #[tokio::test]
    async fn test_truncate_mode() {
        let mock = MockTranslator::new(MockMode::Truncate);
        let out = mock
            .translate_batch(&texts(&["a", "b"]), "en", "fr")
            .await
            .unwrap();

        assert_eq!(out.len(), 1);
    }

    #[tokio::test]
    async fn test_calls_are_recorded() {
        let mock = MockTranslator::new(MockMode::Suffix);
        mock.translate_batch(&texts(&["a"]), "en", "ja").await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![RecordedCall {
                texts: texts(&["a"]),
                source_language: "en".to_string(),
                target_language: "ja".to_string(),
            }]
        );
        assert_eq!(mock.call_count(), 1);
    }
}
