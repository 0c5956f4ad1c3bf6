//! Batched multi-language translation of a JSON document.
//!
//! For every target language the dispatcher clones the source tree, sends its
//! string leaves to the [`Translator`] in fixed-size batches and writes each
//! result back at the leaf's path. A backend failure drops that one language
//! and moves on; the other languages are unaffected because each works on its
//! own clone.
//!
//! ```ignore
//! let dispatcher = Dispatcher::new(&client);
//! let report = dispatcher.dispatch(&document, &["fr", "de"], &mut NoopObserver).await?;
//! if report.no_languages_succeeded() {
//!     // nothing to write
//! }
//! ```

use serde_json::Value;
use std::collections::HashSet;

use crate::translation::{BackendError, SOURCE_LANGUAGE, Translator};
use crate::tree::{LeafIndex, TreeError, rehydrate};

/// Number of strings sent per backend request.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Progress callbacks fired while dispatching. All methods default to no-ops.
pub trait DispatchObserver {
    /// A language is about to be translated; `total` is the number of leaves.
    fn language_started(&mut self, _language: &str, _total: usize) {}

    /// A batch of `count` leaves was translated and written back.
    fn batch_translated(&mut self, _language: &str, _count: usize) {}

    fn language_finished(&mut self, _language: &str) {}

    fn language_failed(&mut self, _language: &str, _error: &BackendError) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}

/// Fully translated documents keyed by language code, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationSet {
    entries: Vec<(String, Value)>,
}

impl TranslationSet {
    pub fn get(&self, language: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(code, _)| code == language)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, language: &str) -> bool {
        self.get(language).is_some()
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(code, value)| (code.as_str(), value))
    }

    fn insert(&mut self, language: String, value: Value) {
        self.entries.push((language, value));
    }
}

impl IntoIterator for TranslationSet {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Why a language was left out of the [`TranslationSet`].
#[derive(Debug)]
pub struct LanguageFailure {
    pub language: String,
    pub error: BackendError,
}

/// Result of a dispatch run.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Languages whose every batch succeeded.
    pub translations: TranslationSet,
    /// Languages that were abandoned, with the error that stopped them.
    pub failures: Vec<LanguageFailure>,
}

impl DispatchReport {
    /// True when no requested language produced a document.
    pub const fn no_languages_succeeded(&self) -> bool {
        self.translations.is_empty()
    }
}

/// Trims codes, drops empty ones and removes duplicates, keeping first-seen order.
pub fn normalize_languages<S: AsRef<str>>(languages: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    languages
        .iter()
        .map(|code| code.as_ref().trim())
        .filter(|code| !code.is_empty())
        .filter(|code| seen.insert(*code))
        .map(str::to_string)
        .collect()
}

enum LanguageError {
    Backend(BackendError),
    Tree(TreeError),
}

impl From<BackendError> for LanguageError {
    fn from(error: BackendError) -> Self {
        Self::Backend(error)
    }
}

impl From<TreeError> for LanguageError {
    fn from(error: TreeError) -> Self {
        Self::Tree(error)
    }
}

/// Translates a document into several languages through one backend.
pub struct Dispatcher<'a> {
    translator: &'a dyn Translator,
    batch_size: usize,
}

impl<'a> Dispatcher<'a> {
    pub fn new(translator: &'a dyn Translator) -> Self {
        Self {
            translator,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Overrides the batch size. Zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Translates `tree` into every language in `languages`.
    ///
    /// Languages are processed one after another. A [`BackendError`] abandons
    /// only the language it occurred in and is reported in
    /// [`DispatchReport::failures`].
    ///
    /// # Errors
    ///
    /// Returns a [`TreeError`] if a translated string cannot be written back,
    /// which means the leaf index and the cloned tree disagree.
    pub async fn dispatch<S: AsRef<str>>(
        &self,
        tree: &Value,
        languages: &[S],
        observer: &mut dyn DispatchObserver,
    ) -> Result<DispatchReport, TreeError> {
        let index = LeafIndex::build(tree);
        let mut report = DispatchReport::default();

        for language in normalize_languages(languages) {
            observer.language_started(&language, index.len());

            match self.translate_language(tree, &index, &language, observer).await {
                Ok(translated) => {
                    observer.language_finished(&language);
                    report.translations.insert(language, translated);
                }
                Err(LanguageError::Backend(error)) => {
                    observer.language_failed(&language, &error);
                    report.failures.push(LanguageFailure { language, error });
                }
                Err(LanguageError::Tree(error)) => return Err(error),
            }
        }

        Ok(report)
    }

    async fn translate_language(
        &self,
        tree: &Value,
        index: &LeafIndex,
        language: &str,
        observer: &mut dyn DispatchObserver,
    ) -> Result<Value, LanguageError> {
        let mut translated_tree = tree.clone();

        for batch in index.batches(self.batch_size) {
            let translated = self
                .translator
                .translate_batch(batch.texts, SOURCE_LANGUAGE, language)
                .await?;

            if translated.len() != batch.len() {
                return Err(BackendError::LengthMismatch {
                    expected: batch.len(),
                    actual: translated.len(),
                }
                .into());
            }

            for (path, text) in batch.paths.iter().zip(translated) {
                rehydrate(&mut translated_tree, path, text)?;
            }

            observer.batch_translated(language, batch.len());
        }

        Ok(translated_tree)
    }
}
