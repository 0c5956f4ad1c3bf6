//! Translation backends and language codes.
//!
//! [`GoogleTranslateClient`] is the production backend. [`MockTranslator`] is a
//! deterministic in-process backend kept public so unit and integration tests
//! can drive the dispatcher without network access.

mod backend;
mod client;
mod language;
mod mock;

pub use backend::{BackendError, SOURCE_LANGUAGE, Translator};
pub use client::{Credentials, DEFAULT_ENDPOINT, GoogleTranslateClient};
pub use language::{
    SUPPORTED_LANGUAGES, language_name, partition_languages, print_languages,
};
pub use mock::{MockMode, MockTranslator, RecordedCall};
