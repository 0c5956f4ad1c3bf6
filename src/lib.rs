//! # jtl - JSON Translation CLI
//!
//! `jtl` translates every string inside a JSON document into one or more
//! target languages using the Google Cloud Translation API, and writes one
//! document per language with exactly the same shape as the input.
//!
//! ## Features
//!
//! - **Shape preserving**: keys, numbers, booleans and nulls are copied untouched
//! - **Batched requests**: strings are sent in batches of up to 128 per request
//! - **Per-language isolation**: one failing language never affects the others
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a file into French and Spanish
//! jtl --to fr,es ./strings.json
//!
//! # Translate from stdin into a custom directory
//! cat strings.json | jtl --to ja -o out
//!
//! # List supported language codes
//! jtl languages
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/jtl/config.toml`:
//!
//! ```toml
//! [jtl]
//! to = ["fr", "es"]
//! output_dir = "translations"
//! batch_size = 100
//!
//! [google]
//! api_key_env = "GOOGLE_TRANSLATE_API_KEY"
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and option resolution.
pub mod config;

/// Batched, per-language translation of a document.
pub mod dispatch;

/// File system utilities.
pub mod fs;

/// Input reading from files and stdin.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Translation backends and language codes.
pub mod translation;

/// Path-preserving leaf extraction and rehydration for JSON trees.
pub mod tree;

/// Terminal UI components (progress bars, colors).
pub mod ui;
