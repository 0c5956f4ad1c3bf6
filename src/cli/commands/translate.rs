use anyhow::{Result, bail};
use inquire::{Confirm, MultiSelect, Password, PasswordDisplayMode};
use serde_json::Value;
use std::fmt;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use crate::config::{ConfigManager, DEFAULT_API_KEY_ENV, ResolveOptions, resolve_config};
use crate::dispatch::{DispatchReport, Dispatcher, TranslationSet};
use crate::fs::{ensure_dir, output_path, write_json};
use crate::input::InputReader;
use crate::translation::{
    Credentials, GoogleTranslateClient, SUPPORTED_LANGUAGES, Translator, language_name,
    partition_languages,
};
use crate::tree::{LeafIndex, extract};
use crate::ui::{DispatchProgress, Style};
use crate::{output, status, warn};

/// Leaves shown per language in the post-translation preview.
const SAMPLE_SIZE: usize = 5;

pub struct TranslateOptions {
    pub file: Option<String>,
    pub to: Vec<String>,
    pub output: Option<String>,
    pub key: Option<String>,
    pub access_token: Option<String>,
    pub endpoint: Option<String>,
    pub batch_size: Option<usize>,
    pub yes: bool,
}

/// How a translate run ended, for choosing the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateOutcome {
    /// All successful translations were written.
    Saved,
    /// The user declined to write the translations.
    NotSaved,
    /// Every requested language failed; nothing was written.
    NoLanguagesSucceeded,
}

pub async fn run_translate(options: TranslateOptions) -> Result<TranslateOutcome> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    let config = resolve_config(&resolve_options(&options), &file_config)?;

    let document = InputReader::read_json(options.file.as_deref())?;
    let leaf_count = LeafIndex::build(&document).len();
    status!(
        "{} Loaded {} strings from {}",
        Style::success("✓"),
        leaf_count,
        Style::value(options.file.as_deref().unwrap_or("stdin"))
    );

    // Prompts need the terminal, which is unavailable when the document is piped in.
    let interactive = options.file.is_some() && io::stdin().is_terminal();

    let requested = if config.target_languages.is_empty() {
        if !interactive {
            bail!(
                "Error: Missing required configuration: 'to' (target languages)\n\n\
                 Please provide it via:\n  \
                 - CLI option: jtl --to fr,es <file>\n  \
                 - Config file: Run 'jtl configure' to set default languages"
            );
        }
        prompt_languages()?
    } else {
        config.target_languages.clone()
    };

    let languages = checked_languages(&requested)?;
    print_language_info(&languages);

    let credentials = match config.credentials.clone() {
        Some(credentials) => credentials,
        None if interactive => prompt_api_key()?,
        None => bail!(
            "Error: Missing translation API credentials\n\n\
             Please provide one of:\n  \
             - CLI option: jtl --key <api-key> <file>\n  \
             - Environment: export {DEFAULT_API_KEY_ENV}=\"your-api-key\"\n  \
             - CLI option: jtl --access-token \"$(gcloud auth print-access-token)\" <file>\n  \
             - Config file: set api_key_env or api_key under [google]"
        ),
    };

    let client = GoogleTranslateClient::new(config.endpoint.clone(), credentials.clone());
    status!(
        "{} Using {} with {}",
        Style::secondary("ℹ"),
        client.name(),
        credentials_label(&credentials)
    );

    let report = {
        let mut progress = DispatchProgress::new();
        Dispatcher::new(&client)
            .with_batch_size(config.batch_size)
            .dispatch(&document, &languages, &mut progress)
            .await?
    };

    report_failures(&report);

    if report.no_languages_succeeded() {
        warn!(
            "{} No translations were completed successfully.\n\
             Please check your language codes and API credentials.",
            Style::error("Error:")
        );
        return Ok(TranslateOutcome::NoLanguagesSucceeded);
    }

    status!(
        "{} Translation complete! Translated to {} of {} languages",
        Style::success("✓"),
        report.translations.len(),
        languages.len()
    );
    print_comparison(&document, &report.translations, Some(SAMPLE_SIZE));

    let prompt_user = interactive && !options.yes;
    if prompt_user && leaf_count > SAMPLE_SIZE && !output::is_quiet() && confirm_full_comparison()? {
        print_comparison(&document, &report.translations, None);
    }

    if prompt_user && !confirm_save(&config.output_dir, report.translations.len())? {
        status!("{}", Style::hint("Translations were not saved."));
        return Ok(TranslateOutcome::NotSaved);
    }

    save_translations(&config.output_dir, &report.translations)?;

    Ok(TranslateOutcome::Saved)
}

fn resolve_options(options: &TranslateOptions) -> ResolveOptions {
    ResolveOptions {
        to: options.to.clone(),
        output_dir: options.output.clone(),
        api_key: options.key.clone(),
        access_token: options.access_token.clone(),
        endpoint: options.endpoint.clone(),
        batch_size: options.batch_size,
    }
}

/// Drops unsupported codes with a warning; fails if none are left.
fn checked_languages(requested: &[String]) -> Result<Vec<String>> {
    let (valid, invalid) = partition_languages(requested);

    if !invalid.is_empty() {
        warn!(
            "{} Skipping invalid language codes: {}",
            Style::warning("Warning:"),
            invalid.join(", ")
        );
    }

    if valid.is_empty() {
        bail!(
            "Error: No valid language codes provided.\n\n\
             Run 'jtl languages' to see all supported codes."
        );
    }

    Ok(valid)
}

const fn credentials_label(credentials: &Credentials) -> &'static str {
    match credentials {
        Credentials::ApiKey(_) => "the provided API key",
        Credentials::AccessToken(_) => "an OAuth access token",
    }
}

fn print_language_info(languages: &[String]) {
    let described: Vec<String> = languages
        .iter()
        .map(|code| {
            format!(
                "{} ({})",
                language_name(code).unwrap_or(code.as_str()),
                Style::code(code)
            )
        })
        .collect();
    status!("{} {}", Style::header("Target languages:"), described.join(", "));
}

fn report_failures(report: &DispatchReport) {
    for failure in &report.failures {
        warn!(
            "{} Translation error for {}: {}",
            Style::error("✗"),
            Style::code(&failure.language),
            failure.error
        );
    }
}

/// Original and translated text of the first `limit` leaves (all when `None`).
fn comparison_rows<'a>(
    index: &'a LeafIndex,
    translated: &Value,
    limit: Option<usize>,
) -> Vec<(String, &'a str, String)> {
    // Translated trees have the same shape, so their leaves line up.
    index
        .iter()
        .zip(extract(translated))
        .take(limit.unwrap_or(usize::MAX))
        .map(|((path, source), (_, target))| (path.to_string(), source, target))
        .collect()
}

fn print_comparison(original: &Value, translations: &TranslationSet, limit: Option<usize>) {
    let index = LeafIndex::build(original);
    if index.is_empty() {
        return;
    }

    for (language, translated) in translations.iter() {
        status!(
            "\n{} {}",
            Style::header(language_name(language).unwrap_or(language)),
            Style::secondary(format!("({language})"))
        );
        let rows = comparison_rows(&index, translated, limit);
        for (path, source, target) in &rows {
            status!("  {}  {} → {}", Style::label(path), source, Style::value(target));
        }
        if rows.len() < index.len() {
            status!(
                "  {}",
                Style::hint(format!("... and {} more", index.len() - rows.len()))
            );
        }
    }
    status!();
}

fn save_translations(dir: &Path, translations: &TranslationSet) -> Result<Vec<PathBuf>> {
    if ensure_dir(dir)? {
        status!(
            "{} Created output directory: {}",
            Style::success("✓"),
            Style::value(dir.display())
        );
    }

    let mut saved = Vec::new();
    let mut failed = 0;

    for (language, document) in translations.iter() {
        let path = output_path(dir, language);
        match write_json(&path, document) {
            Ok(()) => {
                status!("  {} {}", Style::success("✓"), path.display());
                saved.push(path);
            }
            Err(e) => {
                warn!("  {} {}: {e:#}", Style::error("✗"), path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!(
            "Error: Failed to save {failed} of {} translations",
            translations.len()
        );
    }

    status!(
        "{} Saved {} translation files to {}",
        Style::success("✓"),
        saved.len(),
        Style::value(dir.display())
    );

    Ok(saved)
}

struct LanguageChoice {
    code: &'static str,
    name: &'static str,
}

impl fmt::Display for LanguageChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:6} {}", self.code, self.name)
    }
}

fn prompt_languages() -> Result<Vec<String>> {
    let choices: Vec<LanguageChoice> = SUPPORTED_LANGUAGES
        .iter()
        .map(|&(code, name)| LanguageChoice { code, name })
        .collect();

    let selected = MultiSelect::new("Select target languages:", choices)
        .with_page_size(15)
        .prompt()?;

    if selected.is_empty() {
        bail!("Error: No target languages selected");
    }

    Ok(selected
        .into_iter()
        .map(|choice| choice.code.to_string())
        .collect())
}

fn prompt_api_key() -> Result<Credentials> {
    let key = Password::new("Google Translate API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    if key.trim().is_empty() {
        bail!("Error: An API key is required");
    }

    Ok(Credentials::ApiKey(key.trim().to_string()))
}

fn confirm_full_comparison() -> Result<bool> {
    Ok(
        Confirm::new("Show detailed comparison for all languages?")
            .with_default(false)
            .prompt()?,
    )
}

fn confirm_save(dir: &Path, count: usize) -> Result<bool> {
    Ok(
        Confirm::new(&format!("Save {count} translations to {}?", dir.display()))
            .with_default(true)
            .prompt()?,
    )
}
