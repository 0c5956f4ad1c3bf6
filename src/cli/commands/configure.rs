//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{MultiSelect, Text};

use crate::config::{ConfigFile, ConfigManager, DEFAULT_OUTPUT_DIR};
use crate::translation::SUPPORTED_LANGUAGES;
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command to edit default settings.
///
/// Allows the user to interactively set the default target languages, output
/// directory and the environment variable holding the API key.
pub fn run_configure() -> Result<()> {
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    config.jtl.to = select_target_languages(&config.jtl.to)?;

    let output_dir = Text::new("Output directory:")
        .with_default(
            config
                .jtl
                .output_dir
                .as_deref()
                .unwrap_or(DEFAULT_OUTPUT_DIR),
        )
        .prompt()?;
    config.jtl.output_dir = Some(output_dir.trim().to_string()).filter(|d| !d.is_empty());

    let api_key_env = Text::new("Environment variable holding the API key:")
        .with_default(config.google.api_key_env())
        .prompt()?;
    config.google.api_key_env = Some(api_key_env.trim().to_string()).filter(|v| !v.is_empty());

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

/// Prints the current configuration without modifying it.
pub fn print_config() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    println!(
        "{} {}",
        Style::header("Config file:"),
        Style::secondary(manager.config_path().display())
    );
    print_current_defaults(&config);

    Ok(())
}

fn not_set() -> String {
    Style::secondary("(not set)")
}

fn print_current_defaults(config: &ConfigFile) {
    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}           {}",
        Style::label("to"),
        if config.jtl.to.is_empty() {
            not_set()
        } else {
            Style::value(config.jtl.to.join(", "))
        }
    );
    println!(
        "  {}   {}",
        Style::label("output_dir"),
        config
            .jtl
            .output_dir
            .as_deref()
            .map_or_else(not_set, Style::value)
    );
    println!(
        "  {}   {}",
        Style::label("batch_size"),
        config.jtl.batch_size.map_or_else(not_set, Style::value)
    );
    println!(
        "  {}     {}",
        Style::label("endpoint"),
        config
            .google
            .endpoint
            .as_deref()
            .map_or_else(not_set, Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("api_key_env"),
        Style::value(config.google.api_key_env())
    );
    println!(
        "  {}      {}",
        Style::label("api_key"),
        if config.google.get_api_key().is_some() {
            Style::value("(set)")
        } else {
            not_set()
        }
    );
    println!();
}

fn select_target_languages(current: &[String]) -> Result<Vec<String>> {
    let options: Vec<String> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| format!("{code} - {name}"))
        .collect();

    let defaults: Vec<usize> = SUPPORTED_LANGUAGES
        .iter()
        .enumerate()
        .filter(|(_, (code, _))| current.iter().any(|c| c == code))
        .map(|(i, _)| i)
        .collect();

    let selected = MultiSelect::new("Default target languages:", options)
        .with_default(&defaults)
        .with_page_size(15)
        .prompt()?;

    if selected.is_empty() {
        bail!("Select at least one target language");
    }

    Ok(selected
        .iter()
        .filter_map(|s| s.split(" - ").next())
        .map(str::to_string)
        .collect())
}
