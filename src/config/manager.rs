use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::dispatch::{DEFAULT_BATCH_SIZE, normalize_languages};
use crate::paths;
use crate::translation::{Credentials, DEFAULT_ENDPOINT};

/// Environment variable read for the API key unless `api_key_env` says otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

/// Environment variable read for an OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_TRANSLATE_ACCESS_TOKEN";

/// Output directory used when neither the CLI nor the config file sets one.
pub const DEFAULT_OUTPUT_DIR: &str = "translations";

/// Largest batch the Translation v2 API accepts in one request.
pub const MAX_BATCH_SIZE: usize = 128;

/// Default settings in the `[jtl]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JtlConfig {
    /// Default target language codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    /// Default directory for translated files.
    pub output_dir: Option<String>,
    /// Strings per translation request.
    pub batch_size: Option<usize>,
}

/// Settings in the `[google]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Translation API endpoint URL.
    pub endpoint: Option<String>,
    /// API key stored directly in config (not recommended).
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,
}

impl GoogleConfig {
    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// API key from the environment variable named by `api_key_env`.
    pub fn env_api_key(&self) -> Option<String> {
        std::env::var(self.api_key_env())
            .ok()
            .filter(|key| !key.is_empty())
    }

    /// API key stored directly in the config file.
    pub fn file_api_key(&self) -> Option<String> {
        self.api_key.clone().filter(|key| !key.is_empty())
    }

    /// Gets the API key, preferring the environment variable over the config file.
    pub fn get_api_key(&self) -> Option<String> {
        self.env_api_key().or_else(|| self.file_api_key())
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/jtl/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub jtl: JtlConfig,
    #[serde(default)]
    pub google: GoogleConfig,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Target language codes; replaces the configured list when non-empty.
    pub to: Vec<String>,
    pub output_dir: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub endpoint: Option<String>,
    pub batch_size: Option<usize>,
}

/// Resolved configuration after merging CLI arguments, environment and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Normalized target languages; empty when none were given anywhere.
    pub target_languages: Vec<String>,
    pub output_dir: PathBuf,
    pub endpoint: String,
    /// `None` when no credential was found.
    pub credentials: Option<Credentials>,
    pub batch_size: usize,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

fn resolve_credentials(options: &ResolveOptions, google: &GoogleConfig) -> Option<Credentials> {
    if let Some(key) = non_empty(options.api_key.as_ref()) {
        return Some(Credentials::ApiKey(key));
    }
    if let Some(token) = non_empty(options.access_token.as_ref()) {
        return Some(Credentials::AccessToken(token));
    }
    if let Some(key) = google.env_api_key() {
        return Some(Credentials::ApiKey(key));
    }
    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV)
        && !token.is_empty()
    {
        return Some(Credentials::AccessToken(token));
    }
    google.file_api_key().map(Credentials::ApiKey)
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Priority: CLI option, then environment variable (credentials only), then
/// config file, then built-in default. Missing languages or credentials are
/// not an error here; the caller decides whether to prompt.
///
/// # Errors
///
/// Returns an error if the batch size is outside `1..=128`.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let target_languages = if options.to.is_empty() {
        normalize_languages(&config_file.jtl.to)
    } else {
        normalize_languages(&options.to)
    };

    let output_dir = options
        .output_dir
        .as_ref()
        .or(config_file.jtl.output_dir.as_ref())
        .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from);

    let endpoint = options
        .endpoint
        .as_ref()
        .or(config_file.google.endpoint.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let batch_size = options
        .batch_size
        .or(config_file.jtl.batch_size)
        .unwrap_or(DEFAULT_BATCH_SIZE);

    if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
        bail!(
            "Invalid batch size: {batch_size}\n\n\
             The translation API accepts between 1 and {MAX_BATCH_SIZE} strings per request."
        );
    }

    Ok(ResolvedConfig {
        target_languages,
        output_dir,
        endpoint,
        credentials: resolve_credentials(options, &config_file.google),
        batch_size,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/jtl/config.toml`
    /// or `~/.config/jtl/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    fn create_test_config() -> ConfigFile {
        ConfigFile {
            jtl: JtlConfig {
                to: vec!["fr".to_string(), "es".to_string()],
                output_dir: Some("out".to_string()),
                batch_size: Some(50),
            },
            google: GoogleConfig {
                endpoint: Some("http://localhost:8080/v2".to_string()),
                api_key: Some("file-key".to_string()),
                api_key_env: Some("JTL_TEST_NONEXISTENT_API_KEY".to_string()),
            },
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        let config = create_test_config();

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: ConfigFile = toml::from_str("[jtl]\nto = [\"de\"]\n").unwrap();

        assert_eq!(config.jtl.to, vec!["de"]);
        assert_eq!(config.jtl.output_dir, None);
        assert_eq!(config.google, GoogleConfig::default());
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert_eq!(manager.load_or_default().unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_load_or_default_rejects_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[jtl\nto = ").unwrap();

        assert!(manager.load_or_default().is_err());
    }

    #[test]
    #[serial]
    fn test_google_get_api_key_from_env() {
        // SAFETY: serialized test; only touches a test-specific env var
        unsafe {
            std::env::set_var("JTL_TEST_API_KEY", "env-key");
        }

        let google = GoogleConfig {
            endpoint: None,
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("JTL_TEST_API_KEY".to_string()),
        };

        // Environment variable takes priority
        assert_eq!(google.get_api_key(), Some("env-key".to_string()));

        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var("JTL_TEST_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_google_get_api_key_fallback() {
        let google = GoogleConfig {
            endpoint: None,
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("JTL_TEST_NONEXISTENT_API_KEY".to_string()),
        };

        assert_eq!(google.get_api_key(), Some("fallback-key".to_string()));
    }

    #[test]
    fn test_google_default_api_key_env() {
        assert_eq!(GoogleConfig::default().api_key_env(), DEFAULT_API_KEY_ENV);
    }

    #[test]
    #[serial]
    fn test_resolve_config_falls_back_to_file() {
        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        assert_eq!(resolved.target_languages, vec!["fr", "es"]);
        assert_eq!(resolved.output_dir, PathBuf::from("out"));
        assert_eq!(resolved.endpoint, "http://localhost:8080/v2");
        assert_eq!(resolved.batch_size, 50);
        assert_eq!(
            resolved.credentials,
            Some(Credentials::ApiKey("file-key".to_string()))
        );
    }

    #[test]
    #[serial]
    fn test_resolve_config_cli_overrides_file() {
        let options = ResolveOptions {
            to: vec!["ja".to_string(), "ja".to_string(), "ko".to_string()],
            output_dir: Some("cli-out".to_string()),
            api_key: Some("cli-key".to_string()),
            access_token: None,
            endpoint: Some("http://cli.local".to_string()),
            batch_size: Some(10),
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(resolved.target_languages, vec!["ja", "ko"]);
        assert_eq!(resolved.output_dir, PathBuf::from("cli-out"));
        assert_eq!(resolved.endpoint, "http://cli.local");
        assert_eq!(resolved.batch_size, 10);
        assert_eq!(
            resolved.credentials,
            Some(Credentials::ApiKey("cli-key".to_string()))
        );
    }

    #[test]
    #[serial]
    fn test_resolve_config_builtin_defaults() {
        let mut config = ConfigFile::default();
        config.google.api_key_env = Some("JTL_TEST_NONEXISTENT_API_KEY".to_string());
        // SAFETY: serialized test
        unsafe {
            std::env::remove_var(ACCESS_TOKEN_ENV);
        }

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

        assert!(resolved.target_languages.is_empty());
        assert_eq!(resolved.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.batch_size, DEFAULT_BATCH_SIZE);
        assert!(resolved.credentials.is_none());
    }

    #[test]
    #[serial]
    fn test_resolve_config_access_token() {
        let mut config = ConfigFile::default();
        config.google.api_key_env = Some("JTL_TEST_NONEXISTENT_API_KEY".to_string());
        let options = ResolveOptions {
            access_token: Some("tok".to_string()),
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &config).unwrap();

        assert_eq!(
            resolved.credentials,
            Some(Credentials::AccessToken("tok".to_string()))
        );
    }

    #[test]
    #[serial]
    fn test_resolve_config_access_token_from_env() {
        let mut config = ConfigFile::default();
        config.google.api_key_env = Some("JTL_TEST_NONEXISTENT_API_KEY".to_string());
        // SAFETY: serialized test
        unsafe {
            std::env::set_var(ACCESS_TOKEN_ENV, "env-token");
        }

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();

        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var(ACCESS_TOKEN_ENV);
        }
        assert_eq!(
            resolved.credentials,
            Some(Credentials::AccessToken("env-token".to_string()))
        );
    }

    #[test]
    #[serial]
    fn test_resolve_config_env_token_beats_file_key() {
        // SAFETY: serialized test
        unsafe {
            std::env::set_var(ACCESS_TOKEN_ENV, "env-token");
        }

        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var(ACCESS_TOKEN_ENV);
        }
        assert_eq!(
            resolved.credentials,
            Some(Credentials::AccessToken("env-token".to_string()))
        );
    }

    #[test]
    fn test_resolve_config_rejects_bad_batch_size() {
        for batch_size in [0, MAX_BATCH_SIZE + 1] {
            let options = ResolveOptions {
                batch_size: Some(batch_size),
                ..ResolveOptions::default()
            };

            let result = resolve_config(&options, &ConfigFile::default());

            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("batch size"));
        }
    }
}
