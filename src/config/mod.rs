//! Configuration file management.

mod manager;

pub use manager::{
    ACCESS_TOKEN_ENV, ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_OUTPUT_DIR,
    GoogleConfig, JtlConfig, MAX_BATCH_SIZE, ResolveOptions, ResolvedConfig, resolve_config,
};
