//! Layered configuration for Critique
//!
//! Values are resolved in order (later wins):
//! 1. Built-in defaults
//! 2. `critique.toml` in the working directory, or an explicit `--config` file
//! 3. Environment variables `CRITIQUE__<SECTION>__<KEY>` (e.g. `CRITIQUE__SERVER__ADDR`)
//!
//! The provider credential additionally falls back to `OPENAI_API_KEY`.

use crate::error::Result;
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::debug;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "critique";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CRITIQUE";

/// Legacy credential variable accepted for the completion provider
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CritiqueConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path, or `:memory:`
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: "critique.db".to_string(),
        }
    }
}

/// Completion provider settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API root; `/chat/completions` is appended
    pub base_url: String,

    /// Provider credential. Absent or blank means fallback-only generation.
    pub api_key: Option<String>,

    pub model: String,

    /// Max tokens for responses
    pub max_tokens: u32,

    /// Temperature for sampling
    pub temperature: f32,

    /// Upper bound on a single outbound call
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.a4f.co/v1".to_string(),
            api_key: None,
            model: "provider-2/gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// The configured credential, if it is non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Header carrying the identity resolved by the upstream authentication layer
    pub user_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: "x-user-id".to_string(),
        }
    }
}

impl CritiqueConfig {
    /// Load configuration from defaults, file and environment
    ///
    /// An explicit `path` must exist; the default `critique.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder.add_source(config::File::from(path).required(true))
            }
            None => builder.add_source(config::File::with_name(CONFIG_FILE_NAME).required(false)),
        };

        let mut loaded: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        if loaded.llm.api_key().is_none() {
            loaded.llm.api_key = env::var(API_KEY_ENV).ok();
        }

        debug!(
            "Configuration loaded (addr: {}, database: {}, provider configured: {})",
            loaded.server.addr,
            loaded.storage.database,
            loaded.llm.api_key().is_some()
        );

        Ok(loaded)
    }
}
