use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;
use tracing::{info, warn};

use crate::llm_providers::LLMProviderType;

// Import logging macros
use crate::{log_system_event, log_validation};

pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_GEMINI_MODEL: &str = "models/gemini-2.5-flash";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

/// Complete application configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LLMConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Credentials and model for a single provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub name: String,
    pub api_key: Option<String>,
    pub model_id: String,
    pub base_url: String,
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Ordered, deduplicated provider preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOrder(Vec<LLMProviderType>);

impl ProviderOrder {
    pub const DEFAULT: [LLMProviderType; 2] = [LLMProviderType::Groq, LLMProviderType::Gemini];

    /// Parse a comma-separated preference string such as `"gemini, groq"`.
    ///
    /// Unknown tokens are dropped, duplicates keep their first position and an
    /// empty result falls back to [`ProviderOrder::DEFAULT`].
    pub fn parse(raw: &str) -> Self {
        let mut order = Vec::new();
        for token in raw.split(',') {
            let token = token.trim().to_lowercase();
            if let Some(provider) = LLMProviderType::from_identifier(&token) {
                if !order.contains(&provider) {
                    order.push(provider);
                }
            }
        }

        if order.is_empty() {
            return Self::default();
        }
        Self(order)
    }

    pub fn providers(&self) -> &[LLMProviderType] {
        &self.0
    }
}

impl Default for ProviderOrder {
    fn default() -> Self {
        Self(Self::DEFAULT.to_vec())
    }
}

/// Large Language Model configuration for every known provider
#[derive(Debug, Clone)]
pub struct LLMConfig {
    pub groq: ProviderConfig,
    pub gemini: ProviderConfig,
    pub order: ProviderOrder,
}

impl LLMConfig {
    pub fn provider(&self, provider_type: LLMProviderType) -> &ProviderConfig {
        match provider_type {
            LLMProviderType::Groq => &self.groq,
            LLMProviderType::Gemini => &self.gemini,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Logging system configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    pub console_enabled: bool,
    pub log_directory: String,
}

/// Flat `KEY = "value"` secrets file consulted when an environment variable
/// is absent.
#[derive(Debug, Clone, Default)]
pub struct SecretsStore {
    values: HashMap<String, String>,
}

impl SecretsStore {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let table: toml::Table = contents
            .parse()
            .map_err(|e| anyhow!("Invalid secrets file: {}", e))?;

        let values = table
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    _ => return None,
                };
                Some((key, text))
            })
            .collect();

        Ok(Self { values })
    }

    /// Load the secrets file. A missing file is an empty store; a broken one
    /// is logged and ignored.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|contents| Self::from_toml_str(&contents))
        {
            Ok(store) => {
                info!(path = %path.display(), keys = store.values.len(), "Loaded secrets file");
                store
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable secrets file");
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Environment first, secrets store second. Empty values count as absent.
struct Resolver<'a, F> {
    env: F,
    secrets: &'a SecretsStore,
}

impl<F> Resolver<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .filter(|v| !v.is_empty())
            .or_else(|| self.secrets.get(key).filter(|v| !v.is_empty()).map(str::to_string))
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

impl Config {
    /// Load configuration from the process environment and the secrets file
    pub fn from_env() -> Result<Self> {
        log_system_event!(config, "Loading application configuration from environment variables");

        let secrets_path =
            env::var("SECRETS_FILE").unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string());
        let secrets = SecretsStore::load(&secrets_path);

        let config = Self::from_sources(|key| env::var(key).ok(), &secrets)?;

        log_system_event!(config, "Configuration loaded successfully");

        Ok(config)
    }

    /// Resolve configuration from an arbitrary key lookup plus a secrets store
    pub fn from_sources<F>(env: F, secrets: &SecretsStore) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolver = Resolver { env, secrets };

        Ok(Config {
            llm: LLMConfig::resolve(&resolver),
            server: ServerConfig::resolve(&resolver)?,
            logging: LoggingConfig::resolve(&resolver),
        })
    }

    /// Log a summary of loaded configuration (without sensitive data)
    pub fn log_configuration_summary(&self) {
        info!(
            provider_order = ?self.llm.order.providers(),
            groq_model = %self.llm.groq.model_id,
            groq_key = %self.llm.groq.api_key.as_deref().map(mask_sensitive_data).unwrap_or_default(),
            gemini_model = %self.llm.gemini.model_id,
            gemini_key = %self.llm.gemini.api_key.as_deref().map(mask_sensitive_data).unwrap_or_default(),
            server_address = %format!("{}:{}", self.server.host, self.server.port),
            log_level = %self.logging.level,
            "Configuration summary"
        );
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("Server port must be greater than 0"));
        }

        // Missing keys only fail when that provider is tried
        for provider_type in self.llm.order.providers() {
            let provider = self.llm.provider(*provider_type);
            if !provider.is_configured() {
                warn!(
                    provider = %provider.name,
                    "LLM API key is not set - this provider will be skipped at request time"
                );
            }
        }

        if !["trace", "debug", "info", "warn", "error"]
            .iter()
            .any(|level| self.logging.level.to_lowercase().starts_with(level))
        {
            warn!("Unusual log filter '{}', falling back to defaults if it fails to parse", self.logging.level);
        }

        log_validation!(success, "configuration", "Configuration validation completed successfully");
        Ok(())
    }
}

impl LLMConfig {
    fn resolve<F>(resolver: &Resolver<'_, F>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let groq = ProviderConfig {
            name: LLMProviderType::Groq.identifier().to_string(),
            api_key: resolver.get("GROQ_API_KEY"),
            model_id: resolver.get_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            base_url: resolver.get_or("GROQ_BASE_URL", DEFAULT_GROQ_BASE_URL),
        };

        let gemini = ProviderConfig {
            name: LLMProviderType::Gemini.identifier().to_string(),
            api_key: resolver.get("GEMINI_API_KEY"),
            model_id: resolver.get_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: resolver.get_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
        };

        let order = resolver
            .get("LLM_ORDER")
            .map(|raw| ProviderOrder::parse(&raw))
            .unwrap_or_default();

        LLMConfig { groq, gemini, order }
    }
}

impl ServerConfig {
    fn resolve<F>(resolver: &Resolver<'_, F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port_str = resolver.get_or("PORT", "8501");

        let port = port_str
            .parse::<u16>()
            .map_err(|_| anyhow!("Invalid PORT value: '{}'. Must be a number between 1-65535", port_str))?;

        let host = resolver.get_or("HOST", "0.0.0.0");

        Ok(ServerConfig { port, host })
    }
}

impl LoggingConfig {
    fn resolve<F>(resolver: &Resolver<'_, F>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = resolver.get_or("RUST_LOG", "info,math_practice=debug");

        let file_enabled = resolver
            .get_or("LOG_FILE_ENABLED", "true")
            .parse::<bool>()
            .unwrap_or(true);

        let console_enabled = resolver
            .get_or("LOG_CONSOLE_ENABLED", "true")
            .parse::<bool>()
            .unwrap_or(true);

        let log_directory = resolver.get_or("LOG_DIRECTORY", "logs");

        LoggingConfig {
            level,
            file_enabled,
            console_enabled,
            log_directory,
        }
    }
}

/// Mask sensitive data in configuration for safe logging
fn mask_sensitive_data(data: &str) -> String {
    let char_count = data.chars().count();
    if char_count <= 8 {
        "*".repeat(char_count)
    } else {
        let prefix: String = data.chars().take(4).collect();
        let suffix: String = data.chars().skip(char_count - 4).collect();
        format!("{}***{}", prefix, suffix)
    }
}
