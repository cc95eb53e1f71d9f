use agentdesk_logging::LogFormat;
use agentdesk_persistence::StorageConfig;
use agentdesk_provider::GenerationConfig;
use agentdesk_types::provider::{
    GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL, OPENAI_DEFAULT_BASE_URL, OPENAI_DEFAULT_MODEL,
};
use agentdesk_types::Provider;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[server]
bind = "127.0.0.1:3000"
cors = true

[providers]
default = "gemini"  # or "openai" (also Ollama, vLLM)

[providers.gemini]
api_key = ""  # Set via GOOGLE_API_KEY env var
model = "gemini-3-pro-preview"

[providers.openai]
api_key = ""  # Set via OPENAI_API_KEY env var
model = "gpt-4o-mini"
base_url = "https://api.openai.com/v1"  # Set via OPENAI_BASE_URL env var

[generation]
temperature = 0.7
max_output_tokens = 2048

[storage]
backend = "file"  # or "sqlite"
data_dir = "data"  # Set via AGENTDESK_DATA_DIR env var
database_path = "agentdesk.db"

[logging]
level = "info"  # trace, debug, info, warn, error
format = "pretty"  # or "json"
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_true")]
    pub cors: bool,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

fn default_gemini_model() -> String {
    GEMINI_DEFAULT_MODEL.to_string()
}

fn default_gemini_base_url() -> String {
    GEMINI_DEFAULT_BASE_URL.to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAIConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

fn default_openai_model() -> String {
    OPENAI_DEFAULT_MODEL.to_string()
}

fn default_openai_base_url() -> String {
    OPENAI_DEFAULT_BASE_URL.to_string()
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProvidersConfig {
    #[serde(default = "default_provider")]
    pub default: String,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub openai: OpenAIConfig,
}

fn default_provider() -> String {
    "gemini".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            default: default_provider(),
            gemini: GeminiConfig::default(),
            openai: OpenAIConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.agentdesk/agentdesk.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".agentdesk").join("agentdesk.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()?;

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
            eprintln!("Please edit this file or set environment variables.");
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.agentdesk/agentdesk.toml (auto-created if missing)
    /// 2. Local override: ./agentdesk.toml (workspace, optional)
    /// 3. Environment variables with AGENTDESK__ prefix
    /// 4. Convenience variables (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        let mut config_builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("agentdesk").required(false))
            .add_source(config::Environment::with_prefix("AGENTDESK").separator("__"));

        if let Ok(key) = env::var("GOOGLE_API_KEY") {
            config_builder = config_builder.set_override("providers.gemini.api_key", key)?;
        }

        if let Ok(key) = env::var("OPENAI_API_KEY") {
            config_builder = config_builder.set_override("providers.openai.api_key", key)?;
        }

        if let Ok(url) = env::var("OPENAI_BASE_URL") {
            config_builder = config_builder.set_override("providers.openai.base_url", url)?;
        }

        if let Ok(dir) = env::var("AGENTDESK_DATA_DIR") {
            config_builder = config_builder.set_override("storage.data_dir", dir)?;
        }

        let config: Self = config_builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Parse a single TOML document, with defaults for anything it leaves out
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// The backend selected by `providers.default`
    pub fn provider(&self) -> Provider {
        let providers = &self.providers;
        match providers.default.as_str() {
            "gemini" => Provider::gemini(
                &providers.gemini.model,
                non_empty(providers.gemini.api_key.as_deref()),
            )
            .with_base_url(&providers.gemini.base_url),
            "openai" => Provider::openai(
                &providers.openai.model,
                non_empty(providers.openai.api_key.as_deref()),
            )
            .with_base_url(&providers.openai.base_url),
            other => {
                warn!("Unknown provider '{}', defaulting to Gemini", other);
                Provider::gemini(
                    &providers.gemini.model,
                    non_empty(providers.gemini.api_key.as_deref()),
                )
                .with_base_url(&providers.gemini.base_url)
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
