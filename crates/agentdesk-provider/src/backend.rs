//! Text generation backends

use std::sync::Arc;

use agentdesk_types::Provider;
use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::gemini::GeminiBackend;
use crate::openai::OpenAiBackend;

/// Sampling settings sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// A service that turns one prompt into one block of text
#[async_trait]
pub trait TextBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Fails with a configuration error when the backend cannot be called
    /// at all, e.g. a missing API key. Must not touch the network.
    fn ensure_configured(&self) -> Result<()>;

    async fn generate(&self, prompt: &str, generation: &GenerationConfig) -> Result<String>;
}

/// True for empty keys and the `your-...-here` values shipped in templates
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || (key.starts_with("your-") && key.ends_with("-here"))
}

/// The usable part of a configured key
pub(crate) fn usable_key(key: Option<&str>) -> Option<&str> {
    key.filter(|k| !is_placeholder_key(k))
}

/// Build the backend described by `provider`, sharing `client`'s pool
pub fn backend_for(provider: &Provider, client: reqwest::Client) -> Arc<dyn TextBackend> {
    match provider {
        Provider::Gemini {
            model,
            api_key,
            base_url,
        } => Arc::new(
            GeminiBackend::new(api_key.clone())
                .with_client(client)
                .with_model(model)
                .with_base_url(base_url),
        ),
        Provider::OpenAI {
            model,
            api_key,
            base_url,
        } => Arc::new(
            OpenAiBackend::new(api_key.clone())
                .with_client(client)
                .with_model(model)
                .with_base_url(base_url),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_keys() {
        assert!(is_placeholder_key(""));
        assert!(is_placeholder_key("   "));
        assert!(is_placeholder_key("your-google-api-key-here"));
        assert!(is_placeholder_key("your-openai-api-key-here"));
        assert!(!is_placeholder_key("AIzaSyD-real-looking-key"));
    }

    #[test]
    fn test_backend_for_provider() {
        let client = reqwest::Client::new();

        let gemini = backend_for(&Provider::default(), client.clone());
        assert_eq!(gemini.name(), "gemini");
        assert_eq!(gemini.model(), "gemini-3-pro-preview");

        let ollama = backend_for(&Provider::ollama("llama3", "http://localhost:11434/v1"), client);
        assert_eq!(ollama.name(), "openai");
        assert_eq!(ollama.model(), "llama3");
    }

    #[test]
    fn test_generation_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_output_tokens, 2048);
    }
}
