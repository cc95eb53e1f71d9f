//! OpenAI-compatible chat completions backend (OpenAI, Ollama, vLLM)

use agentdesk_types::provider::{OPENAI_DEFAULT_BASE_URL, OPENAI_DEFAULT_MODEL};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::backend::{usable_key, GenerationConfig, TextBackend};
use crate::error::{AgentError, Result};

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    pub(crate) fn new(model: &'a str, prompt: &'a str, generation: &GenerationConfig) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: generation.temperature,
            max_tokens: generation.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    pub(crate) fn into_text(self) -> String {
        let Some(choice) = self.choices.into_iter().next() else {
            warn!("Chat completion returned no choices");
            return String::new();
        };
        choice
            .message
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

/// Chat completions backend
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiBackend {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: OPENAI_DEFAULT_MODEL.to_string(),
            base_url: OPENAI_DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Hosted OpenAI needs a key; self-hosted servers usually don't
    fn requires_key(&self) -> bool {
        self.base_url.trim_end_matches('/') == OPENAI_DEFAULT_BASE_URL
    }
}

#[async_trait]
impl TextBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.requires_key() && usable_key(self.api_key.as_deref()).is_none() {
            return Err(AgentError::Configuration(
                "OpenAI API key not configured".to_string(),
            ));
        }
        Ok(())
    }

    async fn generate(&self, prompt: &str, generation: &GenerationConfig) -> Result<String> {
        self.ensure_configured()?;
        let body = ChatCompletionRequest::new(&self.model, prompt, generation);

        debug!(model = %self.model, base_url = %self.base_url, "Sending chat completion request");
        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = usable_key(self.api_key.as_deref()) {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!(%status, body = %text, "Chat completion API error");
            return Err(AgentError::Backend {
                status: Some(status.as_u16()),
                message: text,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| AgentError::Backend {
                status: Some(status.as_u16()),
                message: format!("unexpected response body: {}", e),
            })?;

        Ok(parsed.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let generation = GenerationConfig {
            temperature: 0.2,
            max_output_tokens: 512,
        };
        let body =
            serde_json::to_value(ChatCompletionRequest::new("llama3", "hi", &generation)).unwrap();

        assert_eq!(body["model"], "llama3");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["max_tokens"], 512);
    }

    #[test]
    fn test_response_text_extraction() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "hello"}}]
        }))
        .unwrap();
        assert_eq!(response.into_text(), "hello");

        let empty: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(empty.into_text(), "");
    }

    #[test]
    fn test_key_required_only_for_hosted_openai() {
        let hosted = OpenAiBackend::new(None);
        assert!(matches!(
            hosted.ensure_configured(),
            Err(AgentError::Configuration(_))
        ));

        let local = OpenAiBackend::new(None).with_base_url("http://localhost:11434/v1");
        assert!(local.ensure_configured().is_ok());
        assert_eq!(local.endpoint(), "http://localhost:11434/v1/chat/completions");
    }
}
