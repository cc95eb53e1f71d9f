use serde::{Deserialize, Serialize};

pub const GEMINI_DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// LLM Provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Provider {
    Gemini {
        model: String,
        api_key: Option<String>,
        base_url: String,
    },
    /// Any server speaking the OpenAI chat completions API (OpenAI, Ollama, vLLM)
    OpenAI {
        model: String,
        api_key: Option<String>,
        base_url: String,
    },
}

impl Provider {
    pub fn gemini(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self::Gemini {
            model: model.into(),
            api_key,
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn openai(model: impl Into<String>, api_key: Option<String>) -> Self {
        Self::OpenAI {
            model: model.into(),
            api_key,
            base_url: OPENAI_DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn ollama(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::OpenAI {
            model: model.into(),
            api_key: None,
            base_url: base_url.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        match &mut self {
            Self::Gemini { base_url, .. } | Self::OpenAI { base_url, .. } => {
                *base_url = url.into();
            }
        }
        self
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Gemini { model, .. } | Self::OpenAI { model, .. } => model,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini { .. } => "gemini",
            Self::OpenAI { .. } => "openai",
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::gemini(GEMINI_DEFAULT_MODEL, None)
    }
}
