use std::sync::Arc;

use agentdesk_types::{AgentContext, AgentMode, AgentRequest, AgentResponse};
use chrono::Utc;
use tracing::{debug, info};

use crate::backend::{GenerationConfig, TextBackend};
use crate::error::{AgentError, Result};
use crate::extract::extract_json_object;
use crate::templates::template;

/// Turns an agent request into a single backend call and a structured reply
#[derive(Clone)]
pub struct AgentDispatcher {
    backend: Arc<dyn TextBackend>,
    generation: GenerationConfig,
}

impl AgentDispatcher {
    pub fn new(backend: Arc<dyn TextBackend>) -> Self {
        info!(
            backend = backend.name(),
            model = backend.model(),
            "Agent dispatcher initialized"
        );
        Self {
            backend,
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn backend(&self) -> &dyn TextBackend {
        self.backend.as_ref()
    }

    /// Run one agent invocation.
    ///
    /// The configuration check happens before the backend is contacted, so a
    /// missing key never costs a network round trip.
    pub async fn dispatch(&self, request: AgentRequest) -> Result<AgentResponse> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(AgentError::Validation("Query is required".to_string()));
        }

        let mode = AgentMode::resolve(request.mode_tag());
        if let Some(raw) = &request.mode {
            if request.mode_tag().and_then(AgentMode::parse).is_none() {
                debug!(mode = %raw, "Unknown agent mode, using analyst");
            }
        }

        self.backend.ensure_configured()?;

        let prompt = compose_prompt(mode, request.context.as_ref(), &request.query)?;
        info!(%mode, backend = self.backend.name(), "Dispatching agent request");

        let output = self.backend.generate(&prompt, &self.generation).await?;
        let structured = extract_json_object(&output);
        debug!(
            %mode,
            output_len = output.len(),
            structured = structured.is_some(),
            "Agent response received"
        );

        Ok(AgentResponse {
            success: true,
            output,
            structured,
            mode,
            timestamp: Utc::now(),
        })
    }
}

/// `{template}\n\nContext: {context json}\n\nQuery: {query}`
pub fn compose_prompt(
    mode: AgentMode,
    context: Option<&AgentContext>,
    query: &str,
) -> Result<String> {
    let context = match context {
        Some(context) => serde_json::to_string(context)?,
        None => "{}".to_string(),
    };
    Ok(format!(
        "{}\n\nContext: {}\n\nQuery: {}",
        template(mode),
        context,
        query
    ))
}
