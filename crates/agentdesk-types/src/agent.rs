use crate::Project;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Role an agent plays for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    #[default]
    Analyst,
    Researcher,
    Consultant,
    Manager,
}

impl AgentMode {
    pub const ALL: [AgentMode; 4] = [
        AgentMode::Analyst,
        AgentMode::Researcher,
        AgentMode::Consultant,
        AgentMode::Manager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentMode::Analyst => "analyst",
            AgentMode::Researcher => "researcher",
            AgentMode::Consultant => "consultant",
            AgentMode::Manager => "manager",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AgentMode::Analyst => "Data Analyst",
            AgentMode::Researcher => "Researcher",
            AgentMode::Consultant => "Consultant",
            AgentMode::Manager => "Manager",
        }
    }

    /// Exact, case-sensitive tag lookup
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == tag)
    }

    /// Resolve a caller-supplied tag, falling back to the analyst for
    /// anything missing or unrecognised
    pub fn resolve(tag: Option<&str>) -> Self {
        tag.and_then(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for AgentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied context for an agent request.
///
/// Any JSON object is accepted and passed to the model as-is. A project page
/// sends `projectId` and `projectName`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentContext(pub Map<String, Value>);

impl AgentContext {
    pub fn for_project(project: &Project) -> Self {
        let mut context = Map::new();
        context.insert("projectId".to_string(), Value::from(project.id.clone()));
        context.insert("projectName".to_string(), Value::from(project.name.clone()));
        Self(context)
    }
}

/// A single agent invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub context: Option<AgentContext>,
    /// Mode as sent by the caller; anything but a known tag means analyst
    #[serde(default)]
    pub mode: Option<Value>,
}

impl AgentRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: None,
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(Value::String(mode.into()));
        self
    }

    pub fn with_context(mut self, context: AgentContext) -> Self {
        self.context = Some(context);
        self
    }

    /// The mode tag, when the caller sent a string
    pub fn mode_tag(&self) -> Option<&str> {
        self.mode.as_ref().and_then(Value::as_str)
    }
}

/// Result of an agent invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub success: bool,
    /// Raw backend text, verbatim
    pub output: String,
    /// JSON recovered from `output`, or null when none could be parsed
    pub structured: Option<Value>,
    pub mode: AgentMode,
    pub timestamp: DateTime<Utc>,
}
