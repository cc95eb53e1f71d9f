use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Advisory skill categories shown by the workspace UI.
///
/// Stores keep the category as a plain string and never reject unknown
/// values; this enum only names the well-known ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    #[default]
    Analytics,
    Business,
    Integration,
    Automation,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Analytics,
        SkillCategory::Business,
        SkillCategory::Integration,
        SkillCategory::Automation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Analytics => "analytics",
            SkillCategory::Business => "business",
            SkillCategory::Integration => "integration",
            SkillCategory::Automation => "automation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillCategory::Analytics => "Analytics",
            SkillCategory::Business => "Business",
            SkillCategory::Integration => "Integration",
            SkillCategory::Automation => "Automation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A skill: metadata kept in the index plus markdown content kept apart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Markdown body, only populated on single-record fetches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Skill {
    /// Index-only projection of this skill
    pub fn without_content(mut self) -> Self {
        self.content = None;
        self
    }

    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = content;
        self
    }

    /// The category if it is one of the well-known ones
    pub fn known_category(&self) -> Option<SkillCategory> {
        SkillCategory::parse(&self.category)
    }
}

/// Input for creating a skill
#[derive(Debug, Clone, Default)]
pub struct NewSkill {
    pub name: String,
    pub description: String,
    pub category: String,
    pub content: Option<String>,
}

impl NewSkill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: SkillCategory::default().as_str().to_string(),
            content: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Content to persist: the supplied body, or a placeholder when it is blank
    pub fn content_or_placeholder(&self) -> String {
        match self.content.as_deref() {
            Some(content) if !content.trim().is_empty() => content.to_string(),
            _ => placeholder_content(self.name.trim()),
        }
    }
}

/// Starter markdown for a skill created without content
pub fn placeholder_content(name: &str) -> String {
    format!("# {}\n\nAdd your skill content here.", name)
}
