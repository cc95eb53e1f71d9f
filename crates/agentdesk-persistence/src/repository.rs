//! Store contracts shared by every backend

use agentdesk_types::{NewProject, NewSkill, Project, Skill};
use async_trait::async_trait;

use crate::error::{Result, StoreError};

/// CRUD over projects.
///
/// `list` is most-recent-first. Unknown ids are reported as `None` / `false`,
/// never as errors.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>>;

    async fn get(&self, id: &str) -> Result<Option<Project>>;

    /// Fails with [`StoreError::Validation`] when the name is blank
    async fn create(&self, input: NewProject) -> Result<Project>;

    async fn rename(&self, id: &str, name: &str) -> Result<Option<Project>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

/// CRUD over skills, with markdown content stored apart from the index.
///
/// `list` never carries content; `get` joins it in when a blob exists.
/// Metadata is fixed at creation, only the content can change.
#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Skill>>;

    async fn get(&self, id: &str) -> Result<Option<Skill>>;

    /// Fails with [`StoreError::Validation`] when the name is blank
    async fn create(&self, input: NewSkill) -> Result<Skill>;

    async fn update_content(&self, id: &str, content: &str) -> Result<Option<Skill>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Trimmed display name, or a validation error when nothing is left
pub(crate) fn require_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::validation("Name is required"));
    }
    Ok(name.to_string())
}
