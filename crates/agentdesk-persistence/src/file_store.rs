//! Default backend: JSON index files plus a directory of markdown blobs.
//!
//! ```text
//! <data_dir>/projects.json
//! <data_dir>/skills.json
//! <data_dir>/skills-content/<id>.md
//! ```

use std::path::Path;

use agentdesk_types::{NewProject, NewSkill, Project, Skill};
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::blob::BlobDir;
use crate::collection::JsonCollection;
use crate::error::Result;
use crate::repository::{require_name, ProjectRepository, SkillRepository};
use crate::slug::generate_id;

pub const PROJECTS_FILE: &str = "projects.json";
pub const SKILLS_FILE: &str = "skills.json";
pub const SKILLS_CONTENT_DIR: &str = "skills-content";
pub const SKILL_CONTENT_EXTENSION: &str = "md";

/// Projects kept in `<data_dir>/projects.json`
pub struct FileProjectStore {
    projects: JsonCollection<Project>,
}

impl FileProjectStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            projects: JsonCollection::new(data_dir.as_ref().join(PROJECTS_FILE)),
        }
    }
}

#[async_trait]
impl ProjectRepository for FileProjectStore {
    async fn list(&self) -> Result<Vec<Project>> {
        self.projects.load().await
    }

    async fn get(&self, id: &str) -> Result<Option<Project>> {
        self.projects.find(id).await
    }

    async fn create(&self, input: NewProject) -> Result<Project> {
        let name = require_name(&input.name)?;
        let project = Project {
            id: generate_id(&name),
            name,
            created_at: Utc::now(),
        };

        self.projects.prepend(project.clone()).await?;
        info!(id = %project.id, "Created project");
        Ok(project)
    }

    async fn rename(&self, id: &str, name: &str) -> Result<Option<Project>> {
        let name = require_name(name)?;
        let updated = self.projects.modify(id, |p| p.name = name).await?;
        if updated.is_some() {
            info!(id, "Renamed project");
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.projects.remove(id).await?.is_some();
        if removed {
            info!(id, "Deleted project");
        }
        Ok(removed)
    }
}

/// Skill index in `<data_dir>/skills.json`, content in `<data_dir>/skills-content/`
pub struct FileSkillStore {
    index: JsonCollection<Skill>,
    contents: BlobDir,
}

impl FileSkillStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            index: JsonCollection::new(data_dir.join(SKILLS_FILE)),
            contents: BlobDir::new(data_dir.join(SKILLS_CONTENT_DIR), SKILL_CONTENT_EXTENSION),
        }
    }
}

#[async_trait]
impl SkillRepository for FileSkillStore {
    async fn list(&self) -> Result<Vec<Skill>> {
        Ok(self
            .index
            .load()
            .await?
            .into_iter()
            .map(Skill::without_content)
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Skill>> {
        let Some(skill) = self.index.find(id).await? else {
            return Ok(None);
        };
        let content = self.contents.read(id).await?;
        Ok(Some(skill.with_content(content)))
    }

    async fn create(&self, input: NewSkill) -> Result<Skill> {
        let name = require_name(&input.name)?;
        let content = input.content_or_placeholder();
        let skill = Skill {
            id: generate_id(&name),
            name,
            description: input.description.trim().to_string(),
            category: input.category,
            content: None,
            created_at: Utc::now(),
        };

        // Blob first: a crash in between leaves an orphan file, never an
        // index entry pointing at nothing
        self.contents.write(&skill.id, &content).await?;
        self.index.prepend(skill.clone()).await?;

        info!(id = %skill.id, category = %skill.category, "Created skill");
        Ok(skill.with_content(Some(content)))
    }

    async fn update_content(&self, id: &str, content: &str) -> Result<Option<Skill>> {
        let _guard = self.index.lock().await;
        let Some(skill) = self.index.find_locked(id).await? else {
            return Ok(None);
        };

        self.contents.write(id, content).await?;
        info!(id, bytes = content.len(), "Updated skill content");
        Ok(Some(skill.with_content(Some(content.to_string()))))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.index.lock().await;
        if self.index.remove_locked(id).await?.is_none() {
            return Ok(false);
        }

        self.contents.remove(id).await?;
        info!(id, "Deleted skill");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::fs;

    #[tokio::test]
    async fn test_skill_layout_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSkillStore::new(dir.path());

        let skill = store
            .create(NewSkill::new("Data Cleaning").with_content("# Clean"))
            .await
            .unwrap();

        let blob = dir
            .path()
            .join(SKILLS_CONTENT_DIR)
            .join(format!("{}.md", skill.id));
        assert_eq!(fs::read_to_string(&blob).await.unwrap(), "# Clean");

        let index = fs::read_to_string(dir.path().join(SKILLS_FILE)).await.unwrap();
        assert!(index.contains(&skill.id));
        assert!(!index.contains("# Clean"));
    }

    #[tokio::test]
    async fn test_list_strips_legacy_inline_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SKILLS_FILE),
            r##"[{"id":"old-abc123","name":"Old","description":"","category":"business","content":"# inline","createdAt":"2025-01-01T00:00:00Z"}]"##,
        )
        .await
        .unwrap();

        let store = FileSkillStore::new(dir.path());
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].content.is_none());

        // No blob on disk: the skill exists without content
        let fetched = store.get("old-abc123").await.unwrap().unwrap();
        assert!(fetched.content.is_none());
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSkillStore::new(dir.path());
        let skill = store.create(NewSkill::new("Temp")).await.unwrap();

        fs::remove_file(
            dir.path()
                .join(SKILLS_CONTENT_DIR)
                .join(format!("{}.md", skill.id)),
        )
        .await
        .unwrap();

        assert!(store.delete(&skill.id).await.unwrap());
        assert!(store.get(&skill.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reinitializes_after_data_dir_removed() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let store = FileProjectStore::new(&data_dir);
        store.create(NewProject::new("First")).await.unwrap();

        fs::remove_dir_all(&data_dir).await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
        store.create(NewProject::new("Second")).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_during_first_create() {
        for _ in 0..50 {
            let dir = tempfile::tempdir().unwrap();
            let store = Arc::new(FileProjectStore::new(dir.path().join("data")));

            let readers: Vec<_> = (0..6)
                .map(|_| {
                    let store = store.clone();
                    tokio::spawn(async move { store.list().await })
                })
                .collect();
            let writer = {
                let store = store.clone();
                tokio::spawn(async move { store.create(NewProject::new("Alpha")).await })
            };

            for reader in readers {
                reader.await.unwrap().unwrap();
            }
            let created = writer.await.unwrap().unwrap();

            assert_eq!(store.get(&created.id).await.unwrap(), Some(created));
            assert_eq!(store.list().await.unwrap().len(), 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_skill_creates_on_fresh_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSkillStore::new(dir.path()));

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.list().await.unwrap();
                    store.create(NewSkill::new(format!("Skill {}", i))).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 8);
    }
}
