//! SQLite backend with the same contract as the file store.
//!
//! The index lives in `projects` / `skills`, skill bodies in `skill_contents`.
//! Insertion order comes from the autoincrement `seq` column.

use std::path::Path;

use agentdesk_types::{NewProject, NewSkill, Project, Skill};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{info, warn};

use crate::error::Result;
use crate::repository::{require_name, ProjectRepository, SkillRepository};
use crate::slug::generate_id;

/// Persistence service for storing projects and skills in SQLite
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_path`
    pub async fn new(database_path: impl AsRef<Path>) -> Result<Self> {
        let database_path = database_path.as_ref();
        if let Some(parent) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let store = Self { pool };
        store.initialize_schema().await?;

        info!("SQLite store initialized with database: {}", database_path.display());
        Ok(store)
    }

    /// Create tables on first use
    async fn initialize_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS skills (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS skill_contents (
                skill_id TEXT PRIMARY KEY,
                content TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn parse_timestamp(row: &SqliteRow) -> DateTime<Utc> {
    let timestamp_str: String = row.get("created_at");
    DateTime::parse_from_rfc3339(&timestamp_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!(value = %timestamp_str, error = %e, "Unparsable created_at, using now");
            Utc::now()
        })
}

fn project_from_row(row: &SqliteRow) -> Project {
    Project {
        id: row.get("id"),
        name: row.get("name"),
        created_at: parse_timestamp(row),
    }
}

fn skill_from_row(row: &SqliteRow) -> Skill {
    Skill {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        category: row.get("category"),
        content: None,
        created_at: parse_timestamp(row),
    }
}

#[async_trait]
impl ProjectRepository for SqliteStore {
    async fn list(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM projects ORDER BY seq DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(project_from_row).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT id, name, created_at FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(project_from_row))
    }

    async fn create(&self, input: NewProject) -> Result<Project> {
        let name = require_name(&input.name)?;
        let project = Project {
            id: generate_id(&name),
            name,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO projects (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&project.id)
            .bind(&project.name)
            .bind(project.created_at.to_rfc3339())
            .execute(&self.pool)
            .await?;

        info!(id = %project.id, "Created project");
        Ok(project)
    }

    async fn rename(&self, id: &str, name: &str) -> Result<Option<Project>> {
        let name = require_name(name)?;
        let result = sqlx::query("UPDATE projects SET name = ? WHERE id = ?")
            .bind(&name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        info!(id, "Renamed project");
        ProjectRepository::get(self, id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(id, "Deleted project");
        }
        Ok(removed)
    }
}

#[async_trait]
impl SkillRepository for SqliteStore {
    async fn list(&self) -> Result<Vec<Skill>> {
        let rows = sqlx::query(
            "SELECT id, name, description, category, created_at FROM skills ORDER BY seq DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(skill_from_row).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Skill>> {
        let row = sqlx::query(
            r#"
            SELECT s.id, s.name, s.description, s.category, s.created_at, c.content
            FROM skills s
            LEFT JOIN skill_contents c ON c.skill_id = s.id
            WHERE s.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let content: Option<String> = row.get("content");
            skill_from_row(&row).with_content(content)
        }))
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

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO skills (id, name, description, category, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&skill.id)
        .bind(&skill.name)
        .bind(&skill.description)
        .bind(&skill.category)
        .bind(skill.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;
        sqlx::query("INSERT INTO skill_contents (skill_id, content) VALUES (?, ?)")
            .bind(&skill.id)
            .bind(&content)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(id = %skill.id, category = %skill.category, "Created skill");
        Ok(skill.with_content(Some(content)))
    }

    async fn update_content(&self, id: &str, content: &str) -> Result<Option<Skill>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            "SELECT id, name, description, category, created_at FROM skills WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO skill_contents (skill_id, content) VALUES (?, ?)
            ON CONFLICT(skill_id) DO UPDATE SET content = excluded.content
            "#,
        )
        .bind(id)
        .bind(content)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(id, bytes = content.len(), "Updated skill content");
        Ok(Some(skill_from_row(&row).with_content(Some(content.to_string()))))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM skills WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM skill_contents WHERE skill_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(id, "Deleted skill");
        }
        Ok(removed)
    }
}
