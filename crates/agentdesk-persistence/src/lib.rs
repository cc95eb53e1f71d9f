//! AgentDesk record store
//!
//! Durable CRUD for projects and skills behind two repository traits:
//!
//! - [`FileProjectStore`] / [`FileSkillStore`]: JSON index files rewritten
//!   atomically on every change, skill content as one markdown file per id
//! - [`SqliteStore`]: the same contract over an embedded SQLite database
//!
//! Ids are slugs of the display name plus a random suffix. Lookups of unknown
//! ids return `None` (or `false` for deletes) rather than an error.

pub mod atomic;
pub mod blob;
pub mod collection;
pub mod error;
pub mod file_store;
pub mod repository;
pub mod slug;
pub mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

pub use error::{Result, StoreError};
pub use file_store::{FileProjectStore, FileSkillStore};
pub use repository::{ProjectRepository, SkillRepository};
pub use sqlite::SqliteStore;

/// Which backend holds the records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Sqlite,
}

/// Storage section of the gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root of the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Database file of the SQLite backend
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("agentdesk.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            database_path: default_database_path(),
        }
    }
}

/// The project and skill stores of one backend
#[derive(Clone)]
pub struct Storage {
    pub projects: Arc<dyn ProjectRepository>,
    pub skills: Arc<dyn SkillRepository>,
}

impl Storage {
    /// Open the configured backend
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::File => {
                info!("File store rooted at {}", config.data_dir.display());
                Ok(Self::file(&config.data_dir))
            }
            StorageBackend::Sqlite => Ok(Self::sqlite(SqliteStore::new(&config.database_path).await?)),
        }
    }

    /// File backend rooted at `data_dir`; nothing touches disk until first use
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            projects: Arc::new(FileProjectStore::new(&data_dir)),
            skills: Arc::new(FileSkillStore::new(&data_dir)),
        }
    }

    pub fn sqlite(store: SqliteStore) -> Self {
        Self {
            projects: Arc::new(store.clone()),
            skills: Arc::new(store),
        }
    }
}
