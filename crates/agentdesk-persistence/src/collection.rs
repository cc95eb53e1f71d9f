//! A JSON array on disk, rewritten as a whole on every change.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

use agentdesk_types::{Project, Skill};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::{debug, warn};

use crate::atomic::{recover_interrupted_writes, temp_prefix, write_atomic};
use crate::error::Result;

/// A record that lives in an index collection
pub trait IndexRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl IndexRecord for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

impl IndexRecord for Skill {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Most-recent-first collection persisted as one JSON file.
///
/// Writers are serialised within the process; readers never block.
pub struct JsonCollection<R> {
    path: PathBuf,
    write_lock: Mutex<()>,
    recovered: OnceCell<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: IndexRecord> JsonCollection<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            recovered: OnceCell::new(),
            _record: PhantomData,
        }
    }

    /// Hold this while doing a read-modify-write that spans other storage
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Clear staging files of writes interrupted in an earlier run
    async fn recover(&self) {
        self.recovered
            .get_or_init(|| async {
                if let Some(parent) = self.path.parent() {
                    recover_interrupted_writes(parent, &temp_prefix(&self.path)).await;
                }
            })
            .await;
    }

    /// Read every record without writing; a missing index counts as empty
    async fn read(&self) -> Result<Vec<R>> {
        self.recover().await;

        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(path = %self.path.display(), error = %e, "Index is not valid UTF-8, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&data) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Index failed to parse, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Write the full collection; callers hold [`lock`](Self::lock)
    async fn save(&self, records: &[R]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(records)?;
        write_atomic(&self.path, &data).await?;
        Ok(())
    }

    /// Read every record, seeding an empty index first if it is missing.
    /// An unreadable index counts as empty.
    pub async fn load(&self) -> Result<Vec<R>> {
        self.recover().await;
        if !fs::try_exists(&self.path).await? {
            let _guard = self.lock().await;
            if !fs::try_exists(&self.path).await? {
                self.save(&[]).await?;
                debug!(path = %self.path.display(), "Initialized empty collection");
            }
        }
        self.read().await
    }

    pub async fn find(&self, id: &str) -> Result<Option<R>> {
        Ok(self.load().await?.into_iter().find(|r| r.id() == id))
    }

    /// Insert at the front, making `record` the most recent
    pub async fn prepend(&self, record: R) -> Result<()> {
        let _guard = self.lock().await;
        let mut records = self.read().await?;
        records.insert(0, record);
        self.save(&records).await
    }

    /// Apply `change` to the record with `id`; nothing is written when the
    /// id is unknown
    pub async fn modify<F>(&self, id: &str, change: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut R) + Send,
    {
        let _guard = self.lock().await;
        let mut records = self.read().await?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        change(record);
        let updated = record.clone();
        self.save(&records).await?;
        Ok(Some(updated))
    }

    /// Remove the record with `id`, returning it if it was present
    pub async fn remove(&self, id: &str) -> Result<Option<R>> {
        let _guard = self.lock().await;
        self.remove_locked(id).await
    }

    /// [`remove`](Self::remove) for callers already holding [`lock`](Self::lock)
    pub async fn remove_locked(&self, id: &str) -> Result<Option<R>> {
        let mut records = self.read().await?;
        let Some(index) = records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let removed = records.remove(index);
        self.save(&records).await?;
        Ok(Some(removed))
    }

    /// [`find`](Self::find) for callers already holding [`lock`](Self::lock)
    pub async fn find_locked(&self, id: &str) -> Result<Option<R>> {
        Ok(self.read().await?.into_iter().find(|r| r.id() == id))
    }
}
