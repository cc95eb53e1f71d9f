//! One file per record for content too large to keep in the index.

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs;
use tokio::sync::OnceCell;
use tracing::warn;

use crate::atomic::{recover_interrupted_writes, write_atomic};
use crate::error::Result;

/// Directory of `<id>.<extension>` blobs
pub struct BlobDir {
    dir: PathBuf,
    extension: &'static str,
    recovered: OnceCell<()>,
}

impl BlobDir {
    pub fn new(dir: impl Into<PathBuf>, extension: &'static str) -> Self {
        Self {
            dir: dir.into(),
            extension,
            recovered: OnceCell::new(),
        }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, self.extension))
    }

    async fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        self.recovered
            .get_or_init(|| recover_interrupted_writes(&self.dir, "."))
            .await;
        Ok(())
    }

    /// Blob contents, or `None` when there is no readable blob for `id`
    pub async fn read(&self, id: &str) -> Result<Option<String>> {
        self.ensure_exists().await?;
        let path = self.path_for(id);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable content blob");
                Ok(None)
            }
        }
    }

    pub async fn write(&self, id: &str, content: &str) -> Result<()> {
        self.ensure_exists().await?;
        write_atomic(&self.path_for(id), content).await?;
        Ok(())
    }

    /// Remove the blob for `id`; a missing blob is not an error
    pub async fn remove(&self, id: &str) -> Result<bool> {
        self.ensure_exists().await?;
        match fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
