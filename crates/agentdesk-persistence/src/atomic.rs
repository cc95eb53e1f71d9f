//! Whole-file atomic writes: temp file, fsync, rename.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

const TMP_SUFFIX: &str = ".tmp";

/// Replace `path` with `content` so readers see either the old or the new
/// file, never a partial one.
///
/// Every call stages into its own uniquely named temp file next to the
/// target, so concurrent writers never share a staging file.
pub(crate) async fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let prefix = temp_prefix(path);
    let target = path.to_path_buf();
    let bytes = content.as_bytes().to_vec();

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        let mut staged = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(TMP_SUFFIX)
            .tempfile_in(&dir)?;
        staged.write_all(&bytes)?;
        staged.as_file().sync_all()?;
        // POSIX rename replaces the target atomically; a failed persist
        // removes the staging file on drop
        staged.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(io::Error::other)??;

    debug!(path = %path.display(), "Atomic write completed");
    Ok(())
}

/// Name prefix of the staging files for `path`: `projects.json` -> `.projects.json.`
pub(crate) fn temp_prefix(path: &Path) -> String {
    let name = path.file_name().and_then(OsStr::to_str).unwrap_or_default();
    format!(".{}.", name)
}

/// Delete staging files starting with `prefix` left behind by a write that
/// never reached its rename
pub(crate) async fn recover_interrupted_writes(dir: &Path, prefix: &str) {
    let Ok(mut entries) = fs::read_dir(dir).await else {
        return;
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if name.starts_with(prefix) && name.ends_with(TMP_SUFFIX) {
            let path = entry.path();
            debug!(path = %path.display(), "Removing interrupted write");
            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "Failed to remove stale temp file");
            }
        }
    }
}
