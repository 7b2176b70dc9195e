//! Flat-text progress files: the post-discovery snapshot of every
//! discovered object_id, and the append-only log of exported ones.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only log of exported object_ids, one per line in completion
/// order. Created fresh (truncating any prior run) at pipeline start.
pub struct CheckpointLog {
    file: Mutex<File>,
    path: PathBuf,
}

impl CheckpointLog {
    pub async fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path).await?;
        Ok(Self {
            file: Mutex::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Append one object_id. The file lock serializes concurrent export
    /// tasks so a line is never interleaved with another.
    pub async fn record(&self, object_id: u64) -> std::io::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(format!("{object_id}\n").as_bytes()).await?;
        file.flush().await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write the snapshot of every discovered object_id, one per line,
/// overwriting any previous file. Runs once, right after discovery,
/// regardless of how the export phase later fares.
pub async fn write_all_ids(path: &Path, ids: &[u64]) -> std::io::Result<()> {
    let lines = ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    tokio::fs::write(path, lines).await
}
