//! 基于本地 JSON 文件的快照仓储

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use quote_watch_domain::{QuoteWatchError, SnapshotRepository};

/// 写入先落到同目录的临时文件，再 rename 覆盖目标文件，
/// 读者只会看到完整的旧文件或完整的新文件
pub struct FileSnapshotRepository {
    path: PathBuf,
}

impl FileSnapshotRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn unavailable(path: &Path, e: std::io::Error) -> QuoteWatchError {
    QuoteWatchError::StoreUnavailable(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl SnapshotRepository for FileSnapshotRepository {
    fn name(&self) -> &str {
        "file"
    }

    async fn put(&self, blob: &str) -> Result<(), QuoteWatchError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| unavailable(parent, e))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, blob)
            .await
            .map_err(|e| unavailable(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| unavailable(&self.path, e))?;

        debug!("快照已写入 {} ({} bytes)", self.path.display(), blob.len());
        Ok(())
    }

    async fn get(&self) -> Result<String, QuoteWatchError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) if blob.trim().is_empty() => Err(QuoteWatchError::SnapshotNotFound),
            Ok(blob) => Ok(blob),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(QuoteWatchError::SnapshotNotFound),
            Err(e) => Err(unavailable(&self.path, e)),
        }
    }
}
