use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::fs;
use uuid::Uuid;

use crate::error::Result;

/// Session-scoped store for the exact bytes that were submitted for
/// recognition.
///
/// Every stored frame gets a fresh name under a temp directory; the
/// directory and everything in it are removed when the store drops.
#[derive(Debug)]
pub struct ThumbnailStore {
    dir: TempDir,
}

impl ThumbnailStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Writes `bytes` under a fresh name and returns the local path.
    pub async fn store(&self, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.path().join(format!("{}.jpg", Uuid::new_v4()));
        fs::write(&path, bytes).await?;
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
