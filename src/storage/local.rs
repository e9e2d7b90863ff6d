use std::path::{Path, PathBuf};
use anyhow::Context;
use tokio::fs;
use tracing::debug;

use crate::storage::StorageEngine;

/// Plain files, resolved against `root`. Absolute paths ignore the root.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

#[async_trait::async_trait]
impl StorageEngine for LocalStorage {
    async fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
        let full = self.resolve(path);
        let data = fs::read(&full)
            .await
            .with_context(|| format!("failed to read {}", full.display()))?;
        debug!("Read {} bytes from {}", data.len(), full.display());
        Ok(data)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&full, data)
            .await
            .with_context(|| format!("failed to write {}", full.display()))?;
        debug!("Wrote {} bytes to {}", data.len(), full.display());
        Ok(())
    }

    async fn size(&self, path: &Path) -> anyhow::Result<u64> {
        let full = self.resolve(path);
        let meta = fs::metadata(&full)
            .await
            .with_context(|| format!("failed to stat {}", full.display()))?;
        Ok(meta.len())
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(self.resolve(path)).await.is_ok()
    }
}
