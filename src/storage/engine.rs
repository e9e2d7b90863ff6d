use std::path::Path;
use async_trait::async_trait;

#[async_trait]
pub trait StorageEngine: Send + Sync {
    async fn read(
        &self,
        path: &Path,
    ) -> anyhow::Result<Vec<u8>>;

    async fn write(
        &self,
        path: &Path,
        data: &[u8],
    ) -> anyhow::Result<()>;

    /// Size on disk in bytes.
    async fn size(
        &self,
        path: &Path,
    ) -> anyhow::Result<u64>;

    async fn exists(
        &self,
        path: &Path,
    ) -> bool;
}
