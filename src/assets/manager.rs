use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Fetches and decodes one asset. Implementations run on the tokio runtime
/// and must not touch scene state; results are applied by the frame thread.
#[async_trait]
pub trait AssetLoader<A>: Send + Sync {
    async fn load(&self, path: &Path) -> Result<A>;
}
