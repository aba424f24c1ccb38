use super::bundle::{AssetBundle, BundleDescription};
use super::manager::AssetLoader;
use super::texture::Texture;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Reads bundles exported as JSON scene descriptions (node tree, materials,
/// morph target names and keyframed clips). Texture maps are resolved
/// relative to the bundle file.
#[derive(Debug, Default, Clone)]
pub struct JsonBundleLoader;

impl JsonBundleLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AssetLoader<AssetBundle> for JsonBundleLoader {
    async fn load(&self, path: &Path) -> Result<AssetBundle> {
        info!("Loading bundle: {:?}", path);

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let description: BundleDescription = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to decode {}", path.display()))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut textures = Vec::new();
        for map in description.texture_paths(base_dir) {
            let texture = match map {
                Some(map) => Some(
                    Texture::load(&map)
                        .await
                        .with_context(|| format!("failed to load texture {}", map.display()))?,
                ),
                None => None,
            };
            textures.push(texture);
        }

        description.into_bundle(textures)
    }
}
