use image::GenericImageView;
use std::path::Path;
use tracing::{debug, error};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("Failed to decode image: {0}")]
    DecodeFailed(#[from] image::ImageError),
    #[error("Failed to read texture {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A decoded texture map. Only the metadata needed for bookkeeping is kept
/// on the CPU side; the pixels are handed to the renderer on upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub id: Uuid,
    pub label: String,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            width,
            height,
        }
    }

    pub fn from_bytes(bytes: &[u8], label: &str) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?;
        let (width, height) = img.dimensions();
        debug!("Decoded texture {} ({}x{})", label, width, height);
        Ok(Self::new(label, width, height))
    }

    pub async fn load(path: &Path) -> Result<Self, TextureError> {
        let label = path.to_str().unwrap_or("unnamed_texture").to_string();
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            error!("Failed to read texture: {:?}, error: {}", path, source);
            TextureError::ReadFailed { path: label.clone(), source }
        })?;
        Self::from_bytes(&bytes, &label)
    }
}
