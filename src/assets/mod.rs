pub mod bundle;
pub mod loader;
pub mod manager;
pub mod material;
pub mod mesh;
pub mod queue;
pub mod texture;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub use bundle::AssetBundle;
pub use loader::JsonBundleLoader;
pub use manager::AssetLoader;
pub use queue::{LoadCompletion, LoadError, LoadQueue, RequestToken};

/// The character clips offered in the asset picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    Idle,
    Walking,
    WalkInCircle,
    Running,
    Shuffling,
    KickSoccerball,
}

impl AssetId {
    pub const ALL: [AssetId; 6] = [
        AssetId::Idle,
        AssetId::Walking,
        AssetId::WalkInCircle,
        AssetId::Running,
        AssetId::Shuffling,
        AssetId::KickSoccerball,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            AssetId::Idle => "Idle",
            AssetId::Walking => "Walking",
            AssetId::WalkInCircle => "Walk In Circle",
            AssetId::Running => "Running",
            AssetId::Shuffling => "Shuffling",
            AssetId::KickSoccerball => "Kick Soccerball",
        }
    }

    pub fn from_display_name(name: &str) -> Option<AssetId> {
        Self::ALL.into_iter().find(|asset| asset.display_name() == name)
    }
}

impl Default for AssetId {
    fn default() -> Self {
        AssetId::Idle
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Where bundles live on disk: `<root>/<display name>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub extension: String,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn resolve(&self, asset: AssetId) -> PathBuf {
        self.root
            .join(format!("{}.{}", asset.display_name(), self.extension))
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::new("models/fbx", "fbx")
    }
}
