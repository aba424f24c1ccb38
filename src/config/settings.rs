use crate::assets::{AssetId, AssetPaths};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILE: &str = "stage.toml";
const ENV_PREFIX: &str = "FBX_STAGE";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("Unknown initial asset '{0}'")]
    UnknownAsset(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSettings {
    pub root: PathBuf,
    pub extension: String,
    pub initial: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        let paths = AssetPaths::default();
        Self {
            root: paths.root,
            extension: paths.extension,
            initial: AssetId::Idle.display_name().to_string(),
        }
    }
}

impl AssetSettings {
    pub fn paths(&self) -> AssetPaths {
        AssetPaths::new(self.root.clone(), self.extension.clone())
    }

    pub fn initial_asset(&self) -> Result<AssetId, SettingsError> {
        AssetId::from_display_name(&self.initial)
            .ok_or_else(|| SettingsError::UnknownAsset(self.initial.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    pub obstacle_count: usize,
    pub scatter_half_extent: f32,
    pub cone_radius: f32,
    pub cone_height: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            obstacle_count: 1000,
            scatter_half_extent: 800.0,
            cone_radius: 20.0,
            cone_height: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSettings {
    pub move_distance: f32,
    pub collision_displacement: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            move_distance: 10.0,
            collision_displacement: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            position: [100.0, 200.0, 300.0],
            target: [0.0, 100.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StageSettings {
    pub assets: AssetSettings,
    pub scene: SceneSettings,
    pub controls: ControlSettings,
    pub camera: CameraSettings,
    /// Fixed RNG seed for obstacle placement and collision nudges.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl StageSettings {
    /// Defaults, then `path` if it exists, then `FBX_STAGE__<SECTION>__<KEY>` variables.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&StageSettings::default())?);
        if let Some(path) = path {
            debug!("Reading settings from {:?}", path);
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }
        let settings: StageSettings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.assets.initial_asset()?;
        Ok(settings)
    }

    pub fn load() -> Result<Self, SettingsError> {
        let path = config_path();
        let settings = Self::load_from(path.as_deref())?;
        info!("Settings loaded (initial asset: {})", settings.assets.initial);
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml)?;
        Ok(())
    }
}

pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "fbx-stage", "fbx-stage")
        .map(|proj| proj.config_dir().join(CONFIG_FILE))
}

pub fn save_settings(settings: &StageSettings) -> Result<(), SettingsError> {
    if let Some(path) = config_path() {
        settings.save_to(&path)?;
    }
    Ok(())
}
