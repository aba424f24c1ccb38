pub mod settings;

// Re-export commonly used types
pub use settings::{
    AssetSettings, CameraSettings, ControlSettings, SceneSettings, SettingsError, StageSettings,
    config_path, save_settings,
};
