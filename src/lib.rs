// fbx-stage: an interactive character viewer with hot-swappable assets

pub mod app;
pub mod assets;
pub mod config;
pub mod rendering;
pub mod ui;
pub mod utils;
pub mod world;

// Re-export commonly used types for convenience
pub use assets::{AssetId, AssetPaths};
pub use config::StageSettings;
pub use world::Simulation;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
