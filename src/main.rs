use anyhow::{anyhow, Context};
use fbx_stage::app::StageApp;
use fbx_stage::assets::{JsonBundleLoader, LoadQueue};
use fbx_stage::config::{config_path, save_settings, StageSettings};
use fbx_stage::utils::logging::{init_logging, log_stage_info};
use fbx_stage::VERSION;
use std::sync::Arc;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let settings = StageSettings::load().context("failed to load settings")?;
    log_stage_info(&settings);
    if let Some(path) = config_path().filter(|path| !path.exists()) {
        match save_settings(&settings) {
            Ok(()) => info!("Wrote default settings to {:?}", path),
            Err(e) => warn!("Could not write default settings: {}", e),
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("asset-loader")
        .enable_all()
        .build()
        .context("failed to start the asset runtime")?;
    let loads = LoadQueue::new(
        Arc::new(JsonBundleLoader::new()),
        runtime.handle().clone(),
        settings.assets.paths(),
    );
    let app = StageApp::new(&settings, runtime, loads)?;

    eframe::run_native(
        &format!("fbx-stage {}", VERSION),
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("window closed with an error: {}", e))
}
