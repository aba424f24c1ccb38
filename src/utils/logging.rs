use crate::config::{config_path, StageSettings};
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE: &str = "log.txt";

/// Console + session file logging, plus a panic hook that reports through tracing.
pub fn init_logging() -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let enable_backtrace = env::var("RUST_BACKTRACE").unwrap_or_else(|_| "0".to_string()) == "1";

    // Remove existing log file if it exists
    if let Err(e) = fs::remove_file(LOG_FILE) {
        if e.kind() != io::ErrorKind::NotFound {
            eprintln!("Warning: Failed to remove existing {}: {}", LOG_FILE, e);
        }
    }
    let log_file =
        fs::File::create(LOG_FILE).with_context(|| format!("failed to create {}", LOG_FILE))?;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(&log_level)
            .add_directive("fbx_stage=debug".parse()?)
            .add_directive("eframe=warn".parse()?)
            .add_directive("egui_glow=warn".parse()?),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_names(true)
            .with_ansi(true)
        )
        .with(fmt::layer()
            .with_writer(log_file)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false) // No ANSI codes in file
        )
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!("Panic occurred: {}", panic_info);

        if let Some(location) = panic_info.location() {
            tracing::error!(
                "Panic location: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }

        if enable_backtrace {
            tracing::error!("Backtrace:\n{:?}", std::backtrace::Backtrace::capture());
        }
    }));

    tracing::info!("Logging initialized with level: {}", log_level);
    tracing::info!("File logging enabled: {} (session-based, cleaned on startup)", LOG_FILE);
    Ok(())
}

/// Startup banner: platform plus the settings that decide what gets loaded.
pub fn log_stage_info(settings: &StageSettings) {
    tracing::info!(
        "=== fbx-stage {} ({}/{}) ===",
        env!("CARGO_PKG_VERSION"),
        env::consts::OS,
        env::consts::ARCH
    );
    tracing::info!("Asset root: {:?} (*.{})", settings.assets.root, settings.assets.extension);
    tracing::info!("Initial asset: {}", settings.assets.initial);
    tracing::info!(
        "Obstacles: {} cones within ±{}",
        settings.scene.obstacle_count,
        settings.scene.scatter_half_extent
    );
    match config_path() {
        Some(path) => tracing::info!("Settings file: {:?}", path),
        None => tracing::info!("Settings file: none (no home directory)"),
    }
    if let Some(seed) = settings.seed {
        tracing::info!("RNG seed: {}", seed);
    }
}
