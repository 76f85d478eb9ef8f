mod app;
mod config;
mod editor;
mod error;
mod image;
mod mixer;
mod pixel;

use app::TofuApp;
use config::AppConfig;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use std::path::PathBuf;

fn log_dir() -> Option<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("dev", "TofuCat", "TofuCat")?;
    let dir = proj_dirs.config_dir().to_path_buf();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok()?;
    }
    Some(dir)
}

fn init_logging() -> Option<LoggerHandle> {
    let logger = match Logger::try_with_env_or_str("info, eframe=warn, egui_glow=warn") {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Invalid log specification: {err}");
            return None;
        }
    };
    let logger = if let Some(dir) = log_dir() {
        logger
            .log_to_file(
                FileSpec::default()
                    .directory(&dir)
                    .basename("tofucat")
                    .suffix("log")
                    .suppress_timestamp(),
            )
            .rotate(
                Criterion::Size(64 * 1024),
                Naming::Numbers,
                Cleanup::KeepLogFiles(3),
            )
            .duplicate_to_stderr(Duplicate::Warn)
    } else {
        eprintln!("No log directory available, logging to stderr");
        logger.log_to_stderr()
    };
    match logger.start() {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    }
}

fn main() -> eframe::Result<()> {
    let _logger = init_logging();
    log::info!("Starting TofuCat {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    let initial_image_path: Option<PathBuf> = std::env::args_os().nth(1).map(PathBuf::from);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "TofuCat",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(TofuApp::new(
                &cc.egui_ctx,
                config,
                initial_image_path.as_deref(),
            )))
        }),
    )
}
