mod app;
mod config;
mod crop;
mod editor;
mod error;
mod geometry;
mod loader;
mod overlay;
mod scaler;
mod store;
mod viewer;

use std::path::PathBuf;

use app::{FloorplanApp, OpenSource};
use config::AppConfig;

/// Path opened in place of the file dialog, for unattended runs.
const TEST_IMAGE_ENV: &str = "FLOORPLAN_TEST_IMAGE";
const PREVIEW_MAX_EDGE_ENV: &str = "FLOORPLAN_PREVIEW_MAX_EDGE";

fn parse_test_image(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

fn parse_preview_max_edge(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|&v| v > 0)
}

fn resolve_open_source(config: &AppConfig) -> OpenSource {
    if let Some(path) = std::env::var(TEST_IMAGE_ENV)
        .ok()
        .as_deref()
        .and_then(parse_test_image)
    {
        return OpenSource::Fixed(path);
    }
    match &config.test_image {
        Some(path) => OpenSource::Fixed(path.clone()),
        None => OpenSource::Dialog,
    }
}

fn resolve_preview_max_edge(config: &AppConfig) -> u32 {
    if let Ok(raw) = std::env::var(PREVIEW_MAX_EDGE_ENV) {
        match parse_preview_max_edge(&raw) {
            Some(edge) => return edge,
            None => tracing::warn!("ignoring {PREVIEW_MAX_EDGE_ENV}={raw:?}"),
        }
    }
    config
        .preview_max_edge
        .filter(|&v| v > 0)
        .unwrap_or(viewer::DEFAULT_PREVIEW_MAX)
}

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load();
    let open_source = resolve_open_source(&config);
    if let OpenSource::Fixed(path) = &open_source {
        tracing::info!(path = %path.display(), "open dialog replaced by fixed test image");
    }
    let preview_max = resolve_preview_max_edge(&config);

    let width = config.window_width.unwrap_or(1200.0);
    let height = config.window_height.unwrap_or(800.0);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Floorplan Design Application")
            .with_app_id("floorplan")
            .with_inner_size([width, height])
            .with_min_inner_size([800.0, 600.0])
            .with_maximized(true),
        ..Default::default()
    };

    eframe::run_native(
        "floorplan",
        native_options,
        Box::new(|cc| {
            Ok(Box::new(FloorplanApp::new(
                cc,
                config,
                open_source,
                preview_max,
            )))
        }),
    )
}
