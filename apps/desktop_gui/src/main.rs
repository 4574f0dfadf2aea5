mod backend_bridge;
mod controller;
mod media;
mod ui;

use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiEvent, ui::StoryWriterApp};

fn main() -> eframe::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = load_settings();
    tracing::info!(api_base_url = %settings.api_base_url, layout = %settings.layout, "starting story writer");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Story Writer")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([760.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Story Writer",
        options,
        Box::new(move |_cc| Ok(Box::new(StoryWriterApp::new(cmd_tx, ui_rx, &settings)))),
    )
}
