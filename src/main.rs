use std::path::Path;

use eframe::egui;
use six_dashboard::app::DashboardApp;
use six_dashboard::{color, config};

fn main() -> eframe::Result {
    env_logger::init();

    let config = config::load_or_default(Path::new("dashboard.json"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([800.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SIX Dashboard",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the jpg/png assets.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            color::apply_theme(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(&cc.egui_ctx, config)))
        }),
    )
}
