use std::path::Path;

use eframe::egui::{self, Color32, RichText};

use crate::color;
use crate::config::DashboardConfig;
use crate::state::{AppState, Assets};
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(ctx: &egui::Context, config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.assets = load_assets(ctx, &state.config);
        state.load_dataset();
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and warning banner ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: header, tabs, active view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            paint_background(ui, &self.state);

            ui.vertical_centered(|ui: &mut egui::Ui| {
                ui.label(
                    RichText::new("SIX DASHBOARD")
                        .color(color::PRIMARY)
                        .size(28.0)
                        .strong(),
                );
                ui.label(RichText::new("Integrated Data Overview").weak());
            });
            ui.add_space(6.0);

            tabs::tab_bar(ui, &mut self.state);
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut egui::Ui| {
                    tabs::tab_body(ui, &mut self.state);
                });
        });
    }
}

/// Paint the branded background behind the central panel, with a dark
/// overlay so the content stays readable. Skipped when the image is absent.
fn paint_background(ui: &egui::Ui, state: &AppState) {
    let Some(uri) = &state.assets.background else {
        return;
    };
    let rect = ui.max_rect();
    egui::Image::new(uri.as_str()).paint_at(ui, rect);
    ui.painter()
        .rect_filled(rect, egui::CornerRadius::ZERO, Color32::from_black_alpha(166));
}

// ---------------------------------------------------------------------------
// Static assets
// ---------------------------------------------------------------------------

fn load_assets(ctx: &egui::Context, config: &DashboardConfig) -> Assets {
    Assets {
        background: register_image(ctx, &config.background_path, "bytes://six-background.jpg"),
        logo: register_image(ctx, &config.logo_path, "bytes://six-logo.png"),
    }
}

/// Read an image file and register it with egui's loader. A missing file is
/// only logged; the caller degrades to no background / a text placeholder.
fn register_image(ctx: &egui::Context, path: &Path, uri: &str) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => {
            ctx.include_bytes(uri.to_string(), bytes);
            Some(uri.to_string())
        }
        Err(e) => {
            log::warn!("Asset {} unavailable: {e}", path.display());
            None
        }
    }
}
