use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered), or a text placeholder when the file is absent ----
    ui.vertical_centered(|ui: &mut Ui| {
        match &state.assets.logo {
            Some(uri) => {
                ui.add(
                    egui::Image::new(uri.as_str())
                        .max_width(ui.available_width() * 0.8)
                        .max_height(120.0),
                );
            }
            None => {
                ui.label(RichText::new("SIX").color(color::PRIMARY).size(32.0).strong());
            }
        }
    });
    ui.add_space(4.0);

    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone the filter domains so we can mutate state inside the loops.
    let units = dataset.units.clone();
    let months = dataset.month_labels.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            filter_group(ui, state, "Units", &units, FilterKind::Unit);
            filter_group(ui, state, "Months", &months, FilterKind::Month);
        });
}

#[derive(Clone, Copy)]
enum FilterKind {
    Unit,
    Month,
}

/// One collapsible multi-select group with All/None shortcuts.
fn filter_group(
    ui: &mut Ui,
    state: &mut AppState,
    title: &str,
    values: &[String],
    kind: FilterKind,
) {
    let selected_count = match kind {
        FilterKind::Unit => state.filters.units.len(),
        FilterKind::Month => state.filters.months.len(),
    };
    let header_text = format!("{title}  ({selected_count}/{})", values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    match kind {
                        FilterKind::Unit => state.select_all_units(),
                        FilterKind::Month => state.select_all_months(),
                    }
                }
                if ui.small_button("None").clicked() {
                    match kind {
                        FilterKind::Unit => state.select_no_units(),
                        FilterKind::Month => state.select_no_months(),
                    }
                }
            });

            for value in values {
                let is_selected = match kind {
                    FilterKind::Unit => state.filters.units.contains(value),
                    FilterKind::Month => state.filters.months.contains(value),
                };

                // Units get their chart colour as a visual cue.
                let mut text = RichText::new(value);
                if matches!(kind, FilterKind::Unit) {
                    text = text.color(state.unit_colors.color_for(value));
                }

                let mut checked = is_selected;
                if ui.checkbox(&mut checked, text).changed() {
                    match kind {
                        FilterKind::Unit => state.toggle_unit(value),
                        FilterKind::Month => state.toggle_month(value),
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar, including the warning banner.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_workbook_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} units, {} financial rows ({} / {} in view)",
                ds.units.len(),
                ds.financials.len(),
                state.snapshot_view.len(),
                state.financial_view.len(),
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::from_rgb(0xF7, 0x8A, 0x0E)));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_workbook_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open report workbook")
        .add_filter("Excel workbook", &["xlsx"])
        .pick_file();

    if let Some(path) = file {
        state.open_workbook(path);
    }
}
