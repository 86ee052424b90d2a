use std::collections::BTreeSet;
use std::f32::consts::TAU;

use eframe::egui::{Color32, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::{self, UnitColors};

// ---------------------------------------------------------------------------
// Monthly profit (horizontal bars, one per month)
// ---------------------------------------------------------------------------

/// Horizontal bar chart of one value per month, in calendar order.
pub fn monthly_bar_chart(ui: &mut Ui, id: &str, series: &[(String, f64)]) {
    let palette = color::chart_palette(series.len());
    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value)
                .name(label)
                .width(0.6)
                .fill(palette[i])
        })
        .collect();

    let labels: Vec<String> = series.iter().map(|(l, _)| l.clone()).collect();

    Plot::new(id.to_string())
        .height(220.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .y_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Revenue by unit (grouped vertical bars, months on the x axis)
// ---------------------------------------------------------------------------

/// Grouped bar chart: one bar group per month, one coloured bar per unit.
pub fn grouped_unit_chart(
    ui: &mut Ui,
    id: &str,
    series: &[(String, Vec<(String, f64)>)],
    colors: &UnitColors,
) {
    let unit_names: Vec<String> = series
        .iter()
        .flat_map(|(_, units)| units.iter().map(|(u, _)| u.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let group_width = 0.8;
    let bar_width = group_width / unit_names.len().max(1) as f64;

    let mut charts = Vec::new();
    for (unit_idx, unit) in unit_names.iter().enumerate() {
        let mut bars = Vec::new();
        for (month_idx, (label, values)) in series.iter().enumerate() {
            let Some((_, value)) = values.iter().find(|(u, _)| u == unit) else {
                continue;
            };
            let x = month_idx as f64 - group_width / 2.0 + bar_width * (unit_idx as f64 + 0.5);
            bars.push(
                Bar::new(x, *value)
                    .name(format!("{unit} – {label}"))
                    .width(bar_width * 0.9)
                    .fill(colors.color_for(unit)),
            );
        }
        charts.push(BarChart::new(bars).name(unit));
    }

    let labels: Vec<String> = series.iter().map(|(l, _)| l.clone()).collect();

    Plot::new(id.to_string())
        .height(260.0)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Membership categories (vertical bars)
// ---------------------------------------------------------------------------

/// One bar per membership category, in fixed display order.
pub fn category_chart(ui: &mut Ui, id: &str, categories: &[(&'static str, u64)]) {
    let palette = color::chart_palette(categories.len());
    let bars: Vec<Bar> = categories
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::new(i as f64, *value as f64)
                .name(*label)
                .width(0.6)
                .fill(palette[i])
        })
        .collect();

    let labels: Vec<String> = categories.iter().map(|(l, _)| l.to_string()).collect();

    Plot::new(id.to_string())
        .height(260.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Show a category label only at whole-number grid marks.
fn axis_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Plan split pie (painted, egui has no built-in pie)
// ---------------------------------------------------------------------------

/// Two-slice pie of current vs delinquent members, with a small legend.
pub fn plan_split_pie(ui: &mut Ui, current: u64, delinquent: u64) {
    let total = current + delinquent;
    if total == 0 {
        ui.label("No plan data for the current selection.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(220.0), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;

        let current_angle = TAU * current as f32 / total as f32;
        draw_slice(&painter, center, radius, 0.0, current_angle, color::PIE_CURRENT);
        draw_slice(
            &painter,
            center,
            radius,
            current_angle,
            TAU,
            color::PIE_DELINQUENT,
        );

        ui.vertical(|ui: &mut Ui| {
            legend_entry(ui, color::PIE_CURRENT, "Current on Payments", current, total);
            legend_entry(ui, color::PIE_DELINQUENT, "Delinquent", delinquent, total);
        });
    });
}

fn legend_entry(ui: &mut Ui, color: Color32, label: &str, value: u64, total: u64) {
    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
        ui.painter()
            .rect_filled(rect, eframe::egui::CornerRadius::same(2), color);
        let pct = value as f64 / total as f64 * 100.0;
        ui.label(format!("{label}: {value} ({pct:.1}%)"));
    });
}

/// Fill a pie slice as a fan of thin triangles (slices can exceed 180°, so a
/// single convex polygon would not do).
fn draw_slice(
    painter: &eframe::egui::Painter,
    center: eframe::egui::Pos2,
    radius: f32,
    start: f32,
    end: f32,
    color: Color32,
) {
    if end <= start {
        return;
    }
    let steps = (((end - start) / 0.05).ceil() as usize).max(1);
    let step = (end - start) / steps as f32;
    for i in 0..steps {
        let a0 = start + step * i as f32;
        let a1 = a0 + step;
        let p0 = center + Vec2::angled(a0) * radius;
        let p1 = center + Vec2::angled(a1) * radius;
        painter.add(Shape::convex_polygon(
            vec![center, p0, p1],
            color,
            Stroke::NONE,
        ));
    }
}
