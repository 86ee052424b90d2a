use eframe::egui::{self, CornerRadius, Margin, RichText, Stroke, Ui};

use crate::color;
use crate::data::aggregate::{mean_churn, monthly_series, monthly_unit_series, SnapshotTotals};
use crate::state::{AppState, Tab};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Tab bar + dispatch
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.active_tab, Tab::Overview, "📊 Overview");
        ui.selectable_value(&mut state.active_tab, Tab::Financial, "💰 Financial");
        ui.selectable_value(&mut state.active_tab, Tab::Customers, "👥 Customers");
    });
}

pub fn tab_body(ui: &mut Ui, state: &mut AppState) {
    match state.active_tab {
        Tab::Overview => overview_tab(ui, state),
        Tab::Financial => financial_tab(ui, state),
        Tab::Customers => customers_tab(ui, state),
    }
}

// ---------------------------------------------------------------------------
// Overview tab – membership metric cards
// ---------------------------------------------------------------------------

fn overview_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("Unit Overview");
    ui.add_space(6.0);

    if state.snapshot_view.is_empty() {
        no_data_notice(ui);
        return;
    }

    let totals = SnapshotTotals::compute(&state.snapshot_view);

    ui.horizontal_wrapped(|ui: &mut Ui| {
        metric_card(ui, "Active", fmt_count(totals.active));
        metric_card(ui, "Current on Payments", fmt_count(totals.current_on_payments));
        metric_card(ui, "Delinquent", fmt_count(totals.delinquent));
        metric_card(ui, "Personal Training", fmt_count(totals.personal_training));
        metric_card(ui, "VIP", fmt_count(totals.vip));
        metric_card(ui, "Suspended", fmt_count(totals.suspended));
    });

    ui.add_space(8.0);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        metric_card(ui, "Delinquency Rate", fmt_rate(totals.delinquency_rate()));
        // Only one workbook variant ships churn figures; the card shows a
        // placeholder otherwise.
        let churn = mean_churn(&state.snapshot_view)
            .map(|c| fmt_rate(c * 100.0))
            .unwrap_or_else(placeholder);
        metric_card(ui, "Avg. Churn", churn);
    });
}

// ---------------------------------------------------------------------------
// Financial tab – currency cards and monthly charts
// ---------------------------------------------------------------------------

fn financial_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("Financial Indicators");
    ui.add_space(6.0);

    if state.financial_view.is_empty() {
        no_data_notice(ui);
        return;
    }

    let view = &state.financial_view;
    let revenue: f64 = view.iter().map(|r| r.revenue).sum();
    let profit: f64 = view.iter().map(|r| r.operating_profit).sum();
    let reinvestment: f64 = view.iter().map(|r| r.reinvestment).sum();
    let withdrawal: f64 = view.iter().map(|r| r.partner_withdrawal).sum();

    ui.horizontal_wrapped(|ui: &mut Ui| {
        metric_card(ui, "Total Revenue", fmt_currency(revenue));
        metric_card(ui, "Operating Profit", fmt_currency(profit));
        metric_card(ui, "Reinvestment", fmt_currency(reinvestment));
        metric_card(ui, "Partner Withdrawals", fmt_currency(withdrawal));
    });

    ui.add_space(10.0);
    ui.strong("Monthly Profit");
    let profit_series = monthly_series(view, &state.calendar, |r| r.operating_profit);
    plot::monthly_bar_chart(ui, "monthly_profit", &profit_series);

    ui.add_space(10.0);
    ui.strong("Revenue by Unit");
    let revenue_series = monthly_unit_series(view, &state.calendar, |r| r.revenue);
    plot::grouped_unit_chart(ui, "revenue_by_unit", &revenue_series, &state.unit_colors);
}

// ---------------------------------------------------------------------------
// Customers tab – category comparison and plan split
// ---------------------------------------------------------------------------

fn customers_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("Plan Comparison");
    ui.add_space(6.0);

    if state.snapshot_view.is_empty() {
        no_data_notice(ui);
        return;
    }

    let totals = SnapshotTotals::compute(&state.snapshot_view);

    ui.strong("Members per Category");
    plot::category_chart(ui, "plan_comparison", &totals.categories());

    ui.add_space(10.0);
    ui.strong("Active Plans");
    let (current, delinquent) = totals.plan_split();
    plot::plan_split_pie(ui, current, delinquent);
}

// ---------------------------------------------------------------------------
// Widgets & formatting
// ---------------------------------------------------------------------------

fn no_data_notice(ui: &mut Ui) {
    ui.label(
        RichText::new("No data for the current selection.")
            .color(color::ACCENT)
            .italics(),
    );
}

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::new()
        .fill(egui::Color32::from_black_alpha(140))
        .stroke(Stroke::new(2.0, color::PRIMARY))
        .corner_radius(CornerRadius::same(12))
        .inner_margin(Margin::same(14))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(130.0);
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(label).color(color::ACCENT).size(12.0));
                ui.label(
                    RichText::new(value)
                        .color(color::PRIMARY)
                        .size(24.0)
                        .strong(),
                );
            });
        });
}

fn placeholder() -> String {
    "–".to_string()
}

/// Thousands-separated integer, e.g. 12345 → "12,345".
pub fn fmt_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Currency amount rounded to whole units, e.g. "R$ 3,700".
pub fn fmt_currency(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = value.abs().round() as u64;
    if negative {
        format!("R$ -{}", fmt_count(rounded))
    } else {
        format!("R$ {}", fmt_count(rounded))
    }
}

/// Percentage with one decimal; NaN (the zero-active sentinel) renders as a
/// placeholder instead of "NaN".
pub fn fmt_rate(value: f64) -> String {
    if value.is_nan() {
        return placeholder();
    }
    format!("{value:.1}%")
}
