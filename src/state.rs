use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::color::UnitColors;
use crate::config::DashboardConfig;
use crate::data::filter::{filter_financials, filter_snapshots, init_filter_state, FilterState};
use crate::data::loader::CachedLoader;
use crate::data::model::{FinancialRecord, MonthCalendar, ReportDataset, UnitSnapshot};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The three display tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Financial,
    Customers,
}

/// Registered image URIs for the optional static assets. `None` means the
/// file was absent at startup and the view degrades silently.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    pub background: Option<String>,
    pub logo: Option<String>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    pub calendar: MonthCalendar,
    pub loader: CachedLoader,

    /// Loaded workbook (None until a load succeeds).
    pub dataset: Option<ReportDataset>,

    /// Current filter selections.
    pub filters: FilterState,

    /// Filtered views, recomputed on every filter change (cached between).
    pub snapshot_view: Vec<UnitSnapshot>,
    pub financial_view: Vec<FinancialRecord>,

    /// Stable unit → colour assignment for the charts.
    pub unit_colors: UnitColors,

    pub active_tab: Tab,

    /// Warning banner text shown in the top bar.
    pub status_message: Option<String>,

    pub assets: Assets,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let calendar = config.calendar();
        let loader = CachedLoader::new(
            config.workbook_path.clone(),
            config.snapshot_sheet.clone(),
            config.financial_sheet.clone(),
            calendar.clone(),
        );
        Self {
            config,
            calendar,
            loader,
            dataset: None,
            filters: FilterState::default(),
            snapshot_view: Vec::new(),
            financial_view: Vec::new(),
            unit_colors: UnitColors::default(),
            active_tab: Tab::default(),
            status_message: None,
            assets: Assets::default(),
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: ReportDataset) {
        self.filters = init_filter_state(&dataset);
        self.unit_colors = UnitColors::new(&dataset.units);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered views after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.snapshot_view = filter_snapshots(&ds.snapshots, &self.filters.units);
            self.financial_view =
                filter_financials(&ds.financials, &self.filters.units, &self.filters.months);
        } else {
            self.snapshot_view.clear();
            self.financial_view.clear();
        }
    }

    /// Load (or reuse) the workbook through the memoized loader.
    pub fn load_dataset(&mut self) {
        match self.loader.load() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Workbook load failed: {e}");
                self.dataset = None;
                self.status_message = Some(format!("No data: {e}"));
                self.refilter();
            }
        }
    }

    /// Drop the cached workbook and parse it again.
    pub fn reload(&mut self) {
        self.loader.invalidate();
        self.load_dataset();
    }

    /// Point the app at another workbook file.
    pub fn open_workbook(&mut self, path: PathBuf) {
        self.loader.set_path(path);
        self.load_dataset();
    }

    // -- Filter widget callbacks (toggle / all / none) --

    pub fn toggle_unit(&mut self, unit: &str) {
        toggle(&mut self.filters.units, unit);
        self.refilter();
    }

    pub fn toggle_month(&mut self, label: &str) {
        toggle(&mut self.filters.months, label);
        self.refilter();
    }

    pub fn select_all_units(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.units = ds.units.iter().cloned().collect();
            self.refilter();
        }
    }

    pub fn select_no_units(&mut self) {
        self.filters.units.clear();
        self.refilter();
    }

    pub fn select_all_months(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.months = ds.month_labels.iter().cloned().collect();
            self.refilter();
        }
    }

    pub fn select_no_months(&mut self) {
        self.filters.months.clear();
        self.refilter();
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::UnitSnapshot;
    use chrono::NaiveDate;

    fn state_with_dataset() -> AppState {
        let snapshots = vec![
            UnitSnapshot {
                unit: "A".to_string(),
                active: 100,
                current_on_payments: 90,
                delinquent: 10,
                personal_training: 0,
                vip: 0,
                suspended: 0,
                churn_rate: None,
            },
            UnitSnapshot {
                unit: "B".to_string(),
                active: 50,
                current_on_payments: 40,
                delinquent: 10,
                personal_training: 0,
                vip: 0,
                suspended: 0,
                churn_rate: None,
            },
        ];
        let financials = vec![FinancialRecord {
            unit: "A".to_string(),
            month: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            revenue: 1000.0,
            operating_profit: 400.0,
            reinvestment: 100.0,
            partner_withdrawal: 50.0,
            month_label: None,
        }];
        let calendar = MonthCalendar::default();
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(ReportDataset::new(snapshots, financials, &calendar));
        state
    }

    #[test]
    fn new_dataset_selects_everything() {
        let state = state_with_dataset();
        assert_eq!(state.filters.units.len(), 2);
        assert_eq!(state.filters.months.len(), 3);
        assert_eq!(state.snapshot_view.len(), 2);
        assert_eq!(state.financial_view.len(), 1);
    }

    #[test]
    fn toggling_a_unit_refilters_both_views() {
        let mut state = state_with_dataset();
        state.toggle_unit("A");
        assert_eq!(state.snapshot_view.len(), 1);
        assert_eq!(state.snapshot_view[0].unit, "B");
        assert!(state.financial_view.is_empty());

        state.toggle_unit("A");
        assert_eq!(state.snapshot_view.len(), 2);
        assert_eq!(state.financial_view.len(), 1);
    }

    #[test]
    fn select_none_empties_the_views() {
        let mut state = state_with_dataset();
        state.select_no_units();
        assert!(state.snapshot_view.is_empty());
        assert!(state.financial_view.is_empty());

        state.select_all_units();
        assert_eq!(state.snapshot_view.len(), 2);
    }

    #[test]
    fn load_failure_becomes_a_status_message() {
        let mut config = DashboardConfig::default();
        config.workbook_path = PathBuf::from("definitely-missing.xlsx");
        let mut state = AppState::new(config);
        state.load_dataset();
        assert!(state.dataset.is_none());
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("No data"));
        assert!(state.snapshot_view.is_empty());
    }
}
