use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// MonthCalendar – ordered month-number → label mapping
// ---------------------------------------------------------------------------

/// The reporting window: an ordered list of (month number, display label)
/// pairs. Chart axes and grouped aggregates follow the list order, never
/// lexicographic label order. Months outside the window have no label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    entries: Vec<(u32, String)>,
}

impl Default for MonthCalendar {
    fn default() -> Self {
        MonthCalendar::new(vec![
            (8, "August".to_string()),
            (9, "September".to_string()),
            (10, "October".to_string()),
        ])
    }
}

impl MonthCalendar {
    pub fn new(entries: Vec<(u32, String)>) -> Self {
        Self { entries }
    }

    /// Display label for a calendar month number (1–12), if in the window.
    pub fn label_for(&self, month_number: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == month_number)
            .map(|(_, label)| label.as_str())
    }

    /// Position of a label in the window (the sort key for monthly series).
    pub fn ordinal(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|(_, l)| l == label)
    }

    /// All labels in window order.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(_, l)| l.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// UnitSnapshot – one row of the "Large Numbers" sheet
// ---------------------------------------------------------------------------

/// Aggregate membership counts for one business unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSnapshot {
    pub unit: String,
    pub active: u64,
    pub current_on_payments: u64,
    pub delinquent: u64,
    pub personal_training: u64,
    pub vip: u64,
    pub suspended: u64,
    /// Fraction in [0, 1]; `None` when the workbook has no churn column.
    pub churn_rate: Option<f64>,
}

// ---------------------------------------------------------------------------
// FinancialRecord – one row of the "Financial" sheet
// ---------------------------------------------------------------------------

/// Monthly financial figures for one (unit, month) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialRecord {
    pub unit: String,
    /// First day of the record's month.
    pub month: NaiveDate,
    pub revenue: f64,
    pub operating_profit: f64,
    pub reinvestment: f64,
    pub partner_withdrawal: f64,
    /// Label from the month calendar; `None` outside the reporting window.
    pub month_label: Option<String>,
}

impl FinancialRecord {
    /// Derive the display label for this record's month.
    pub fn derive_label(&mut self, calendar: &MonthCalendar) {
        self.month_label = calendar.label_for(self.month.month()).map(str::to_string);
    }
}

// ---------------------------------------------------------------------------
// ReportDataset – both loaded tables plus filter domains
// ---------------------------------------------------------------------------

/// The complete loaded workbook: both tables, immutable after load, plus the
/// value domains the filter widgets are built from.
#[derive(Debug, Clone)]
pub struct ReportDataset {
    pub snapshots: Vec<UnitSnapshot>,
    pub financials: Vec<FinancialRecord>,
    /// Sorted distinct units across both tables.
    pub units: Vec<String>,
    /// Month labels in calendar order (the month filter domain).
    pub month_labels: Vec<String>,
}

impl ReportDataset {
    pub fn new(
        snapshots: Vec<UnitSnapshot>,
        mut financials: Vec<FinancialRecord>,
        calendar: &MonthCalendar,
    ) -> Self {
        for rec in &mut financials {
            rec.derive_label(calendar);
        }

        let mut unit_set: BTreeSet<String> = BTreeSet::new();
        for s in &snapshots {
            unit_set.insert(s.unit.clone());
        }
        for f in &financials {
            unit_set.insert(f.unit.clone());
        }

        ReportDataset {
            snapshots,
            financials,
            units: unit_set.into_iter().collect(),
            month_labels: calendar.labels(),
        }
    }

    /// Whether any snapshot row carries a churn value.
    pub fn has_churn_data(&self) -> bool {
        self.snapshots.iter().any(|s| s.churn_rate.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty() && self.financials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(unit: &str, year: i32, month: u32) -> FinancialRecord {
        FinancialRecord {
            unit: unit.to_string(),
            month: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            revenue: 0.0,
            operating_profit: 0.0,
            reinvestment: 0.0,
            partner_withdrawal: 0.0,
            month_label: None,
        }
    }

    #[test]
    fn calendar_maps_window_months_only() {
        let cal = MonthCalendar::default();
        assert_eq!(cal.label_for(8), Some("August"));
        assert_eq!(cal.label_for(10), Some("October"));
        assert_eq!(cal.label_for(11), None);
        assert_eq!(cal.ordinal("September"), Some(1));
        assert_eq!(cal.ordinal("January"), None);
    }

    #[test]
    fn dataset_derives_labels_and_unit_domain() {
        let cal = MonthCalendar::default();
        let snapshots = vec![UnitSnapshot {
            unit: "Downtown".to_string(),
            active: 100,
            current_on_payments: 90,
            delinquent: 10,
            personal_training: 5,
            vip: 2,
            suspended: 1,
            churn_rate: None,
        }];
        let financials = vec![record("Harbor", 2025, 9), record("Downtown", 2025, 11)];
        let ds = ReportDataset::new(snapshots, financials, &cal);

        assert_eq!(ds.units, vec!["Downtown", "Harbor"]);
        assert_eq!(ds.financials[0].month_label.as_deref(), Some("September"));
        // November is outside the reporting window.
        assert_eq!(ds.financials[1].month_label, None);
        assert!(!ds.has_churn_data());
    }
}
