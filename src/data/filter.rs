use std::collections::BTreeSet;

use super::model::{FinancialRecord, ReportDataset, UnitSnapshot};

// ---------------------------------------------------------------------------
// Filter selections: which units and month labels are checked
// ---------------------------------------------------------------------------

/// The two multi-select filters driving every view. An empty set means
/// "nothing selected", which yields empty views rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub units: BTreeSet<String>,
    pub months: BTreeSet<String>,
}

/// Initialise a [`FilterState`] with every unit and month selected.
pub fn init_filter_state(dataset: &ReportDataset) -> FilterState {
    FilterState {
        units: dataset.units.iter().cloned().collect(),
        months: dataset.month_labels.iter().cloned().collect(),
    }
}

/// Snapshot rows whose unit is selected, in original row order.
pub fn filter_snapshots(rows: &[UnitSnapshot], units: &BTreeSet<String>) -> Vec<UnitSnapshot> {
    rows.iter()
        .filter(|r| units.contains(&r.unit))
        .cloned()
        .collect()
}

/// Financial rows whose unit is selected and whose derived month label is
/// selected, in original row order. Rows with no label (months outside the
/// reporting window) never pass.
pub fn filter_financials(
    rows: &[FinancialRecord],
    units: &BTreeSet<String>,
    months: &BTreeSet<String>,
) -> Vec<FinancialRecord> {
    rows.iter()
        .filter(|r| {
            units.contains(&r.unit)
                && r.month_label
                    .as_ref()
                    .is_some_and(|label| months.contains(label))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(unit: &str, active: u64) -> UnitSnapshot {
        UnitSnapshot {
            unit: unit.to_string(),
            active,
            current_on_payments: 0,
            delinquent: 0,
            personal_training: 0,
            vip: 0,
            suspended: 0,
            churn_rate: None,
        }
    }

    fn financial(unit: &str, label: Option<&str>) -> FinancialRecord {
        FinancialRecord {
            unit: unit.to_string(),
            month: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            revenue: 1.0,
            operating_profit: 1.0,
            reinvestment: 0.0,
            partner_withdrawal: 0.0,
            month_label: label.map(str::to_string),
        }
    }

    fn units(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_exactly_the_selected_units() {
        let rows = vec![snapshot("A", 1), snapshot("B", 2), snapshot("C", 3)];
        let picked = filter_snapshots(&rows, &units(&["A", "C"]));
        let names: Vec<&str> = picked.iter().map(|r| r.unit.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn empty_selection_yields_empty_result() {
        let rows = vec![snapshot("A", 1), snapshot("B", 2)];
        assert!(filter_snapshots(&rows, &BTreeSet::new()).is_empty());
        assert!(filter_financials(&[financial("A", Some("August"))], &BTreeSet::new(), &units(&["August"])).is_empty());
    }

    #[test]
    fn filter_is_stable() {
        let rows = vec![snapshot("C", 3), snapshot("A", 1), snapshot("B", 2)];
        let picked = filter_snapshots(&rows, &units(&["A", "B", "C"]));
        let names: Vec<&str> = picked.iter().map(|r| r.unit.as_str()).collect();
        // Original row order, not sorted order.
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn financial_filter_requires_both_dimensions() {
        let rows = vec![
            financial("A", Some("August")),
            financial("A", Some("September")),
            financial("B", Some("August")),
            financial("A", None),
        ];
        let picked = filter_financials(&rows, &units(&["A"]), &units(&["August"]));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].unit, "A");
        assert_eq!(picked[0].month_label.as_deref(), Some("August"));
    }

    #[test]
    fn unlabeled_months_never_pass() {
        let rows = vec![financial("A", None)];
        let picked = filter_financials(
            &rows,
            &units(&["A"]),
            &units(&["August", "September", "October"]),
        );
        assert!(picked.is_empty());
    }
}
