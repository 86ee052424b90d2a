use std::collections::BTreeMap;

use super::model::{FinancialRecord, MonthCalendar, UnitSnapshot};

// ---------------------------------------------------------------------------
// Generic grouped sum
// ---------------------------------------------------------------------------

/// Sum `value` over `rows` grouped by `key`. Row order within a group never
/// affects the result.
pub fn sum_by<R, K, FK, FV>(rows: &[R], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&R) -> K,
    FV: Fn(&R) -> f64,
{
    let mut totals: BTreeMap<K, f64> = BTreeMap::new();
    for row in rows {
        *totals.entry(key(row)).or_insert(0.0) += value(row);
    }
    totals
}

// ---------------------------------------------------------------------------
// Monthly series (calendar-ordered)
// ---------------------------------------------------------------------------

/// Per-month sums in calendar order (August before September before October
/// for the stock window), regardless of input row order. Months with no rows
/// are omitted; rows without a label are skipped.
pub fn monthly_series<FV>(
    rows: &[FinancialRecord],
    calendar: &MonthCalendar,
    value: FV,
) -> Vec<(String, f64)>
where
    FV: Fn(&FinancialRecord) -> f64,
{
    let labeled: Vec<&FinancialRecord> = rows
        .iter()
        .filter(|r| r.month_label.is_some())
        .collect();
    let totals = sum_by(
        &labeled,
        |r| r.month_label.clone().unwrap_or_default(),
        |r| value(r),
    );

    let mut series: Vec<(String, f64)> = totals.into_iter().collect();
    series.sort_by_key(|(label, _)| calendar.ordinal(label).unwrap_or(usize::MAX));
    series
}

/// Per-(month, unit) sums for the grouped bar chart: months in calendar
/// order, units sorted within each month.
pub fn monthly_unit_series<FV>(
    rows: &[FinancialRecord],
    calendar: &MonthCalendar,
    value: FV,
) -> Vec<(String, Vec<(String, f64)>)>
where
    FV: Fn(&FinancialRecord) -> f64,
{
    let mut by_month: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for row in rows {
        let Some(label) = &row.month_label else {
            continue;
        };
        *by_month
            .entry(label.clone())
            .or_default()
            .entry(row.unit.clone())
            .or_insert(0.0) += value(row);
    }

    let mut series: Vec<(String, Vec<(String, f64)>)> = by_month
        .into_iter()
        .map(|(label, units)| (label, units.into_iter().collect()))
        .collect();
    series.sort_by_key(|(label, _)| calendar.ordinal(label).unwrap_or(usize::MAX));
    series
}

// ---------------------------------------------------------------------------
// Snapshot totals & derived ratios
// ---------------------------------------------------------------------------

/// Membership totals over the filtered snapshot rows (the overview cards).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotTotals {
    pub active: u64,
    pub current_on_payments: u64,
    pub delinquent: u64,
    pub personal_training: u64,
    pub vip: u64,
    pub suspended: u64,
}

impl SnapshotTotals {
    pub fn compute(rows: &[UnitSnapshot]) -> Self {
        let mut totals = SnapshotTotals::default();
        for row in rows {
            totals.active += row.active;
            totals.current_on_payments += row.current_on_payments;
            totals.delinquent += row.delinquent;
            totals.personal_training += row.personal_training;
            totals.vip += row.vip;
            totals.suspended += row.suspended;
        }
        totals
    }

    /// Category totals in fixed display order (the customers chart).
    pub fn categories(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("Active", self.active),
            ("Current on Payments", self.current_on_payments),
            ("Delinquent", self.delinquent),
            ("Personal Training", self.personal_training),
            ("VIP", self.vip),
            ("Suspended", self.suspended),
        ]
    }

    /// Current vs delinquent member split (the pie).
    pub fn plan_split(&self) -> (u64, u64) {
        (self.current_on_payments, self.delinquent)
    }

    pub fn delinquency_rate(&self) -> f64 {
        delinquency_rate(self.active, self.delinquent)
    }
}

/// Percentage of active members behind on payments. A unit with zero active
/// members has no meaningful rate; the documented sentinel is `NaN`, which
/// the UI renders as a placeholder.
pub fn delinquency_rate(active: u64, delinquent: u64) -> f64 {
    if active == 0 {
        return f64::NAN;
    }
    delinquent as f64 / active as f64 * 100.0
}

/// Arithmetic mean of the churn rates present in the filtered rows, or
/// `None` when no row carries one (the churn column is variant-specific).
pub fn mean_churn(rows: &[UnitSnapshot]) -> Option<f64> {
    let values: Vec<f64> = rows.iter().filter_map(|r| r.churn_rate).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(unit: &str, active: u64, current: u64, delinquent: u64) -> UnitSnapshot {
        UnitSnapshot {
            unit: unit.to_string(),
            active,
            current_on_payments: current,
            delinquent,
            personal_training: 7,
            vip: 3,
            suspended: 2,
            churn_rate: None,
        }
    }

    fn financial(unit: &str, month: u32, revenue: f64) -> FinancialRecord {
        let mut rec = FinancialRecord {
            unit: unit.to_string(),
            month: NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
            revenue,
            operating_profit: revenue / 2.0,
            reinvestment: 0.0,
            partner_withdrawal: 0.0,
            month_label: None,
        };
        rec.derive_label(&MonthCalendar::default());
        rec
    }

    #[test]
    fn sum_by_is_permutation_invariant() {
        let a = vec![
            financial("A", 8, 100.0),
            financial("B", 8, 10.0),
            financial("A", 9, 50.0),
        ];
        let mut b = a.clone();
        b.reverse();

        let key = |r: &FinancialRecord| r.unit.clone();
        let value = |r: &FinancialRecord| r.revenue;
        assert_eq!(sum_by(&a, key, value), sum_by(&b, key, value));
    }

    #[test]
    fn monthly_series_follows_calendar_order() {
        // October first, then August, then September.
        let rows = vec![
            financial("A", 10, 1200.0),
            financial("A", 8, 1000.0),
            financial("A", 9, 1500.0),
        ];
        let series = monthly_series(&rows, &MonthCalendar::default(), |r| r.revenue);
        let labels: Vec<&str> = series.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["August", "September", "October"]);

        let total: f64 = series.iter().map(|(_, v)| v).sum();
        assert_eq!(total, 3700.0);
    }

    #[test]
    fn monthly_unit_series_groups_and_orders() {
        let rows = vec![
            financial("B", 9, 20.0),
            financial("A", 8, 1.0),
            financial("A", 9, 10.0),
            financial("A", 9, 5.0),
        ];
        let series = monthly_unit_series(&rows, &MonthCalendar::default(), |r| r.revenue);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].0, "August");
        assert_eq!(series[0].1, vec![("A".to_string(), 1.0)]);
        assert_eq!(series[1].0, "September");
        assert_eq!(
            series[1].1,
            vec![("A".to_string(), 15.0), ("B".to_string(), 20.0)]
        );
    }

    #[test]
    fn overview_totals_match_single_unit_rows() {
        let rows = vec![snapshot("A", 100, 90, 10)];
        let totals = SnapshotTotals::compute(&rows);
        assert_eq!(totals.active, 100);
        assert_eq!(totals.current_on_payments, 90);
        assert_eq!(totals.delinquent, 10);
        assert_eq!(totals.delinquency_rate(), 10.0);
    }

    #[test]
    fn zero_active_members_yield_a_nan_rate_not_a_panic() {
        assert!(delinquency_rate(0, 0).is_nan());
        assert!(delinquency_rate(0, 5).is_nan());
        let totals = SnapshotTotals::compute(&[]);
        assert!(totals.delinquency_rate().is_nan());
    }

    #[test]
    fn mean_churn_ignores_missing_values() {
        let mut with = snapshot("A", 10, 9, 1);
        with.churn_rate = Some(0.2);
        let mut with2 = snapshot("B", 10, 9, 1);
        with2.churn_rate = Some(0.4);
        let without = snapshot("C", 10, 9, 1);

        let rows = vec![with, without.clone(), with2];
        let mean = mean_churn(&rows).unwrap();
        assert!((mean - 0.3).abs() < 1e-12);

        assert_eq!(mean_churn(&[without]), None);
        assert_eq!(mean_churn(&[]), None);
    }
}
