use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use super::model::{FinancialRecord, MonthCalendar, ReportDataset, UnitSnapshot};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can go wrong while reading the workbook. The UI turns any
/// of these into a warning banner; a load failure never aborts the app.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("workbook has no sheet named '{0}'")]
    MissingSheet(String),

    #[error("failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("sheet '{sheet}' is missing column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("sheet '{sheet}' row {row}: {message}")]
    Cell {
        sheet: String,
        row: usize,
        message: String,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Column names (after header normalization)
// ---------------------------------------------------------------------------

const COL_UNIT: &str = "Unit";
const COL_ACTIVE: &str = "Active";
const COL_CURRENT: &str = "Current on Payments";
const COL_DELINQUENT: &str = "Delinquent";
const COL_PERSONAL: &str = "Personal Training";
const COL_VIP: &str = "VIP";
const COL_SUSPENDED: &str = "Suspended";
const COL_CHURN: &str = "Churn Rate";

const COL_MONTH: &str = "Month";
const COL_REVENUE: &str = "Revenue";
const COL_PROFIT: &str = "Operating Profit";
const COL_REINVESTMENT: &str = "Reinvestment";
const COL_WITHDRAWAL: &str = "Partner Withdrawal";

/// Collapse any run of whitespace in a header cell to a single space and
/// trim the ends, so column lookups are immune to spacing variance in the
/// source spreadsheet.
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load both report sheets from an `.xlsx` workbook.
pub fn load_workbook(
    path: &Path,
    snapshot_sheet: &str,
    financial_sheet: &str,
    calendar: &MonthCalendar,
) -> LoadResult<ReportDataset> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let snapshot_range = sheet_range(&mut workbook, snapshot_sheet)?;
    let financial_range = sheet_range(&mut workbook, financial_sheet)?;

    let snapshots = parse_snapshots(snapshot_sheet, &snapshot_range)?;
    let financials = parse_financials(financial_sheet, &financial_range)?;

    Ok(ReportDataset::new(snapshots, financials, calendar))
}

fn sheet_range(
    workbook: &mut Xlsx<std::io::BufReader<std::fs::File>>,
    sheet: &str,
) -> LoadResult<Range<Data>> {
    if !workbook.sheet_names().iter().any(|s| s == sheet) {
        return Err(LoadError::MissingSheet(sheet.to_string()));
    }
    workbook
        .worksheet_range(sheet)
        .map_err(|source| LoadError::Sheet {
            sheet: sheet.to_string(),
            source,
        })
}

// ---------------------------------------------------------------------------
// Header index
// ---------------------------------------------------------------------------

/// Normalized header row of one sheet, for name → column lookups.
struct HeaderIndex {
    sheet: String,
    columns: Vec<String>,
}

impl HeaderIndex {
    fn from_range(sheet: &str, range: &Range<Data>) -> Self {
        let columns = range
            .rows()
            .next()
            .map(|row| {
                row.iter()
                    .map(|cell| normalize_header(&cell.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        HeaderIndex {
            sheet: sheet.to_string(),
            columns,
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require(&self, name: &str) -> LoadResult<usize> {
        self.find(name).ok_or_else(|| LoadError::MissingColumn {
            sheet: self.sheet.clone(),
            column: name.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Sheet parsers
// ---------------------------------------------------------------------------

fn parse_snapshots(sheet: &str, range: &Range<Data>) -> LoadResult<Vec<UnitSnapshot>> {
    let header = HeaderIndex::from_range(sheet, range);

    let unit_col = header.require(COL_UNIT)?;
    let active_col = header.require(COL_ACTIVE)?;
    let current_col = header.require(COL_CURRENT)?;
    let delinquent_col = header.require(COL_DELINQUENT)?;
    let personal_col = header.require(COL_PERSONAL)?;
    let vip_col = header.require(COL_VIP)?;
    let suspended_col = header.require(COL_SUSPENDED)?;
    // Only one workbook variant carries churn figures.
    let churn_col = header.find(COL_CHURN);

    let mut snapshots = Vec::new();
    for (row_no, row) in range.rows().enumerate().skip(1) {
        if row_is_blank(row) {
            continue;
        }
        let snapshot = UnitSnapshot {
            unit: cell_string(sheet, row_no, row, unit_col)?,
            active: cell_count(sheet, row_no, row, active_col)?,
            current_on_payments: cell_count(sheet, row_no, row, current_col)?,
            delinquent: cell_count(sheet, row_no, row, delinquent_col)?,
            personal_training: cell_count(sheet, row_no, row, personal_col)?,
            vip: cell_count(sheet, row_no, row, vip_col)?,
            suspended: cell_count(sheet, row_no, row, suspended_col)?,
            churn_rate: match churn_col {
                Some(col) => cell_opt_f64(sheet, row_no, row, col)?,
                None => None,
            },
        };
        snapshots.push(snapshot);
    }
    Ok(snapshots)
}

fn parse_financials(sheet: &str, range: &Range<Data>) -> LoadResult<Vec<FinancialRecord>> {
    let header = HeaderIndex::from_range(sheet, range);

    let unit_col = header.require(COL_UNIT)?;
    let month_col = header.require(COL_MONTH)?;
    let revenue_col = header.require(COL_REVENUE)?;
    let profit_col = header.require(COL_PROFIT)?;
    let reinvestment_col = header.require(COL_REINVESTMENT)?;
    let withdrawal_col = header.require(COL_WITHDRAWAL)?;

    let mut records = Vec::new();
    for (row_no, row) in range.rows().enumerate().skip(1) {
        if row_is_blank(row) {
            continue;
        }
        let record = FinancialRecord {
            unit: cell_string(sheet, row_no, row, unit_col)?,
            month: cell_month(sheet, row_no, row, month_col)?,
            revenue: cell_f64(sheet, row_no, row, revenue_col)?,
            operating_profit: cell_f64(sheet, row_no, row, profit_col)?,
            reinvestment: cell_f64(sheet, row_no, row, reinvestment_col)?,
            partner_withdrawal: cell_f64(sheet, row_no, row, withdrawal_col)?,
            month_label: None,
        };
        records.push(record);
    }
    Ok(records)
}

// -- Cell helpers --

fn row_is_blank(row: &[Data]) -> bool {
    row.iter().all(|cell| matches!(cell, Data::Empty))
}

fn cell<'a>(row: &'a [Data], col: usize) -> &'a Data {
    row.get(col).unwrap_or(&Data::Empty)
}

fn cell_error(sheet: &str, row: usize, message: String) -> LoadError {
    LoadError::Cell {
        sheet: sheet.to_string(),
        row,
        message,
    }
}

fn cell_string(sheet: &str, row_no: usize, row: &[Data], col: usize) -> LoadResult<String> {
    match cell(row, col) {
        Data::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Data::Int(i) => Ok(i.to_string()),
        Data::Float(f) => Ok(f.to_string()),
        other => Err(cell_error(
            sheet,
            row_no,
            format!("expected text, found {other:?}"),
        )),
    }
}

fn cell_f64(sheet: &str, row_no: usize, row: &[Data], col: usize) -> LoadResult<f64> {
    match cell(row, col) {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::String(s) => s.trim().parse::<f64>().map_err(|_| {
            cell_error(sheet, row_no, format!("'{s}' is not a number"))
        }),
        other => Err(cell_error(
            sheet,
            row_no,
            format!("expected a number, found {other:?}"),
        )),
    }
}

fn cell_opt_f64(sheet: &str, row_no: usize, row: &[Data], col: usize) -> LoadResult<Option<f64>> {
    match cell(row, col) {
        Data::Empty => Ok(None),
        _ => cell_f64(sheet, row_no, row, col).map(Some),
    }
}

fn cell_count(sheet: &str, row_no: usize, row: &[Data], col: usize) -> LoadResult<u64> {
    let value = cell_f64(sheet, row_no, row, col)?;
    if value < 0.0 {
        return Err(cell_error(
            sheet,
            row_no,
            format!("negative count {value}"),
        ));
    }
    Ok(value.round() as u64)
}

/// Accepts native Excel datetimes as well as ISO `YYYY-MM-DD` strings, and
/// truncates either to the first of the month.
fn cell_month(sheet: &str, row_no: usize, row: &[Data], col: usize) -> LoadResult<NaiveDate> {
    let date = match cell(row, col) {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) => parse_iso_date(s),
        Data::String(s) => parse_iso_date(s),
        _ => None,
    };
    date.and_then(|d| d.with_day(1))
        .ok_or_else(|| cell_error(sheet, row_no, "unreadable month cell".to_string()))
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let head = s.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// CachedLoader – explicit memoized load with an invalidation hook
// ---------------------------------------------------------------------------

/// Owns the workbook path and caches the parsed dataset after the first
/// successful `load`, so filter changes never re-read the file. `invalidate`
/// drops the cache; `reload` forces a fresh parse.
pub struct CachedLoader {
    path: PathBuf,
    snapshot_sheet: String,
    financial_sheet: String,
    calendar: MonthCalendar,
    cached: Option<ReportDataset>,
}

impl CachedLoader {
    pub fn new(
        path: PathBuf,
        snapshot_sheet: String,
        financial_sheet: String,
        calendar: MonthCalendar,
    ) -> Self {
        Self {
            path,
            snapshot_sheet,
            financial_sheet,
            calendar,
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point the loader at a different workbook, dropping the cache.
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = path;
        self.invalidate();
    }

    /// Parse the workbook, reusing the cached dataset when available.
    pub fn load(&mut self) -> LoadResult<ReportDataset> {
        if let Some(ds) = &self.cached {
            return Ok(ds.clone());
        }
        let dataset = load_workbook(
            &self.path,
            &self.snapshot_sheet,
            &self.financial_sheet,
            &self.calendar,
        )?;
        log::info!(
            "Loaded {}: {} units, {} financial rows",
            self.path.display(),
            dataset.snapshots.len(),
            dataset.financials.len()
        );
        self.cached = Some(dataset.clone());
        Ok(dataset)
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn reload(&mut self) -> LoadResult<ReportDataset> {
        self.invalidate();
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWorkbook;

    #[test]
    fn header_normalization_collapses_internal_runs() {
        assert_eq!(normalize_header("Lucro   Operavional"), "Lucro Operavional");
        assert_eq!(normalize_header("  Unit "), "Unit");
        assert_eq!(normalize_header("Current \t on Payments"), "Current on Payments");
        assert_eq!(normalize_header("Churn\t\tRate"), "Churn Rate");
    }

    fn write_workbook(path: &Path, revenue_scale: f64) {
        let mut wb = XlsxWorkbook::new();

        let sheet = wb.add_worksheet();
        sheet.set_name("Large Numbers").unwrap();
        // Irregular spacing on purpose; the loader must normalize it away.
        let headers = [
            "Unit",
            "Active",
            "Current   on Payments",
            "Delinquent",
            "Personal Training",
            "VIP",
            "Suspended",
        ];
        for (col, h) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *h).unwrap();
        }
        sheet.write_string(1, 0, "Downtown").unwrap();
        for (col, v) in [100.0, 90.0, 10.0, 12.0, 4.0, 3.0].iter().enumerate() {
            sheet.write_number(1, (col + 1) as u16, *v).unwrap();
        }

        let fin = wb.add_worksheet();
        fin.set_name("Financial").unwrap();
        let headers = [
            "Unit",
            "Month",
            "Revenue",
            "Operating  Profit",
            "Reinvestment",
            "Partner Withdrawal",
        ];
        for (col, h) in headers.iter().enumerate() {
            fin.write_string(0, col as u16, *h).unwrap();
        }
        for (row, (month, revenue)) in [("2025-10-15", 1200.0), ("2025-08-01", 1000.0)]
            .iter()
            .enumerate()
        {
            let row = (row + 1) as u32;
            fin.write_string(row, 0, "Downtown").unwrap();
            fin.write_string(row, 1, *month).unwrap();
            fin.write_number(row, 2, revenue * revenue_scale).unwrap();
            fin.write_number(row, 3, 500.0).unwrap();
            fin.write_number(row, 4, 200.0).unwrap();
            fin.write_number(row, 5, 100.0).unwrap();
        }

        wb.save(path).unwrap();
    }

    fn loader_for(path: &Path) -> CachedLoader {
        CachedLoader::new(
            path.to_path_buf(),
            "Large Numbers".to_string(),
            "Financial".to_string(),
            MonthCalendar::default(),
        )
    }

    #[test]
    fn loads_both_sheets_with_normalized_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_workbook(&path, 1.0);

        let ds = load_workbook(
            &path,
            "Large Numbers",
            "Financial",
            &MonthCalendar::default(),
        )
        .unwrap();

        assert_eq!(ds.snapshots.len(), 1);
        let snap = &ds.snapshots[0];
        assert_eq!(snap.unit, "Downtown");
        assert_eq!(snap.active, 100);
        assert_eq!(snap.current_on_payments, 90);
        assert_eq!(snap.delinquent, 10);
        // No churn column in this variant.
        assert_eq!(snap.churn_rate, None);

        assert_eq!(ds.financials.len(), 2);
        assert_eq!(ds.financials[0].month_label.as_deref(), Some("October"));
        assert_eq!(ds.financials[0].month.day(), 1);
        assert_eq!(ds.financials[1].month_label.as_deref(), Some("August"));
        assert_eq!(ds.financials[0].operating_profit, 500.0);
    }

    #[test]
    fn missing_sheet_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_workbook(&path, 1.0);

        let err = load_workbook(&path, "Nope", "Financial", &MonthCalendar::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingSheet(name) if name == "Nope"));
    }

    #[test]
    fn missing_workbook_is_reported() {
        let err = load_workbook(
            Path::new("does-not-exist.xlsx"),
            "Large Numbers",
            "Financial",
            &MonthCalendar::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn missing_required_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut wb = XlsxWorkbook::new();
        let sheet = wb.add_worksheet();
        sheet.set_name("Large Numbers").unwrap();
        sheet.write_string(0, 0, "Unit").unwrap();
        let fin = wb.add_worksheet();
        fin.set_name("Financial").unwrap();
        fin.write_string(0, 0, "Unit").unwrap();
        wb.save(&path).unwrap();

        let err = load_workbook(
            &path,
            "Large Numbers",
            "Financial",
            &MonthCalendar::default(),
        )
        .unwrap_err();
        assert!(
            matches!(err, LoadError::MissingColumn { ref column, .. } if column == "Active")
        );
    }

    #[test]
    fn cached_loader_parses_once_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_workbook(&path, 1.0);

        let mut loader = loader_for(&path);
        let first = loader.load().unwrap();
        assert_eq!(first.financials[1].revenue, 1000.0);

        // Rewrite the file; the cached dataset must still be served.
        write_workbook(&path, 2.0);
        let cached = loader.load().unwrap();
        assert_eq!(cached.financials[1].revenue, 1000.0);

        // Reload drops the cache and sees the new figures.
        let fresh = loader.reload().unwrap();
        assert_eq!(fresh.financials[1].revenue, 2000.0);
    }
}
