/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///    .xlsx workbook
///         │
///         ▼
///    ┌──────────┐
///    │  loader   │  read both sheets → ReportDataset (memoized)
///    └──────────┘
///         │
///         ▼
///    ┌───────────────┐
///    │ ReportDataset  │  unit snapshots + financial records
///    └───────────────┘
///         │
///         ▼
///    ┌──────────┐
///    │  filter   │  unit / month selections → filtered views
///    └──────────┘
///         │
///         ▼
///    ┌────────────┐
///    │ aggregate   │  grouped sums, derived ratios → cards & charts
///    └────────────┘
/// ```
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
