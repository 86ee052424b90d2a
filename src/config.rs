use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::model::MonthCalendar;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Runtime configuration, read from an optional `dashboard.json` next to the
/// working directory. Every field has a default matching the stock SIX
/// deployment, so the file is only needed to override something.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Workbook with the two report sheets.
    pub workbook_path: PathBuf,
    /// Sheet holding one membership-count row per unit.
    pub snapshot_sheet: String,
    /// Sheet holding one financial row per (unit, month).
    pub financial_sheet: String,
    /// Ordered (month number, label) pairs defining the reporting window.
    pub month_calendar: Vec<(u32, String)>,
    /// Background image; missing file means plain background.
    pub background_path: PathBuf,
    /// Logo image; missing file means a text placeholder.
    pub logo_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from("Base_Six.xlsx"),
            snapshot_sheet: "Large Numbers".to_string(),
            financial_sheet: "Financial".to_string(),
            month_calendar: vec![
                (8, "August".to_string()),
                (9, "September".to_string()),
                (10, "October".to_string()),
            ],
            background_path: PathBuf::from("SIX-BG.jpg"),
            logo_path: PathBuf::from("LogoPNG.png"),
        }
    }
}

impl DashboardConfig {
    /// Build the month calendar from the configured pairs.
    pub fn calendar(&self) -> MonthCalendar {
        MonthCalendar::new(self.month_calendar.clone())
    }
}

/// Read the config file, falling back to defaults when it is absent or
/// malformed. A broken config must never prevent the dashboard from opening.
pub fn load_or_default(path: &Path) -> DashboardConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(cfg) => {
                log::info!("Loaded configuration from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!(
                    "Ignoring malformed config {}: {e}; using defaults",
                    path.display()
                );
                DashboardConfig::default()
            }
        },
        Err(_) => DashboardConfig::default(),
    }
}
