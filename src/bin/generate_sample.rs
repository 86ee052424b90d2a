//! Writes a deterministic sample `Base_Six.xlsx` for demos and manual
//! testing: one membership row per unit plus three months of financial rows.

use anyhow::Result;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform float in [lo, hi).
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }

    /// Uniform integer in [lo, hi].
    fn count(&mut self, lo: u64, hi: u64) -> u64 {
        self.range(lo as f64, hi as f64 + 1.0).floor() as u64
    }
}

const UNITS: [&str; 4] = ["Downtown", "Harbor", "Midtown", "West End"];
const MONTHS: [u8; 3] = [8, 9, 10];

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(6);
    let mut workbook = Workbook::new();

    // ---- "Large Numbers": one membership row per unit ----
    let sheet = workbook.add_worksheet();
    sheet.set_name("Large Numbers")?;
    let headers = [
        "Unit",
        "Active",
        "Current on Payments",
        "Delinquent",
        "Personal Training",
        "VIP",
        "Suspended",
        "Churn Rate",
    ];
    for (col, h) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *h)?;
    }

    for (i, unit) in UNITS.iter().enumerate() {
        let row = (i + 1) as u32;
        let active = rng.count(300, 800);
        let delinquent = rng.count(active / 20, active / 8);
        sheet.write_string(row, 0, *unit)?;
        sheet.write_number(row, 1, active as f64)?;
        sheet.write_number(row, 2, (active - delinquent) as f64)?;
        sheet.write_number(row, 3, delinquent as f64)?;
        sheet.write_number(row, 4, rng.count(20, 80) as f64)?;
        sheet.write_number(row, 5, rng.count(5, 30) as f64)?;
        sheet.write_number(row, 6, rng.count(3, 25) as f64)?;
        sheet.write_number(row, 7, rng.range(0.02, 0.09))?;
    }

    // ---- "Financial": one row per (unit, month) ----
    let sheet = workbook.add_worksheet();
    sheet.set_name("Financial")?;
    let headers = [
        "Unit",
        "Month",
        "Revenue",
        "Operating Profit",
        "Reinvestment",
        "Partner Withdrawal",
    ];
    for (col, h) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *h)?;
    }
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let mut row = 1u32;
    for unit in UNITS {
        for month in MONTHS {
            let revenue = rng.range(80_000.0, 160_000.0).round();
            let profit = (revenue * rng.range(0.25, 0.45)).round();
            sheet.write_string(row, 0, unit)?;
            sheet.write_datetime_with_format(
                row,
                1,
                &ExcelDateTime::from_ymd(2025, month, 1)?,
                &date_format,
            )?;
            sheet.write_number(row, 2, revenue)?;
            sheet.write_number(row, 3, profit)?;
            sheet.write_number(row, 4, (profit * rng.range(0.2, 0.5)).round())?;
            sheet.write_number(row, 5, (profit * rng.range(0.1, 0.3)).round())?;
            row += 1;
        }
    }

    workbook.save("Base_Six.xlsx")?;
    log::info!(
        "Wrote Base_Six.xlsx: {} units, {} financial rows",
        UNITS.len(),
        UNITS.len() * MONTHS.len()
    );
    Ok(())
}
