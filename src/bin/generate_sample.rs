//! Writes synthetic `csv{year}.csv` files with the full column layout.
//!
//! Usage: `generate_sample [output_dir]` (default `data`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};

use flightboard::data::date::format_day;

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Daily 2019 baseline per entity.
const ENTITIES: &[(&str, f64)] = &[
    ("Austria", 1250.0),
    ("Belgium", 1640.0),
    ("Croatia", 720.0),
    ("France", 3150.0),
    ("Germany", 4300.0),
    ("Greece", 1450.0),
    ("Italy", 2700.0),
    ("Malta", 150.0),
    ("Netherlands", 1650.0),
    ("Poland", 1200.0),
    ("Portugal", 950.0),
    ("Spain", 3100.0),
    ("Sweden", 850.0),
    ("Switzerland", 1400.0),
    ("Turkey", 2100.0),
    ("United Kingdom", 4000.0),
    ("Total Network Manager Area", 30000.0),
];

/// Share of 2019 traffic reached by mid-year, per year.
fn recovery(year: i32) -> f64 {
    match year {
        2020 => 0.45,
        2021 => 0.6,
        2022 => 0.85,
        _ => 0.93,
    }
}

/// Summer peak: +25% around day 200, -15% in January.
fn seasonality(date: NaiveDate) -> f64 {
    let phase = (date.ordinal() as f64 - 200.0) / 365.0 * std::f64::consts::TAU;
    1.05 + 0.2 * phase.cos()
}

/// Same weekday in 2019 (52 weeks back per year elapsed).
fn same_weekday_in(date: NaiveDate, target_year: i32) -> NaiveDate {
    let weeks_back = 52 * i64::from(date.year() - target_year);
    date - Duration::weeks(weeks_back)
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    for year in 2020..=2023 {
        let path = out_dir.join(format!("csv{year}.csv"));
        let mut writer =
            csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
        writer.write_record([
            "Entity",
            "Week",
            "Day",
            "Flights",
            "Day 2019",
            "Flights 2019 (Reference)",
            "% vs 2019 (Daily)",
            "Day Previous Year",
            "Flights Previous Year",
        ])?;

        let first = NaiveDate::from_ymd_opt(year, 1, 1).context("invalid year")?;
        let mut rows = 0usize;
        for date in first.iter_days().take_while(|d| d.year() == year) {
            let day_2019 = same_weekday_in(date, 2019);
            let day_prev = same_weekday_in(date, year - 1);
            let level = recovery(year) * seasonality(date);
            let prev_level = if year == 2020 { 1.0 } else { recovery(year - 1) } * seasonality(date);

            for &(entity, baseline) in ENTITIES {
                let reference = (baseline * seasonality(day_2019) * rng.range(0.95, 1.05)).round();
                let flights = (reference * level * rng.range(0.9, 1.1)).round();
                let previous = (reference * prev_level * rng.range(0.9, 1.1)).round();
                let change = if reference > 0.0 { flights / reference - 1.0 } else { 0.0 };

                writer.write_record([
                    entity.to_string(),
                    date.iso_week().week().to_string(),
                    format_day(date),
                    format!("{flights}"),
                    format_day(day_2019),
                    format!("{reference}"),
                    format!("{change:.2}"),
                    format_day(day_prev),
                    format!("{previous}"),
                ])?;
                rows += 1;
            }
        }
        writer.flush()?;
        println!("Wrote {rows} rows to {}", path.display());
    }
    Ok(())
}
