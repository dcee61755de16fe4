use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// FlightRecord – one entity/day observation
// ---------------------------------------------------------------------------

/// Flights recorded for one entity (country or aggregate region) on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    /// Country or region label, e.g. `"Germany"`.
    pub entity: String,
    /// Week number as given by the source file (1..=53).
    pub week: u32,
    /// Source text of the day, `DD/MM/YYYY`.
    pub day: String,
    /// `day` parsed; used for ordering and time axes.
    pub date: NaiveDate,
    pub flights: u64,
    /// Comparison columns, when the row carries them.
    pub reference: Option<ReferenceCounts>,
}

impl FlightRecord {
    /// Multi-line hover text: the day's count and any comparison columns.
    pub fn describe(&self) -> String {
        let mut text = format!("{}, {}\nFlights: {}", self.entity, self.day, self.flights);
        let Some(reference) = &self.reference else {
            return text;
        };
        text.push_str(&format!(
            "\nFlights 2019 ({}): {}",
            reference.day_2019, reference.flights_2019
        ));
        if let Some(percent) = reference.percent_vs_2019 {
            text.push_str(&format!("\nvs 2019: {:+.0}%", percent * 100.0));
        }
        if let Some(previous) = reference.flights_previous_year {
            match &reference.day_previous_year {
                Some(day) => text.push_str(&format!("\nPrevious year ({day}): {previous}")),
                None => text.push_str(&format!("\nPrevious year: {previous}")),
            }
        }
        text
    }
}

/// The optional 2019 / previous-year columns of a source row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceCounts {
    pub day_2019: String,
    pub flights_2019: u64,
    /// `% vs 2019 (Daily)` as written in the file.
    pub percent_vs_2019: Option<f64>,
    pub day_previous_year: Option<String>,
    pub flights_previous_year: Option<u64>,
}

// ---------------------------------------------------------------------------
// FlightDataset – one year's worth of records
// ---------------------------------------------------------------------------

/// All records loaded for one year. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightDataset {
    year: String,
    records: Vec<FlightRecord>,
    entities: Vec<String>,
    rejected_rows: usize,
    fetch_error: Option<String>,
}

impl FlightDataset {
    /// Build the dataset and its entity index (first-seen order).
    pub fn from_records(year: &str, records: Vec<FlightRecord>, rejected_rows: usize) -> Self {
        let mut seen = HashSet::new();
        let entities = records
            .iter()
            .filter(|r| seen.insert(r.entity.as_str()))
            .map(|r| r.entity.clone())
            .collect();

        FlightDataset {
            year: year.to_string(),
            records,
            entities,
            rejected_rows,
            fetch_error: None,
        }
    }

    /// The "no data" dataset.
    pub fn empty(year: &str) -> Self {
        Self::from_records(year, Vec::new(), 0)
    }

    /// "No data" because the resource could not be fetched.
    pub fn unavailable(year: &str, reason: impl Into<String>) -> Self {
        FlightDataset {
            fetch_error: Some(reason.into()),
            ..Self::empty(year)
        }
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    /// Distinct entity labels in the order they first appear.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn has_entity(&self, entity: &str) -> bool {
        self.entities.iter().any(|e| e == entity)
    }

    /// Rows dropped during parsing.
    pub fn rejected_rows(&self) -> usize {
        self.rejected_rows
    }

    /// Why the resource could not be fetched, if it could not.
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
