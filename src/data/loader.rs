use std::path::PathBuf;

use anyhow::{Context, Result};
use csv::StringRecord;
use thiserror::Error;

use super::date::parse_day;
use super::model::{FlightDataset, FlightRecord, ReferenceCounts};

// ---------------------------------------------------------------------------
// Resource access
// ---------------------------------------------------------------------------

/// Where a year's CSV bytes come from.
///
/// Bytes rather than text: a row with invalid UTF-8 is dropped on its own
/// by the CSV reader instead of failing the whole file.
pub trait FlightSource: Send + Sync {
    /// Fetch the raw CSV content for `year`.
    fn fetch(&self, year: &str) -> Result<Vec<u8>>;
}

/// Reads `<root>/<pattern>` with `{year}` substituted, e.g. `data/csv2021.csv`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    pattern: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            pattern: pattern.into(),
        }
    }

    /// File that holds `year`'s data.
    pub fn path_for(&self, year: &str) -> PathBuf {
        self.root.join(self.pattern.replace("{year}", year))
    }
}

impl FlightSource for DirectorySource {
    fn fetch(&self, year: &str) -> Result<Vec<u8>> {
        let path = self.path_for(year);
        std::fs::read(&path).with_context(|| format!("reading {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fetch and parse one year. A failed fetch yields an empty dataset carrying
/// the reason; it is never propagated.
pub fn load_year(source: &dyn FlightSource, year: &str) -> FlightDataset {
    match source.fetch(year) {
        Ok(bytes) => parse_flight_csv(year, &bytes),
        Err(e) => {
            log::error!("No data for {year}: {e:#}");
            FlightDataset::unavailable(year, format!("{e:#}"))
        }
    }
}

/// Parse CSV content into a dataset.
///
/// The first line is the header. Field order is positional:
/// `Entity, Week, Day, Flights[, Day 2019, Flights 2019 (Reference),
/// % vs 2019 (Daily), Day Previous Year, Flights Previous Year]`.
/// Bad rows are logged and skipped; they never abort the rest of the file.
pub fn parse_flight_csv(year: &str, data: impl AsRef<[u8]>) -> FlightDataset {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_ref());

    let mut records = Vec::new();
    let mut rejected = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = row_no + 2;
        let outcome = result
            .map_err(|e| RowRejection::Malformed(e.to_string()))
            .and_then(|row| parse_row(&row));

        match outcome {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::warn!("{year} line {line}: dropping row: {reason}");
                rejected += 1;
            }
        }
    }

    let dataset = FlightDataset::from_records(year, records, rejected);
    log::info!(
        "Loaded {} flight records for {year} ({} entities, {} rows dropped)",
        dataset.len(),
        dataset.entities().len(),
        rejected
    );
    dataset
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// Why a CSV row was left out of the dataset.
#[derive(Debug, Error, PartialEq)]
pub enum RowRejection {
    #[error("expected at least 4 fields, found {0}")]
    TooFewFields(usize),
    #[error("empty entity")]
    EmptyEntity,
    #[error("'{0}' is not a valid DD/MM/YYYY date")]
    InvalidDate(String),
    #[error("{field} '{value}' is not a whole number")]
    NotNumeric { field: &'static str, value: String },
    #[error("week {0} outside 1..=53")]
    WeekOutOfRange(u32),
    #[error("malformed CSV: {0}")]
    Malformed(String),
}

const MIN_FIELDS: usize = 4;

fn parse_row(row: &StringRecord) -> Result<FlightRecord, RowRejection> {
    if row.len() < MIN_FIELDS {
        return Err(RowRejection::TooFewFields(row.len()));
    }
    let field = |i: usize| row.get(i).unwrap_or("");

    let entity = field(0);
    if entity.is_empty() {
        return Err(RowRejection::EmptyEntity);
    }

    let day = field(2);
    let date = parse_day(day).ok_or_else(|| RowRejection::InvalidDate(day.to_string()))?;

    let week: u32 = parse_count("week", field(1))?;
    if !(1..=53).contains(&week) {
        return Err(RowRejection::WeekOutOfRange(week));
    }
    let flights: u64 = parse_count("flights", field(3))?;

    Ok(FlightRecord {
        entity: entity.to_string(),
        week,
        day: day.to_string(),
        date,
        flights,
        reference: parse_reference(row),
    })
}

fn parse_count<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, RowRejection> {
    value.parse().map_err(|_| RowRejection::NotNumeric {
        field,
        value: value.to_string(),
    })
}

/// The comparison columns are optional: a row without a parseable 2019
/// reference count simply has no reference.
fn parse_reference(row: &StringRecord) -> Option<ReferenceCounts> {
    let day_2019 = row.get(4)?;
    let flights_2019 = row.get(5)?.parse::<u64>().ok()?;

    let non_empty = |i: usize| row.get(i).filter(|s| !s.is_empty());

    Some(ReferenceCounts {
        day_2019: day_2019.to_string(),
        flights_2019,
        percent_vs_2019: non_empty(6).and_then(|s| s.parse::<f64>().ok()),
        day_previous_year: non_empty(7).map(str::to_string),
        flights_previous_year: non_empty(8).and_then(|s| s.parse::<u64>().ok()),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADER: &str = "Entity,Week,Day,Flights,Day 2019,Flights 2019 (Reference),% vs 2019 (Daily),Day Previous Year,Flights Previous Year";

    struct Failing;

    impl FlightSource for Failing {
        fn fetch(&self, year: &str) -> Result<Vec<u8>> {
            anyhow::bail!("no resource for {year}")
        }
    }

    #[test]
    fn short_row_is_dropped_and_order_kept() {
        let text = "Entity,Week,Day,Flights\n\
                    Germany,1,01/01/2020,100\n\
                    France,1,01/01/2020\n\
                    Spain,1,02/01/2020,50\n";
        let ds = parse_flight_csv("2020", text);
        let entities: Vec<_> = ds.records().iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(entities, ["Germany", "Spain"]);
        assert_eq!(ds.rejected_rows(), 1);
    }

    #[test]
    fn invalid_dates_and_numbers_are_dropped() {
        let text = "Entity,Week,Day,Flights\n\
                    Italy,9,31/02/2020,100\n\
                    Italy,x,01/03/2020,100\n\
                    Italy,10,02/03/2020,lots\n\
                    Italy,10,03/03/2020,-5\n\
                    Italy,60,04/03/2020,5\n\
                    ,10,05/03/2020,5\n\
                    Italy,10,06/03/2020,7\n";
        let ds = parse_flight_csv("2020", text);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].day, "06/03/2020");
        assert_eq!(ds.records()[0].flights, 7);
        assert_eq!(ds.rejected_rows(), 6);
    }

    #[test]
    fn reference_columns_are_parsed_when_present() {
        let text = format!(
            "{HEADER}\n\
             Austria,1,01/01/2021,520,01/01/2019,1040,-0.5,01/01/2020,1000\n\
             Austria,1,02/01/2021,530,02/01/2019,n/a,,,\n"
        );
        let ds = parse_flight_csv("2021", &text);
        assert_eq!(ds.len(), 2);

        let reference = ds.records()[0].reference.as_ref().unwrap();
        assert_eq!(reference.day_2019, "01/01/2019");
        assert_eq!(reference.flights_2019, 1040);
        assert_eq!(reference.percent_vs_2019, Some(-0.5));
        assert_eq!(reference.day_previous_year.as_deref(), Some("01/01/2020"));
        assert_eq!(reference.flights_previous_year, Some(1000));

        assert!(ds.records()[1].reference.is_none());
    }

    #[test]
    fn quoted_entities_and_blank_lines() {
        let text = "Entity,Week,Day,Flights\n\
                    \"Serbia & Montenegro\",2,11/01/2022,300\n\
                    \n\
                    \"Bosnia, Herzegovina\",2,11/01/2022,20\n";
        let ds = parse_flight_csv("2022", text);
        assert_eq!(ds.entities(), ["Serbia & Montenegro", "Bosnia, Herzegovina"]);
    }

    #[test]
    fn invalid_utf8_drops_only_that_row() {
        let bytes: &[u8] = b"Entity,Week,Day,Flights\n\
                             Germany,1,01/01/2020,100\n\
                             Fr\xffnce,1,02/01/2020,5\n\
                             Spain,1,03/01/2020,50\n";
        let ds = parse_flight_csv("2020", bytes);
        let entities: Vec<_> = ds.records().iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(entities, ["Germany", "Spain"]);
        assert_eq!(ds.rejected_rows(), 1);
    }

    #[test]
    fn header_only_or_empty_text_gives_empty_dataset() {
        assert!(parse_flight_csv("2020", "Entity,Week,Day,Flights\n").is_empty());
        assert!(parse_flight_csv("2020", "").is_empty());
    }

    #[test]
    fn failed_fetch_yields_no_data() {
        let ds = load_year(&Failing, "2019");
        assert!(ds.is_empty());
        assert!(ds.fetch_error().unwrap().contains("no resource for 2019"));
    }

    #[test]
    fn directory_source_substitutes_year() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("csv2023.csv")).unwrap();
        writeln!(file, "Entity,Week,Day,Flights").unwrap();
        writeln!(file, "Malta,52,31/12/2023,88").unwrap();

        let source = DirectorySource::new(dir.path(), "csv{year}.csv");
        assert_eq!(source.path_for("2023"), dir.path().join("csv2023.csv"));

        let ds = load_year(&source, "2023");
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].entity, "Malta");

        std::fs::write(
            dir.path().join("csv2022.csv"),
            b"Entity,Week,Day,Flights\nMalta,1,03/01/2022,9\nM\xe4lta,1,04/01/2022,9\n",
        )
        .unwrap();
        let partly_bad = load_year(&source, "2022");
        assert!(partly_bad.fetch_error().is_none());
        assert_eq!(partly_bad.len(), 1);
        assert_eq!(partly_bad.rejected_rows(), 1);

        let missing = load_year(&source, "2020");
        assert!(missing.is_empty());
        assert!(missing.fetch_error().is_some());
    }
}
