use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::FlightRecord;
use super::season::Season;

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Which entities pass the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntitySelector {
    /// No entity restriction.
    #[default]
    All,
    /// Exact match on one entity.
    One(String),
    /// Any of several entities (comparison mode). An empty set matches nothing.
    Set(BTreeSet<String>),
}

impl EntitySelector {
    pub fn matches(&self, entity: &str) -> bool {
        match self {
            EntitySelector::All => true,
            EntitySelector::One(name) => name == entity,
            EntitySelector::Set(names) => names.contains(entity),
        }
    }
}

/// Inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range; reversed bounds are swapped.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// The caller's current selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub entity: EntitySelector,
    pub season: Season,
    /// When set, replaces the season restriction.
    pub range: Option<DateRange>,
}

impl FilterCriteria {
    pub fn matches(&self, record: &FlightRecord) -> bool {
        if !self.entity.matches(&record.entity) {
            return false;
        }
        match &self.range {
            Some(range) => range.contains(record.date),
            None => self.season.contains(record.date),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Records passing `criteria`, sorted ascending by date.
///
/// The sort is stable, so records sharing a date keep their input order.
pub fn filter_records(records: &[FlightRecord], criteria: &FilterCriteria) -> Vec<FlightRecord> {
    let mut out: Vec<FlightRecord> = records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();
    out.sort_by_key(|r| r.date);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_flight_csv;

    fn date(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn sample() -> Vec<FlightRecord> {
        let text = "Entity,Week,Day,Flights\n\
                    Germany,14,01/04/2020,40\n\
                    France,1,01/01/2020,10\n\
                    Germany,1,01/01/2020,20\n\
                    France,53,31/12/2020,90\n\
                    Germany,11,15/03/2020,30\n\
                    Germany,2,31/02/2020,99\n\
                    France,27,01/07/2020,70\n";
        parse_flight_csv("2020", text).records().to_vec()
    }

    fn entities(records: &[FlightRecord]) -> Vec<(&str, &str)> {
        records
            .iter()
            .map(|r| (r.entity.as_str(), r.day.as_str()))
            .collect()
    }

    #[test]
    fn all_all_returns_every_valid_record_sorted() {
        let records = sample();
        let out = filter_records(&records, &FilterCriteria::default());
        assert_eq!(
            entities(&out),
            [
                ("France", "01/01/2020"),
                ("Germany", "01/01/2020"),
                ("Germany", "15/03/2020"),
                ("Germany", "01/04/2020"),
                ("France", "01/07/2020"),
                ("France", "31/12/2020"),
            ]
        );
    }

    #[test]
    fn entity_and_season_are_conjunctive() {
        let records = sample();
        let criteria = FilterCriteria {
            entity: EntitySelector::One("Germany".into()),
            season: Season::Spring,
            range: None,
        };
        let out = filter_records(&records, &criteria);
        assert_eq!(
            entities(&out),
            [("Germany", "01/01/2020"), ("Germany", "15/03/2020")]
        );
    }

    #[test]
    fn explicit_range_overrides_season() {
        let records = sample();
        let criteria = FilterCriteria {
            entity: EntitySelector::All,
            season: Season::Winter,
            range: Some(DateRange::new(date(1, 7, 2020), date(15, 3, 2020))),
        };
        let out = filter_records(&records, &criteria);
        assert_eq!(
            entities(&out),
            [
                ("Germany", "15/03/2020"),
                ("Germany", "01/04/2020"),
                ("France", "01/07/2020"),
            ]
        );
    }

    #[test]
    fn set_selector_and_empty_set() {
        let records = sample();
        let both: BTreeSet<String> = ["France", "Germany"].map(String::from).into();
        let criteria = FilterCriteria {
            entity: EntitySelector::Set(both),
            season: Season::Fall,
            range: None,
        };
        assert_eq!(entities(&filter_records(&records, &criteria)), [("France", "01/07/2020")]);

        let none = FilterCriteria {
            entity: EntitySelector::Set(BTreeSet::new()),
            ..FilterCriteria::default()
        };
        assert!(filter_records(&records, &none).is_empty());
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_input_alone() {
        let records = sample();
        let before = records.clone();
        let criteria = FilterCriteria {
            entity: EntitySelector::One("France".into()),
            season: Season::All,
            range: None,
        };
        let once = filter_records(&records, &criteria);
        let twice = filter_records(&once, &criteria);
        assert_eq!(once, twice);
        assert_eq!(records, before);
    }
}
