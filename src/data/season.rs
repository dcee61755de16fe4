use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Season – a fixed calendar quarter, or no restriction
// ---------------------------------------------------------------------------

/// Calendar bucket used to restrict a year's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    #[default]
    All,
}

/// A `(month, day)` pair inside a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    /// `month * 100 + day`, monotonic over a calendar year.
    pub fn composite(self) -> u32 {
        self.month * 100 + self.day
    }

    fn of(date: NaiveDate) -> Self {
        Self::new(date.month(), date.day())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown season '{0}' (expected Spring, Summer, Fall, Winter or All)")]
pub struct UnknownSeason(pub String);

impl Season {
    /// Selectable values, in menu order.
    pub const ALL_CHOICES: [Season; 5] = [
        Season::All,
        Season::Spring,
        Season::Summer,
        Season::Fall,
        Season::Winter,
    ];

    /// Concrete seasons, in classification order.
    pub const QUARTERS: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Inclusive start and end of the season within any year.
    pub fn bounds(self) -> (MonthDay, MonthDay) {
        match self {
            Season::Spring => (MonthDay::new(1, 1), MonthDay::new(3, 31)),
            Season::Summer => (MonthDay::new(4, 1), MonthDay::new(6, 30)),
            Season::Fall => (MonthDay::new(7, 1), MonthDay::new(9, 30)),
            Season::Winter => (MonthDay::new(10, 1), MonthDay::new(12, 31)),
            Season::All => (MonthDay::new(1, 1), MonthDay::new(12, 31)),
        }
    }

    /// Inclusive week-number range covered by the season.
    pub fn week_range(self) -> (u32, u32) {
        match self {
            Season::Spring => (1, 13),
            Season::Summer => (14, 26),
            Season::Fall => (27, 39),
            Season::Winter => (40, 53),
            Season::All => (1, 53),
        }
    }

    /// Whether `date` falls inside this season. `All` contains every date.
    pub fn contains(self, date: NaiveDate) -> bool {
        let (start, end) = self.bounds();
        let current = MonthDay::of(date).composite();
        current >= start.composite() && current <= end.composite()
    }

    /// Whether `week` falls inside this season's week range.
    pub fn contains_week(self, week: u32) -> bool {
        let (first, last) = self.week_range();
        (first..=last).contains(&week)
    }

    /// Classify a date into one of the four quarters.
    ///
    /// Every quarter is checked explicitly; a date matching none of them
    /// yields `None` rather than a default.
    pub fn of(date: NaiveDate) -> Option<Season> {
        Self::QUARTERS.into_iter().find(|s| s.contains(date))
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
            Season::All => "All",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Season {
    type Err = UnknownSeason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL_CHOICES
            .into_iter()
            .find(|season| season.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSeason(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn boundary_dates() {
        assert_eq!(Season::of(d(15, 3, 2020)), Some(Season::Spring));
        assert_eq!(Season::of(d(1, 4, 2020)), Some(Season::Summer));
        assert_eq!(Season::of(d(31, 12, 2020)), Some(Season::Winter));
        assert_eq!(Season::of(d(1, 1, 2020)), Some(Season::Spring));
        assert_eq!(Season::of(d(31, 3, 2021)), Some(Season::Spring));
        assert_eq!(Season::of(d(30, 6, 2021)), Some(Season::Summer));
        assert_eq!(Season::of(d(1, 7, 2021)), Some(Season::Fall));
        assert_eq!(Season::of(d(30, 9, 2021)), Some(Season::Fall));
        assert_eq!(Season::of(d(1, 10, 2021)), Some(Season::Winter));
    }

    #[test]
    fn end_bound_uses_season_day_not_input_day() {
        // Summer ends on 30/06 whatever the input day is.
        assert!(!Season::Summer.contains(d(1, 7, 2022)));
        assert!(!Season::Summer.contains(d(31, 7, 2022)));
        assert!(Season::Fall.contains(d(1, 7, 2022)));
    }

    #[test]
    fn every_day_has_exactly_one_quarter() {
        let mut date = d(1, 1, 2020);
        while date.year() == 2020 {
            let matches = Season::QUARTERS.iter().filter(|s| s.contains(date)).count();
            assert_eq!(matches, 1, "{date}");
            assert!(Season::All.contains(date));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn week_ranges_partition_the_year() {
        for week in 1..=53 {
            let matches = Season::QUARTERS
                .iter()
                .filter(|s| s.contains_week(week))
                .count();
            assert_eq!(matches, 1, "week {week}");
        }
        assert!(!Season::All.contains_week(0));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("winter".parse::<Season>(), Ok(Season::Winter));
        assert_eq!(" All ".parse::<Season>(), Ok(Season::All));
        assert_eq!(
            "Monsoon".parse::<Season>(),
            Err(UnknownSeason("Monsoon".to_string()))
        );
        assert_eq!(Season::Fall.to_string(), "Fall");
    }
}
