use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use super::filter::EntitySelector;
use super::model::FlightRecord;
use super::season::Season;

// ---------------------------------------------------------------------------
// Per-entity totals (globe / ranking)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityTotal {
    pub entity: String,
    pub flights: u64,
}

/// Sum of flights per entity, entities in first-seen order. Sums saturate
/// at `u64::MAX`.
pub fn totals_by_entity(records: &[FlightRecord]) -> Vec<EntityTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<EntityTotal> = Vec::new();

    for r in records {
        let slot = *index.entry(r.entity.as_str()).or_insert_with(|| {
            totals.push(EntityTotal {
                entity: r.entity.clone(),
                flights: 0,
            });
            totals.len() - 1
        });
        totals[slot].flights = totals[slot].flights.saturating_add(r.flights);
    }
    totals
}

// ---------------------------------------------------------------------------
// Weekly comparison against 2019 (heat map)
// ---------------------------------------------------------------------------

/// Flights of one entity in one week, next to the 2019 reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekCell {
    pub entity: String,
    pub week: u32,
    pub flights: u64,
    pub flights_2019: u64,
    /// Sum over the days that carried a previous-year count.
    pub flights_previous_year: Option<u64>,
}

impl WeekCell {
    /// `flights / flights_2019`; `None` without a reference.
    pub fn ratio(&self) -> Option<f64> {
        (self.flights_2019 > 0).then(|| self.flights as f64 / self.flights_2019 as f64)
    }
}

/// Weekly sums per entity for records that carry a 2019 reference.
///
/// Entities come out in first-seen order, weeks ascending within each.
/// Sums saturate at `u64::MAX`.
pub fn weekly_comparison(records: &[FlightRecord]) -> Vec<WeekCell> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, BTreeMap<u32, WeekCell>> = HashMap::new();

    for r in records {
        let Some(reference) = &r.reference else {
            continue;
        };
        let weeks = sums.entry(r.entity.as_str()).or_insert_with(|| {
            order.push(r.entity.as_str());
            BTreeMap::new()
        });
        let cell = weeks.entry(r.week).or_insert_with(|| WeekCell {
            entity: r.entity.clone(),
            week: r.week,
            flights: 0,
            flights_2019: 0,
            flights_previous_year: None,
        });
        cell.flights = cell.flights.saturating_add(r.flights);
        cell.flights_2019 = cell.flights_2019.saturating_add(reference.flights_2019);
        if let Some(previous) = reference.flights_previous_year {
            let sum = cell.flights_previous_year.unwrap_or(0).saturating_add(previous);
            cell.flights_previous_year = Some(sum);
        }
    }

    order
        .into_iter()
        .flat_map(|entity| sums.remove(entity).unwrap_or_default().into_values())
        .collect()
}

/// Cells inside the season's week range whose entity passes the selector.
pub fn cells_in(cells: &[WeekCell], season: Season, entities: &EntitySelector) -> Vec<WeekCell> {
    cells
        .iter()
        .filter(|c| season.contains_week(c.week) && entities.matches(&c.entity))
        .cloned()
        .collect()
}

/// Smallest and largest ratio among `cells`, for the colour-scale domain.
pub fn ratio_extent(cells: &[WeekCell]) -> Option<(f64, f64)> {
    cells.iter().filter_map(WeekCell::ratio).fold(None, |acc, r| match acc {
        None => Some((r, r)),
        Some((lo, hi)) => Some((lo.min(r), hi.max(r))),
    })
}

// ---------------------------------------------------------------------------
// Country groups
// ---------------------------------------------------------------------------

/// Alphabetical country groups offered by the heat map.
pub const COUNTRY_GROUPS: &[(&str, &[&str])] = &[
    ("A to B", &["Austria", "Armenia", "Belgium", "Bosnia Herzegovina", "Bulgaria"]),
    (
        "C to F",
        &["Croatia", "Cyprus", "Czech Republic", "Denmark", "Estonia", "Finland", "France"],
    ),
    (
        "G to I",
        &["Georgia", "Germany", "Greece", "Hungary", "Ireland", "Israel", "Italy"],
    ),
    ("L to M", &["Latvia", "Lithuania", "Luxembourg", "Malta", "Moldova", "Morocco"]),
    (
        "N to R",
        &["Netherlands", "North Macedonia", "Norway", "Poland", "Portugal", "Romania"],
    ),
    ("S", &["Serbia & Montenegro", "Slovakia", "Slovenia", "Spain", "Sweden", "Switzerland"]),
    ("T to Z", &["Turkey", "Ukraine", "United Kingdom", "Total Network Manager Area"]),
];

/// Selector for a named group; `"All"` maps to no restriction.
pub fn country_group(name: &str) -> Option<EntitySelector> {
    if name == "All" {
        return Some(EntitySelector::All);
    }
    COUNTRY_GROUPS
        .iter()
        .find(|(group, _)| *group == name)
        .map(|(_, members)| {
            let set: BTreeSet<String> = members.iter().map(|m| m.to_string()).collect();
            EntitySelector::Set(set)
        })
}
